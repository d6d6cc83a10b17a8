//! Cell render formatter for table-display widgets: turns a cell's
//! raw value into an HTML anchor element (hyperlink, `mailto:` or
//! `tel:` link) for the display pass, and leaves the underlying data
//! untouched for sorting, filtering and export.

pub mod warn;
pub mod myfrom;
pub mod html;
pub mod url_encoding;
pub mod aurl;
pub mod render;
pub mod anchor_render;

pub use anchor_render::{AnchorConfig, AnchorRender, Attributes, LinkType,
                        register_anchor_render};
pub use aurl::{AUrl, UrlParseError};
pub use html::{Anchor, att, atts, opt_att};
pub use render::{CellRender, RenderContext, RenderFactory, RenderMeta,
                 RenderRegistry, RendersMap};
