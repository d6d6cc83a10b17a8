//! Render a table cell's value as an HTML anchor element, for the
//! display pass only; every other pass sees the raw data unchanged.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{Result, bail};
use kstring::KString;
use serde::Deserialize;
use serde_json::Value;

use crate::aurl::AUrl;
use crate::html::Anchor;
use crate::render::{CellRender, RenderContext, RenderMeta, RenderRegistry};
use crate::warn;

/// Which href synthesis rule to apply when the attributes don't
/// already carry an `href`. Canonical spelling for `Mail` is "mail";
/// "email" is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Link,
    #[serde(alias = "email")]
    Mail,
    Phone,
}

impl Default for LinkType {
    fn default() -> Self {
        Self::Link
    }
}

impl LinkType {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "link" => Ok(Self::Link),
            "mail" | "email" => Ok(Self::Mail),
            "phone" => Ok(Self::Phone),
            _ => bail!("invalid link type {s:?}")
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Mail => "mail",
            Self::Phone => "phone",
        }
    }
}

pub type AttrFn = dyn Fn(&Value, &Value, &RenderMeta)
                      -> Result<Vec<(KString, KString)>>
    + Send + Sync;

/// Where the anchor's attributes come from: a fixed list given at
/// construction time, or a callback computing them from the cell
/// being rendered. Decided once at construction.
pub enum Attributes {
    Fixed(Vec<(KString, KString)>),
    With(Box<AttrFn>),
}

impl Attributes {
    pub fn with(
        f: impl Fn(&Value, &Value, &RenderMeta)
                -> Result<Vec<(KString, KString)>>
            + Send + Sync + 'static
    ) -> Self {
        Self::With(Box::new(f))
    }

    /// Errors from `With` callbacks are not caught anywhere in this
    /// crate; they go to the host's render pipeline.
    fn resolve(&self, cell: &Value, row: &Value, meta: &RenderMeta)
               -> Result<Vec<(KString, KString)>> {
        match self {
            Self::Fixed(attr) => Ok(attr.clone()),
            Self::With(f) => f(cell, row, meta)
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::Fixed(Vec::new())
    }
}

impl Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(attr) => f.debug_tuple("Fixed").field(attr).finish(),
            Self::With(_) => f.write_str("With(..)")
        }
    }
}

/// The text a cell value shows as, the way the host widget would
/// coerce it: strings as themselves, null as nothing, the rest via
/// its JSON serialization.
pub fn value_text(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) => Cow::from(s.as_str()),
        Value::Null => Cow::from(""),
        other => Cow::from(other.to_string())
    }
}

// Use CowStr ?
pub fn mail_href(s: &str) -> String {
    if s.starts_with("mailto:") {
        s.into()
    } else if s.starts_with("https:") || s.starts_with("http:") {
        warn!("using a non-email URL where an email address was expected: {s:?}");
        s.into()
    } else {
        // hope all is well !
        format!("mailto:{s}")
    }
}

pub fn tel_href(s: &str) -> String {
    let number: String = s.chars().filter(
        |c| c.is_ascii_digit() || *c == '+').collect();
    format!("tel:{number}")
}

fn link_href(s: &str) -> String {
    match AUrl::from_str(s) {
        Ok(url) => String::from(&url),
        // Not an absolute URL (relative ones land here, too): keep
        // verbatim, never fail a display pass over a bad href.
        Err(_) => s.into()
    }
}

/// The render formatter. Configured once, then called by the host
/// once per cell per render pass; holds no mutable state.
#[derive(Debug)]
pub struct AnchorRender {
    link_type: LinkType,
    attributes: Attributes,
    /// `None` means: use the cell value, decided per call.
    inner_text: Option<KString>,
}

impl Default for AnchorRender {
    fn default() -> Self {
        Self::new(LinkType::default(), Attributes::default(), None)
    }
}

impl AnchorRender {
    pub fn new(
        link_type: LinkType,
        attributes: Attributes,
        inner_text: Option<KString>
    ) -> Self {
        Self { link_type, attributes, inner_text }
    }

    pub fn render<'v>(
        &self,
        cell: &'v Value,
        context: RenderContext,
        row: &Value,
        meta: &RenderMeta
    ) -> Result<Cow<'v, Value>> {
        if !context.is_display() {
            // Sorting, filtering, type detection and export must see
            // the raw data.
            return Ok(Cow::Borrowed(cell));
        }
        let mut attr = self.attributes.resolve(cell, row, meta)?;
        let text = value_text(cell);
        if !attr.iter().any(|(key, _)| key.as_str() == "href") {
            let href = match self.link_type {
                LinkType::Mail => mail_href(&text),
                LinkType::Phone => tel_href(&text),
                LinkType::Link => link_href(&text),
            };
            attr.push((KString::from_static("href"),
                       KString::from_string(href)));
        }
        // The configured inner_text is never assigned to; each call
        // decides anew between it and the cell value.
        let inner_text = match &self.inner_text {
            Some(fixed) => fixed.clone(),
            None => KString::from_ref(&text)
        };
        let markup = Anchor::new(attr, inner_text).to_html_fragment_string()?;
        Ok(Cow::Owned(Value::String(markup)))
    }
}

impl CellRender for AnchorRender {
    fn call<'v>(
        &self,
        cell: &'v Value,
        context: RenderContext,
        row: &Value,
        meta: &RenderMeta
    ) -> Result<Cow<'v, Value>> {
        self.render(cell, context, row, meta)
    }
}

/// Construction-time options as the host passes them in its
/// JSON-shaped column definition. Callback attributes are code, not
/// configuration; they only exist on the `Attributes` API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnchorConfig {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub attributes: BTreeMap<String, String>,
    pub inner_text: Option<String>,
}

impl From<AnchorConfig> for AnchorRender {
    fn from(config: AnchorConfig) -> Self {
        AnchorRender::new(
            config.link_type,
            Attributes::Fixed(
                config.attributes.into_iter().map(
                    |(key, val)| (KString::from_string(key),
                                  KString::from_string(val)))
                    .collect()),
            config.inner_text.map(KString::from_string))
    }
}

/// Install the `"anchor"` render factory with the host. To be called
/// once during host initialization.
pub fn register_anchor_render(registry: &mut dyn RenderRegistry) {
    registry.register_render(
        KString::from_static("anchor"),
        Arc::new(|config: &Value| {
            let config: AnchorConfig = serde_json::from_value(config.clone())?;
            Ok(Arc::new(AnchorRender::from(config)) as Arc<dyn CellRender>)
        }));
}
