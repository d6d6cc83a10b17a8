//! The contract between a host table widget and cell render
//! formatters: which pass is being rendered, which cell, and how a
//! host learns about the formatters this crate provides.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{Result, bail};
use kstring::KString;
use serde_json::Value;

/// The purpose of the current render pass. Only `Display` may change
/// what the host shows; all other passes must see the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    Display,
    Filter,
    Sort,
    Type,
    Export,
}

impl RenderContext {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "display" => Ok(Self::Display),
            "filter" => Ok(Self::Filter),
            "sort" => Ok(Self::Sort),
            "type" => Ok(Self::Type),
            "export" => Ok(Self::Export),
            _ => bail!("invalid render context {s:?}")
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Filter => "filter",
            Self::Sort => "sort",
            Self::Type => "type",
            Self::Export => "export",
        }
    }

    pub fn is_display(self) -> bool {
        match self {
            Self::Display => true,
            _ => false
        }
    }
}

/// Position of the cell being rendered, as the host counts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderMeta {
    pub row: usize,
    pub col: usize,
}

pub trait CellRender: Debug + Send + Sync {
    /// Called by the host once per cell per render pass. Returning
    /// `Cow::Borrowed(cell)` means pass-through: the host keeps using
    /// the raw data for this pass. An `Err` means the formatter
    /// accepted the pass but failed; the host's render pipeline
    /// decides what that means for the cell (there is no recovery
    /// here).
    fn call<'v>(
        &self,
        cell: &'v Value,
        context: RenderContext,
        row: &Value,
        meta: &RenderMeta)
        -> Result<Cow<'v, Value>>;
}

/// Makes a `CellRender` from the host's JSON-shaped option object for
/// one column.
pub type RenderFactory =
    Arc<dyn Fn(&Value) -> Result<Arc<dyn CellRender>> + Send + Sync>;

/// Implemented by the host (or by `RendersMap`); render formatter
/// setup routines call `register_render` once during host
/// initialization. No teardown is needed, factories hold no
/// resources.
pub trait RenderRegistry {
    fn register_render(&mut self, name: KString, factory: RenderFactory);
    fn get_render(&self, name: &str) -> Option<&RenderFactory>;
}

/// Registry for hosts that don't bring their own.
#[derive(Default)]
pub struct RendersMap(HashMap<KString, RenderFactory>);

impl RendersMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }
}

impl RenderRegistry for RendersMap {
    fn register_render(&mut self, name: KString, factory: RenderFactory) {
        self.0.insert(name, factory);
    }
    fn get_render(&self, name: &str) -> Option<&RenderFactory> {
        self.0.get(name)
    }
}

impl Debug for RendersMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The factories are opaque, only the names are interesting.
        f.debug_tuple("RendersMap")
            .field(&self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_render_context_strings() {
        for context in [RenderContext::Display, RenderContext::Filter,
                        RenderContext::Sort, RenderContext::Type,
                        RenderContext::Export] {
            assert_eq!(RenderContext::from_str(context.as_str()).unwrap(),
                       context);
        }
        assert!(RenderContext::from_str("Display").is_err());
        assert!(RenderContext::from_str("").is_err());
        assert!(RenderContext::Display.is_display());
        assert!(!RenderContext::Sort.is_display());
    }
}
