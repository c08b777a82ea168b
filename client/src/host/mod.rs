//! Host capability interface.
//!
//! DESIGN
//! ======
//! The order page may expose any subset of three totals hooks. The widget never
//! assumes one exists: it probes each by name at call time through
//! [`Host::has`] and only then calls it. The same interface carries the two
//! outbound selection broadcasts so page scripts can react without polling.
//!
//! ERROR HANDLING
//! ==============
//! Hook calls return [`HookError`] instead of unwinding; callers log the error
//! and keep their own state consistent regardless of what the host did.

#[cfg(feature = "hydrate")]
pub mod window;

use serde::Serialize;
use tables::TableRecord;

/// Totals hooks the host page may define.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// `applyReservedTablePrice(price | null)`.
    ApplyReservedTablePrice,
    /// `recomputeTotals({ reservedTablePrice, clearReserved? })`.
    RecomputeTotals,
    /// `renderOrder()`; reads the body price attribute on its own.
    RenderOrder,
}

impl Hook {
    /// Global function name the hook is published under.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ApplyReservedTablePrice => "applyReservedTablePrice",
            Self::RecomputeTotals => "recomputeTotals",
            Self::RenderOrder => "renderOrder",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{0} is not defined by the host page")]
    Missing(&'static str),
    #[error("{hook} threw: {message}")]
    Threw { hook: &'static str, message: String },
    #[error("failed to build {hook} payload: {message}")]
    Payload { hook: &'static str, message: String },
}

/// Structured payload for [`Hook::RecomputeTotals`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeRequest {
    pub reserved_table_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_reserved: Option<bool>,
}

impl RecomputeRequest {
    #[must_use]
    pub fn apply(price: f64) -> Self {
        Self { reserved_table_price: price, clear_reserved: None }
    }

    #[must_use]
    pub fn clear() -> Self {
        Self { reserved_table_price: 0.0, clear_reserved: Some(true) }
    }
}

/// Outbound notification dispatched on the page after a selection change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionEvent<'a> {
    Selected(&'a TableRecord),
    Cleared,
}

impl SelectionEvent<'_> {
    /// DOM event type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selected(_) => "table-selected",
            Self::Cleared => "table-cleared",
        }
    }
}

/// The order page as seen by the selection controller.
pub trait Host {
    /// Whether the page currently defines `hook`.
    fn has(&self, hook: Hook) -> bool;

    /// # Errors
    ///
    /// Returns [`HookError`] if the hook is missing or throws.
    fn apply_reserved_table_price(&self, price: Option<f64>) -> Result<(), HookError>;

    /// # Errors
    ///
    /// Returns [`HookError`] if the hook is missing, throws, or the payload cannot be built.
    fn recompute_totals(&self, request: &RecomputeRequest) -> Result<(), HookError>;

    /// # Errors
    ///
    /// Returns [`HookError`] if the hook is missing or throws.
    fn render_order(&self) -> Result<(), HookError>;

    fn broadcast(&self, event: &SelectionEvent<'_>);
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
