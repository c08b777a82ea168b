//! Widget surfaces rendered into the host page.
//!
//! SYSTEM CONTEXT
//! ==============
//! `control_block` is injected by the widget and owned by it; `tables_modal`
//! drives dialog markup the host page ships.

pub mod control_block;
pub mod tables_modal;
