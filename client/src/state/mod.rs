//! Widget state owned by the selection controller and the router.

pub mod modal;
pub mod selection;

pub use modal::ModalState;
pub use selection::{RowSnapshot, SelectionState};
