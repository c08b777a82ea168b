//! Selection dialog lifecycle.
//!
//! ```text
//! Hidden -> Loading -> Populated | Empty | Failed
//! any    -> Hidden   (select, close, backdrop, Escape)
//! ```

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Hidden,
    Loading,
    Populated,
    Empty,
    Failed,
}

impl ModalState {
    #[must_use]
    pub fn is_open(self) -> bool {
        self != Self::Hidden
    }
}
