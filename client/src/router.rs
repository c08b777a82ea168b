//! Event router: classifies document-level interactions into widget actions.
//!
//! Classification is pure. The widget installs one click and one key listener
//! on the document and feeds every event through [`route_click`] /
//! [`route_key`], so handlers keep working after the host replaces the nodes
//! they belong to.

use crate::dom::{Page, ids};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenSelector,
    ClearSelection,
    CloseModal,
    /// Raw snapshot stored on the clicked select trigger.
    SelectRow { snapshot: String },
}

/// First matching rule wins: open, clear, close, select, backdrop.
pub fn route_click<P: Page>(page: &P, target: &P::Node) -> Option<Action> {
    if page.closest(target, ids::OPEN_BUTTON_SELECTOR).is_some() {
        return Some(Action::OpenSelector);
    }
    if page.closest(target, ids::CLEAR_BUTTON_SELECTOR).is_some() {
        return Some(Action::ClearSelection);
    }
    if page.closest(target, ids::CLOSE_MODAL_SELECTOR).is_some() {
        return Some(Action::CloseModal);
    }
    if let Some(button) = page.closest(target, ids::SELECT_BUTTON_SELECTOR)
        && let Some(snapshot) = page.attribute(&button, ids::SNAPSHOT_ATTR).filter(|s| !s.is_empty())
    {
        return Some(Action::SelectRow { snapshot });
    }
    if page.attribute(target, "id").as_deref() == Some(ids::MODAL_ID) {
        return Some(Action::CloseModal);
    }
    None
}

pub fn route_key(key: &str) -> Option<Action> {
    (key == "Escape").then_some(Action::CloseModal)
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
