//! Page port: the DOM operations the widget needs from its host document.
//!
//! SYSTEM CONTEXT
//! ==============
//! The widget augments markup it does not own. Every lookup goes through the
//! ids and selectors in [`ids`], resolved at call time, because the host's own
//! renderer can destroy and recreate any node between two events. Nothing in
//! the core holds on to a node across an event boundary.
//!
//! `web` implements the port over `web-sys` in the browser; `memory` is an
//! in-process document used by the native test suite.

#[cfg(test)]
pub mod memory;
#[cfg(feature = "hydrate")]
pub mod web;

/// Element ids, selectors and attribute names shared with the host markup.
pub mod ids {
    pub const ORDER_COMPUTE_ID: &str = "orderCompute";
    pub const ORDER_COMPUTE_SELECTOR: &str = ".order-compute";
    pub const ORDER_SECTION_SELECTOR: &str = ".order-section";
    pub const COMPUTE_ACTIONS_SELECTOR: &str = ".compute-actions";
    pub const ORDER_BUTTONS_SELECTOR: &str = ".order-buttons";

    pub const BLOCK_CLASS: &str = "reserved-table-block";
    pub const CHECKBOX_ID: &str = "use-reserved-table";
    pub const OPEN_BUTTON_ID: &str = "open-tables-btn";
    pub const SUMMARY_ID: &str = "selected-table-summary";
    pub const SUMMARY_NAME_ID: &str = "selected-table-name";
    pub const SUMMARY_NUMBER_ID: &str = "selected-table-number";
    pub const SUMMARY_PARTY_ID: &str = "selected-table-party";
    pub const SUMMARY_PRICE_ID: &str = "selected-table-price";
    pub const CLEAR_BUTTON_ID: &str = "clear-selected-table";

    pub const MODAL_ID: &str = "tablesModal";
    pub const CLOSE_MODAL_ID: &str = "closeTablesModal";
    pub const LOADING_ID: &str = "tables-loading";
    pub const EMPTY_ID: &str = "tables-empty";
    pub const LIST_ID: &str = "tables-list";
    pub const SELECT_BUTTON_CLASS: &str = "table-select-btn";

    pub const OPEN_BUTTON_SELECTOR: &str = "#open-tables-btn";
    pub const CLEAR_BUTTON_SELECTOR: &str = "#clear-selected-table";
    pub const CLOSE_MODAL_SELECTOR: &str = "#closeTablesModal";
    pub const SELECT_BUTTON_SELECTOR: &str = ".table-select-btn";

    /// Attribute on each select trigger holding the row snapshot.
    pub const SNAPSHOT_ATTR: &str = "data-table";
    /// Body attribute used as the last-resort price channel.
    pub const PRICE_BODY_ATTR: &str = "data-reserved-table-price";
    pub const HIDDEN_CLASS: &str = "hidden";
}

/// Error returned by fallible page operations.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("failed to create <{0}> element")]
    Create(String),
    #[error("failed to insert node: {0}")]
    Insert(String),
    #[error("failed to observe subtree: {0}")]
    Observe(String),
    #[error("failed to attach {0:?} listener")]
    Listen(ListenerKind),
}

/// Document-level listener kinds the router installs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    Click,
    KeyDown,
}

/// Interaction delivered to a document-level listener.
#[derive(Clone, Debug)]
pub enum UiEvent<N> {
    /// Click whose origin element is `target`.
    Click { target: N },
    /// Key press anywhere in the document.
    Key { key: String },
}

/// DOM operations over a host document.
///
/// Setters are best-effort: a host that rejects an attribute write leaves the
/// page unchanged and the call returns normally. Structural operations report
/// failure through [`DomError`].
pub trait Page {
    type Node: Clone;
    /// Keeps a subtree observation alive while held.
    type Observer;
    /// Handle used to detach a document-level listener.
    type Listener;

    // --- lookup ---
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// First match in document order. Selectors are `#id`, `.class` or a tag name.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;
    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    // --- structure ---
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;
    fn append_text(&self, parent: &Self::Node, text: &str) -> Result<(), DomError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;
    /// Insert `child` before `reference`, or append when `reference` is `None`.
    fn insert_before(
        &self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), DomError>;
    /// Insert `child` as the first child of `parent`.
    fn prepend_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;
    fn clear_children(&self, node: &Self::Node);

    // --- content + presentation ---
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// Replace all content of `node` with a single text run.
    fn set_text(&self, node: &Self::Node, text: &str);
    fn text(&self, node: &Self::Node) -> String;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    /// `display: ''` when visible, `display: none` otherwise.
    fn set_visible(&self, node: &Self::Node, visible: bool);
    fn is_visible(&self, node: &Self::Node) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn is_checked(&self, node: &Self::Node) -> bool;
    fn set_checked(&self, node: &Self::Node, checked: bool);
    fn focus(&self, node: &Self::Node);

    // --- page-wide ---
    fn set_body_attribute(&self, name: &str, value: &str);
    fn body_attribute(&self, name: &str) -> Option<String>;

    /// Call `callback` after every batch of child-list mutations anywhere under `node`.
    fn observe_subtree(&self, node: &Self::Node, callback: Box<dyn Fn()>) -> Result<Self::Observer, DomError>;
    fn listen(
        &self,
        kind: ListenerKind,
        handler: Box<dyn Fn(UiEvent<Self::Node>)>,
    ) -> Result<Self::Listener, DomError>;
    fn unlisten(&self, listener: Self::Listener);

    /// Create an element and apply `(name, value)` attributes in order.
    fn element_with(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<Self::Node, DomError> {
        let node = self.create_element(tag)?;
        for (name, value) in attrs {
            self.set_attribute(&node, name, value);
        }
        Ok(node)
    }
}
