//! In-process document backing the native test suite.
//!
//! Models just enough of the DOM for the widget: an element tree with text
//! runs, attributes, inline styles, checkbox state, subtree observers that
//! batch until [`MemoryPage::flush_mutations`], and document listeners fired by
//! [`MemoryPage::click`] / [`MemoryPage::press_key`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{DomError, ListenerKind, Page, UiEvent, ids};

const TEXT_TAG: &str = "#text";
const ROOT: usize = 0;
const BODY: usize = 1;
const MAX_FLUSH_ROUNDS: usize = 8;

/// Handle to a node in a [`MemoryPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    children: Vec<usize>,
    parent: Option<usize>,
    checked: bool,
}

struct ObserverSlot {
    target: usize,
    callback: Rc<dyn Fn()>,
    pending: bool,
}

type Handler = Rc<dyn Fn(UiEvent<NodeRef>)>;

pub struct MemoryPage {
    nodes: RefCell<Vec<NodeData>>,
    observers: RefCell<Vec<ObserverSlot>>,
    listeners: RefCell<Vec<Option<(ListenerKind, Handler)>>>,
    focused: Cell<Option<usize>>,
}

pub struct MemoryObserver(pub usize);
pub struct MemoryListener(usize);

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Empty document: `<html><body></body></html>`.
    pub fn new() -> Self {
        let root = NodeData { tag: "html".to_owned(), children: vec![BODY], ..NodeData::default() };
        let body = NodeData { tag: "body".to_owned(), parent: Some(ROOT), ..NodeData::default() };
        Self {
            nodes: RefCell::new(vec![root, body]),
            observers: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            focused: Cell::new(None),
        }
    }

    /// Order screen markup as the host renders it:
    ///
    /// ```text
    /// body
    /// ├── div.order-section
    /// │   ├── div#orderCompute
    /// │   │   ├── div.totals
    /// │   │   └── div.compute-actions
    /// │   └── div.order-buttons
    /// └── div#tablesModal.hidden
    ///     └── div.modal-content
    ///         ├── button#closeTablesModal
    ///         ├── div#tables-loading   "Loading tables…"
    ///         ├── div#tables-empty     "No reserved tables found."
    ///         └── table#tables-list > tbody
    /// ```
    pub fn order_screen() -> Self {
        let page = Self::new();
        let body = page.body();
        let section = page.build(&body, "div", &[("class", "order-section")]);
        let compute = page.build(&section, "div", &[("id", ids::ORDER_COMPUTE_ID)]);
        page.build(&compute, "div", &[("class", "totals")]);
        page.build(&compute, "div", &[("class", "compute-actions")]);
        page.build(&section, "div", &[("class", "order-buttons")]);
        page.add_modal();
        page
    }

    /// Order screen without `#orderCompute`, only the section container.
    pub fn section_only(with_buttons: bool) -> Self {
        let page = Self::new();
        let body = page.body();
        let section = page.build(&body, "div", &[("class", "order-section")]);
        page.build(&section, "div", &[("class", "order-items")]);
        if with_buttons {
            page.build(&section, "div", &[("class", "order-buttons")]);
        }
        page.add_modal();
        page
    }

    fn add_modal(&self) {
        let body = self.body();
        let modal = self.build(&body, "div", &[("id", ids::MODAL_ID), ("class", "modal hidden")]);
        let content = self.build(&modal, "div", &[("class", "modal-content")]);
        self.build(&content, "button", &[("id", ids::CLOSE_MODAL_ID)]);
        let loading = self.build(&content, "div", &[("id", ids::LOADING_ID)]);
        self.set_text(&loading, "Loading tables…");
        let empty = self.build(&content, "div", &[("id", ids::EMPTY_ID)]);
        self.set_text(&empty, "No reserved tables found.");
        self.set_visible(&empty, false);
        let list = self.build(&content, "table", &[("id", ids::LIST_ID)]);
        self.build(&list, "tbody", &[]);
    }

    pub fn body(&self) -> NodeRef {
        NodeRef(BODY)
    }

    /// Create an element under `parent` with attributes; test fixture helper.
    pub fn build(&self, parent: &NodeRef, tag: &str, attrs: &[(&str, &str)]) -> NodeRef {
        let node = self.alloc(tag);
        for (name, value) in attrs {
            self.set_attribute(&node, name, value);
        }
        self.attach(parent.0, node.0, None);
        node
    }

    /// Detach `node` from its parent, as a host re-render would.
    pub fn remove(&self, node: &NodeRef) {
        let parent = self.nodes.borrow()[node.0].parent;
        if let Some(parent) = parent {
            self.nodes.borrow_mut()[parent].children.retain(|c| *c != node.0);
            self.nodes.borrow_mut()[node.0].parent = None;
            self.touch(parent);
        }
    }

    /// Run observer callbacks for pending mutation batches, repeating while
    /// callbacks produce new mutations. Returns the number of callbacks run.
    pub fn flush_mutations(&self) -> usize {
        let mut runs = 0;
        for _ in 0..MAX_FLUSH_ROUNDS {
            let due: Vec<Rc<dyn Fn()>> = self
                .observers
                .borrow_mut()
                .iter_mut()
                .filter(|slot| slot.pending)
                .map(|slot| {
                    slot.pending = false;
                    Rc::clone(&slot.callback)
                })
                .collect();
            if due.is_empty() {
                break;
            }
            for callback in due {
                callback();
                runs += 1;
            }
        }
        runs
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Dispatch a click originating at `target` to every click listener.
    pub fn click(&self, target: &NodeRef) {
        for handler in self.handlers(ListenerKind::Click) {
            handler(UiEvent::Click { target: *target });
        }
    }

    pub fn press_key(&self, key: &str) {
        for handler in self.handlers(ListenerKind::KeyDown) {
            handler(UiEvent::Key { key: key.to_owned() });
        }
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(|(k, _)| *k == kind))
            .count()
    }

    /// Attached elements carrying `id`.
    pub fn count_id(&self, id: &str) -> usize {
        self.attached_order()
            .into_iter()
            .filter(|i| self.nodes.borrow()[*i].attrs.get("id").is_some_and(|v| v == id))
            .count()
    }

    /// Attached elements carrying `class`.
    pub fn count_class(&self, class: &str) -> usize {
        self.attached_order()
            .into_iter()
            .filter(|i| self.matches(*i, &format!(".{class}")))
            .count()
    }

    /// Element children of `node`, skipping text runs.
    pub fn element_children(&self, node: &NodeRef) -> Vec<NodeRef> {
        let nodes = self.nodes.borrow();
        nodes[node.0]
            .children
            .iter()
            .filter(|c| nodes[**c].tag != TEXT_TAG)
            .map(|c| NodeRef(*c))
            .collect()
    }

    /// Every attached element matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        self.attached_order()
            .into_iter()
            .filter(|i| self.matches(*i, selector))
            .map(NodeRef)
            .collect()
    }

    pub fn tag(&self, node: &NodeRef) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn is_focused(&self, node: &NodeRef) -> bool {
        self.focused.get() == Some(node.0)
    }

    fn handlers(&self, kind: ListenerKind) -> Vec<Handler> {
        self.listeners
            .borrow()
            .iter()
            .flatten()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| Rc::clone(h))
            .collect()
    }

    fn alloc(&self, tag: &str) -> NodeRef {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData { tag: tag.to_owned(), ..NodeData::default() });
        NodeRef(nodes.len() - 1)
    }

    fn attach(&self, parent: usize, child: usize, at: Option<usize>) {
        let old_parent = self.nodes.borrow()[child].parent;
        if let Some(old) = old_parent {
            self.nodes.borrow_mut()[old].children.retain(|c| *c != child);
            self.touch(old);
        }
        {
            let mut nodes = self.nodes.borrow_mut();
            let children = &mut nodes[parent].children;
            match at {
                Some(index) if index <= children.len() => children.insert(index, child),
                _ => children.push(child),
            }
            nodes[child].parent = Some(parent);
        }
        self.touch(parent);
    }

    /// Mark observers whose target contains `node` as having a pending batch.
    fn touch(&self, node: usize) {
        let chain = self.ancestors_inclusive(node);
        for slot in self.observers.borrow_mut().iter_mut() {
            if chain.contains(&slot.target) {
                slot.pending = true;
            }
        }
    }

    fn ancestors_inclusive(&self, node: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut chain = vec![node];
        let mut current = nodes[node].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = nodes[parent].parent;
        }
        chain
    }

    fn descendants(&self, node: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<usize> = nodes[node].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(nodes[next].children.iter().rev().copied());
        }
        out
    }

    fn attached_order(&self) -> Vec<usize> {
        let mut order = vec![ROOT];
        order.extend(self.descendants(ROOT));
        order
    }

    fn matches(&self, node: usize, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let data = &nodes[node];
        if data.tag == TEXT_TAG {
            return false;
        }
        if let Some(id) = selector.strip_prefix('#') {
            return data.attrs.get("id").is_some_and(|v| v == id);
        }
        if let Some(class) = selector.strip_prefix('.') {
            return data
                .attrs
                .get("class")
                .is_some_and(|v| v.split_whitespace().any(|c| c == class));
        }
        data.tag == selector
    }

    fn collect_text(&self, node: usize, out: &mut String) {
        let nodes = self.nodes.borrow();
        let data = &nodes[node];
        if data.tag == TEXT_TAG {
            out.push_str(&data.text);
            return;
        }
        let children = data.children.clone();
        drop(nodes);
        for child in children {
            self.collect_text(child, out);
        }
    }

    fn class_list(&self, node: usize) -> Vec<String> {
        self.nodes.borrow()[node]
            .attrs
            .get("class")
            .map(|v| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn set_class_list(&self, node: usize, classes: &[String]) {
        self.nodes.borrow_mut()[node]
            .attrs
            .insert("class".to_owned(), classes.join(" "));
    }
}

impl Page for MemoryPage {
    type Node = NodeRef;
    type Observer = MemoryObserver;
    type Listener = MemoryListener;

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.query_selector(&format!("#{id}"))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeRef> {
        self.attached_order()
            .into_iter()
            .find(|i| self.matches(*i, selector))
            .map(NodeRef)
    }

    fn query_within(&self, scope: &NodeRef, selector: &str) -> Option<NodeRef> {
        self.descendants(scope.0)
            .into_iter()
            .find(|i| self.matches(*i, selector))
            .map(NodeRef)
    }

    fn closest(&self, node: &NodeRef, selector: &str) -> Option<NodeRef> {
        self.ancestors_inclusive(node.0)
            .into_iter()
            .find(|i| self.matches(*i, selector))
            .map(NodeRef)
    }

    fn create_element(&self, tag: &str) -> Result<NodeRef, DomError> {
        if tag.is_empty() || tag.starts_with('#') {
            return Err(DomError::Create(tag.to_owned()));
        }
        Ok(self.alloc(tag))
    }

    fn append_text(&self, parent: &NodeRef, text: &str) -> Result<(), DomError> {
        let node = self.alloc(TEXT_TAG);
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
        self.attach(parent.0, node.0, None);
        Ok(())
    }

    fn append_child(&self, parent: &NodeRef, child: &NodeRef) -> Result<(), DomError> {
        if self.ancestors_inclusive(parent.0).contains(&child.0) {
            return Err(DomError::Insert("node would contain itself".to_owned()));
        }
        self.attach(parent.0, child.0, None);
        Ok(())
    }

    fn insert_before(&self, parent: &NodeRef, child: &NodeRef, reference: Option<&NodeRef>) -> Result<(), DomError> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        if self.ancestors_inclusive(parent.0).contains(&child.0) {
            return Err(DomError::Insert("node would contain itself".to_owned()));
        }
        let index = self.nodes.borrow()[parent.0]
            .children
            .iter()
            .position(|c| *c == reference.0)
            .ok_or_else(|| DomError::Insert("reference is not a child of parent".to_owned()))?;
        self.attach(parent.0, child.0, Some(index));
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeRef, child: &NodeRef) -> Result<(), DomError> {
        if self.ancestors_inclusive(parent.0).contains(&child.0) {
            return Err(DomError::Insert("node would contain itself".to_owned()));
        }
        self.attach(parent.0, child.0, Some(0));
        Ok(())
    }

    fn clear_children(&self, node: &NodeRef) {
        let children = std::mem::take(&mut self.nodes.borrow_mut()[node.0].children);
        if children.is_empty() {
            return;
        }
        for child in children {
            self.nodes.borrow_mut()[child].parent = None;
        }
        self.touch(node.0);
    }

    fn set_attribute(&self, node: &NodeRef, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_text(&self, node: &NodeRef, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let run = self.alloc(TEXT_TAG);
            self.nodes.borrow_mut()[run.0].text = text.to_owned();
            self.attach(node.0, run.0, None);
        }
    }

    fn text(&self, node: &NodeRef) -> String {
        let mut out = String::new();
        self.collect_text(node.0, &mut out);
        out
    }

    fn set_style(&self, node: &NodeRef, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .styles
            .insert(property.to_owned(), value.to_owned());
    }

    fn set_visible(&self, node: &NodeRef, visible: bool) {
        self.set_style(node, "display", if visible { "" } else { "none" });
    }

    fn is_visible(&self, node: &NodeRef) -> bool {
        self.nodes.borrow()[node.0]
            .styles
            .get("display")
            .is_none_or(|v| v != "none")
    }

    fn add_class(&self, node: &NodeRef, class: &str) {
        let mut classes = self.class_list(node.0);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
            self.set_class_list(node.0, &classes);
        }
    }

    fn remove_class(&self, node: &NodeRef, class: &str) {
        let mut classes = self.class_list(node.0);
        classes.retain(|c| c != class);
        self.set_class_list(node.0, &classes);
    }

    fn has_class(&self, node: &NodeRef, class: &str) -> bool {
        self.class_list(node.0).iter().any(|c| c == class)
    }

    fn is_checked(&self, node: &NodeRef) -> bool {
        self.nodes.borrow()[node.0].checked
    }

    fn set_checked(&self, node: &NodeRef, checked: bool) {
        self.nodes.borrow_mut()[node.0].checked = checked;
    }

    fn focus(&self, node: &NodeRef) {
        self.focused.set(Some(node.0));
    }

    fn set_body_attribute(&self, name: &str, value: &str) {
        self.set_attribute(&NodeRef(BODY), name, value);
    }

    fn body_attribute(&self, name: &str) -> Option<String> {
        self.attribute(&NodeRef(BODY), name)
    }

    fn observe_subtree(&self, node: &NodeRef, callback: Box<dyn Fn()>) -> Result<MemoryObserver, DomError> {
        let mut observers = self.observers.borrow_mut();
        observers.push(ObserverSlot { target: node.0, callback: Rc::from(callback), pending: false });
        Ok(MemoryObserver(observers.len() - 1))
    }

    fn listen(&self, kind: ListenerKind, handler: Box<dyn Fn(UiEvent<NodeRef>)>) -> Result<MemoryListener, DomError> {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push(Some((kind, Rc::from(handler))));
        Ok(MemoryListener(listeners.len() - 1))
    }

    fn unlisten(&self, listener: MemoryListener) {
        if let Some(slot) = self.listeners.borrow_mut().get_mut(listener.0) {
            *slot = None;
        }
    }
}
