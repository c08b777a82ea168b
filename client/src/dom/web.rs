//! `web-sys` implementation of [`Page`].
//!
//! Selectors are passed straight to `querySelector`. Best-effort setters drop
//! the `JsValue` error a hostile host could raise; structural calls surface it
//! as [`DomError`].

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, MutationObserver, MutationObserverInit,
    Node,
};

use super::{DomError, ListenerKind, Page, UiEvent};
use crate::host::window::describe;

pub struct WebPage {
    document: Document,
}

/// Disconnects the observer when dropped.
pub struct WebObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub struct WebListener {
    kind: ListenerKind,
    callback: Closure<dyn FnMut(Event)>,
}

impl WebPage {
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    fn event_type(kind: ListenerKind) -> &'static str {
        match kind {
            ListenerKind::Click => "click",
            ListenerKind::KeyDown => "keydown",
        }
    }
}

fn insert_err(err: &JsValue) -> DomError {
    DomError::Insert(describe(err))
}

/// Element a click originated from; text-node targets resolve to their parent.
fn click_target(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

impl Page for WebPage {
    type Node = Element;
    type Observer = WebObserver;
    type Listener = WebListener;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document
            .create_element(tag)
            .map_err(|_| DomError::Create(tag.to_owned()))
    }

    fn append_text(&self, parent: &Element, text: &str) -> Result<(), DomError> {
        let run = self.document.create_text_node(text);
        parent.append_child(&run).map(|_| ()).map_err(|e| insert_err(&e))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(|e| insert_err(&e))
    }

    fn insert_before(&self, parent: &Element, child: &Element, reference: Option<&Element>) -> Result<(), DomError> {
        let reference: Option<&Node> = reference.map(AsRef::as_ref);
        parent
            .insert_before(child, reference)
            .map(|_| ())
            .map_err(|e| insert_err(&e))
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        let first = parent.first_child();
        parent
            .insert_before(child, first.as_ref())
            .map(|_| ())
            .map_err(|e| insert_err(&e))
    }

    fn clear_children(&self, node: &Element) {
        node.set_inner_html("");
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            log::debug!("set_attribute {name} rejected: {}", describe(&err));
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(html) = node.dyn_ref::<HtmlElement>()
            && let Err(err) = html.style().set_property(property, value)
        {
            log::debug!("style {property} rejected: {}", describe(&err));
        }
    }

    fn set_visible(&self, node: &Element, visible: bool) {
        self.set_style(node, "display", if visible { "" } else { "none" });
    }

    fn is_visible(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlElement>()
            .and_then(|html| html.style().get_property_value("display").ok())
            .is_none_or(|display| display != "none")
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            log::debug!("add class {class} rejected: {}", describe(&err));
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            log::debug!("remove class {class} rejected: {}", describe(&err));
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, node: &Element, checked: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn focus(&self, node: &Element) {
        if let Some(html) = node.dyn_ref::<HtmlElement>()
            && let Err(err) = html.focus()
        {
            log::debug!("focus rejected: {}", describe(&err));
        }
    }

    fn set_body_attribute(&self, name: &str, value: &str) {
        if let Some(body) = self.document.body() {
            self.set_attribute(&body, name, value);
        }
    }

    fn body_attribute(&self, name: &str) -> Option<String> {
        self.document.body()?.get_attribute(name)
    }

    fn observe_subtree(&self, node: &Element, callback: Box<dyn Fn()>) -> Result<WebObserver, DomError> {
        let closure = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| callback(),
        );
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| DomError::Observe(describe(&e)))?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(node, &options)
            .map_err(|e| DomError::Observe(describe(&e)))?;
        Ok(WebObserver { observer, _callback: closure })
    }

    fn listen(&self, kind: ListenerKind, handler: Box<dyn Fn(UiEvent<Element>)>) -> Result<WebListener, DomError> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| match kind {
            ListenerKind::Click => {
                if let Some(target) = click_target(&event) {
                    handler(UiEvent::Click { target });
                }
            }
            ListenerKind::KeyDown => {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                    handler(UiEvent::Key { key });
                }
            }
        });
        self.document
            .add_event_listener_with_callback(Self::event_type(kind), callback.as_ref().unchecked_ref())
            .map_err(|_| DomError::Listen(kind))?;
        Ok(WebListener { kind, callback })
    }

    fn unlisten(&self, listener: WebListener) {
        let removed = self.document.remove_event_listener_with_callback(
            Self::event_type(listener.kind),
            listener.callback.as_ref().unchecked_ref(),
        );
        if let Err(err) = removed {
            log::debug!("remove listener rejected: {}", describe(&err));
        }
    }
}
