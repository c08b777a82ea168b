//! Reserved-table selector for the POS order screen.
//!
//! This crate compiles to WebAssembly and augments an order page it does not
//! own: it keeps a "reserved table" control block injected into the order
//! panel, lists reservable tables in the page's dialog, and pushes the chosen
//! table's price into whichever totals hook the page exposes.
//!
//! The core is generic over three ports so it runs natively under test:
//! [`dom::Page`] for the document, [`host::Host`] for the page's hooks and
//! events, and [`net::Transport`] for HTTP. The `hydrate` feature supplies the
//! browser implementations and the wasm entry point.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`widget`] | Assembly, lifecycle and action execution |
//! | [`router`] | Click/key classification into [`router::Action`]s |
//! | [`controller`] | Selected-table state, summary readout, price propagation |
//! | [`components`] | Control block injector and dialog renderer |
//! | [`watcher`] | Re-injection on host re-renders |
//! | [`net`] | Transport port and table fetcher with fallback |
//! | [`host`] | Totals hooks and selection broadcasts |
//! | [`dom`] | Page port, DOM ids and selectors |
//! | [`state`] | Selection slot and dialog state |
//! | [`config`] | Endpoints and copy, overridable from the page |

pub mod components;
pub mod config;
pub mod controller;
pub mod dom;
pub mod host;
pub mod net;
pub mod router;
pub mod state;
pub mod watcher;
pub mod widget;

#[cfg(test)]
mod testing;

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use js_sys::{JSON, Object, Reflect};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::config::WidgetConfig;
    use crate::dom::web::WebPage;
    use crate::host::window::{WindowHost, describe};
    use crate::net::http::BrowserTransport;
    use crate::widget::Widget;

    type BrowserWidget = Widget<WebPage, WindowHost, BrowserTransport>;

    thread_local! {
        static WIDGET: RefCell<Option<Rc<BrowserWidget>>> = const { RefCell::new(None) };
    }

    fn with_widget<R>(f: impl FnOnce(&Rc<BrowserWidget>) -> R) -> Option<R> {
        WIDGET.with(|slot| slot.borrow().as_ref().map(f))
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }
        publish_api();

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.ready_state() != "loading" {
            boot();
            return;
        }
        let on_ready = Closure::once_into_js(boot);
        if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            log::error!("cannot wait for DOMContentLoaded: {}", describe(&err));
        }
    }

    fn boot() {
        if let Some(widget) = with_widget(Rc::clone) {
            widget.init();
            return;
        }
        let (Some(page), Some(host)) = (WebPage::from_window(), WindowHost::from_window()) else {
            log::error!("no window/document, table selector not started");
            return;
        };
        let widget = Widget::new(
            page,
            host,
            BrowserTransport,
            WidgetConfig::from_window(),
            Box::new(|task| wasm_bindgen_futures::spawn_local(task)),
        );
        widget.init();
        WIDGET.with(|slot| *slot.borrow_mut() = Some(widget));
    }

    /// Selected table snapshot, or `null`.
    #[wasm_bindgen(js_name = getSelectedTable)]
    pub fn get_selected_table() -> JsValue {
        let Some(Some(table)) = with_widget(|w| w.selected_table()) else {
            return JsValue::NULL;
        };
        match table.to_snapshot().map(|raw| JSON::parse(&raw)) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                log::error!("snapshot rejected: {}", describe(&err));
                JsValue::NULL
            }
            Err(err) => {
                log::error!("{err}");
                JsValue::NULL
            }
        }
    }

    #[wasm_bindgen(js_name = clearSelectedTable)]
    pub fn clear_selected_table() {
        with_widget(|w| w.clear_selection());
    }

    /// Re-run the injector, e.g. after the page swapped the order panel.
    #[wasm_bindgen(js_name = ensureReservedUI)]
    pub fn ensure_reserved_ui() {
        with_widget(|w| w.ensure_ui());
    }

    /// Mirror the exports on `window.tablesSelect` for non-module page scripts.
    fn publish_api() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let api = Reflect::get(&window, &JsValue::from_str("tablesSelect"))
            .ok()
            .filter(JsValue::is_object)
            .unwrap_or_else(|| Object::new().into());
        let entries: [(&str, JsValue); 3] = [
            ("getSelectedTable", Closure::<dyn Fn() -> JsValue>::new(get_selected_table).into_js_value()),
            ("clearSelectedTable", Closure::<dyn Fn()>::new(clear_selected_table).into_js_value()),
            ("ensureReservedUI", Closure::<dyn Fn()>::new(ensure_reserved_ui).into_js_value()),
        ];
        for (name, function) in entries {
            if let Err(err) = Reflect::set(&api, &JsValue::from_str(name), &function) {
                log::warn!("tablesSelect.{name} not published: {}", describe(&err));
            }
        }
        if let Err(err) = Reflect::set(&window, &JsValue::from_str("tablesSelect"), &api) {
            log::warn!("window.tablesSelect not published: {}", describe(&err));
        }
    }
}
