//! Browser host: hooks are probed on `window` by name on every call, so hooks
//! the page defines after the widget boots are still picked up.

use js_sys::{Function, JSON, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Window};

use super::{Hook, HookError, Host, RecomputeRequest, SelectionEvent};

pub struct WindowHost {
    window: Window,
}

impl WindowHost {
    pub fn from_window() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn hook_fn(&self, hook: Hook) -> Option<Function> {
        Reflect::get(&self.window, &JsValue::from_str(hook.name()))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn require(&self, hook: Hook) -> Result<Function, HookError> {
        self.hook_fn(hook).ok_or(HookError::Missing(hook.name()))
    }
}

fn threw(hook: Hook, err: &JsValue) -> HookError {
    HookError::Threw { hook: hook.name(), message: describe(err) }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl Host for WindowHost {
    fn has(&self, hook: Hook) -> bool {
        self.hook_fn(hook).is_some()
    }

    fn apply_reserved_table_price(&self, price: Option<f64>) -> Result<(), HookError> {
        let hook = Hook::ApplyReservedTablePrice;
        let arg = price.map_or(JsValue::NULL, JsValue::from_f64);
        self.require(hook)?
            .call1(&self.window, &arg)
            .map(|_| ())
            .map_err(|e| threw(hook, &e))
    }

    fn recompute_totals(&self, request: &RecomputeRequest) -> Result<(), HookError> {
        let hook = Hook::RecomputeTotals;
        let raw = serde_json::to_string(request)
            .map_err(|e| HookError::Payload { hook: hook.name(), message: e.to_string() })?;
        let payload = JSON::parse(&raw).map_err(|e| HookError::Payload { hook: hook.name(), message: describe(&e) })?;
        self.require(hook)?
            .call1(&self.window, &payload)
            .map(|_| ())
            .map_err(|e| threw(hook, &e))
    }

    fn render_order(&self) -> Result<(), HookError> {
        let hook = Hook::RenderOrder;
        self.require(hook)?
            .call0(&self.window)
            .map(|_| ())
            .map_err(|e| threw(hook, &e))
    }

    fn broadcast(&self, event: &SelectionEvent<'_>) {
        let init = CustomEventInit::new();
        if let SelectionEvent::Selected(table) = event {
            match table.to_snapshot().map(|raw| JSON::parse(&raw)) {
                Ok(Ok(detail)) => init.set_detail(&detail),
                Ok(Err(err)) => log::warn!("table-selected detail rejected: {}", describe(&err)),
                Err(err) => log::warn!("table-selected detail not serializable: {err}"),
            }
        }
        let dispatched = CustomEvent::new_with_event_init_dict(event.name(), &init)
            .and_then(|ev| self.window.dispatch_event(&ev));
        if let Err(err) = dispatched {
            log::warn!("failed to dispatch {}: {}", event.name(), describe(&err));
        }
    }
}
