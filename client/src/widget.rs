//! Widget assembly: wires injector, watcher, fetcher, modal and controller
//! behind the event router.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `Widget` lives per page, on the main thread. It is held in an `Rc`;
//! document listeners and the mutation watcher hold `Weak` references back to
//! it, and an open request holds a strong one until its fetch settles.
//!
//! DESIGN
//! ======
//! Every open takes the next request token. When
//! `WidgetConfig::discard_stale_responses` is set, a response whose token is no
//! longer the newest is dropped, so overlapping opens always show the rows of
//! the last click.
//!
//! TRADE-OFFS
//! ==========
//! Requests carry no timeout. A hung request leaves the modal in `Loading`
//! until the operator closes it or opens again.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use tables::TableRecord;

use crate::components::control_block::ensure_injected;
use crate::components::tables_modal::{self, RenderOutcome};
use crate::config::WidgetConfig;
use crate::controller::SelectionController;
use crate::dom::{ListenerKind, Page, UiEvent, ids};
use crate::host::Host;
use crate::net::{TableFetcher, Transport};
use crate::router::{Action, route_click, route_key};
use crate::state::{ModalState, RowSnapshot};
use crate::watcher::HostWatcher;

/// Runs a detached local task; `wasm_bindgen_futures::spawn_local` in the browser.
pub type Spawner = Box<dyn Fn(Pin<Box<dyn Future<Output = ()>>>)>;

pub struct Widget<P: Page, H, T> {
    page: P,
    host: H,
    fetcher: TableFetcher<T>,
    config: WidgetConfig,
    controller: SelectionController,
    modal: Cell<ModalState>,
    fetch_seq: Cell<u64>,
    watcher: HostWatcher<P::Observer>,
    listeners: RefCell<Vec<P::Listener>>,
    spawn: Spawner,
}

impl<P, H, T> Widget<P, H, T>
where
    P: Page + 'static,
    H: Host + 'static,
    T: Transport + 'static,
{
    pub fn new(page: P, host: H, transport: T, config: WidgetConfig, spawn: Spawner) -> Rc<Self> {
        Rc::new(Self {
            fetcher: TableFetcher::new(transport, &config),
            page,
            host,
            config,
            controller: SelectionController::default(),
            modal: Cell::new(ModalState::Hidden),
            fetch_seq: Cell::new(0),
            watcher: HostWatcher::default(),
            listeners: RefCell::new(Vec::new()),
            spawn,
        })
    }

    /// Inject the control block, (re)install document listeners and start the
    /// watcher. Safe to call again; listeners are never doubled.
    pub fn init(self: &Rc<Self>) {
        self.ensure_ui();
        self.install_listeners();
        let weak = Rc::downgrade(self);
        let running = self.watcher.start(
            &self.page,
            Box::new(move || {
                if let Some(widget) = weak.upgrade() {
                    widget.ensure_ui();
                }
            }),
        );
        log::info!("table selector ready (watching host: {running})");
    }

    /// Make sure the control block is on the page. Returns whether it was inserted.
    pub fn ensure_ui(&self) -> bool {
        ensure_injected(&self.page).unwrap_or_else(|err| {
            log::error!("reserved-table block not injected: {err}");
            false
        })
    }

    fn install_listeners(self: &Rc<Self>) {
        let previous: Vec<P::Listener> = self.listeners.borrow_mut().drain(..).collect();
        for listener in previous {
            self.page.unlisten(listener);
        }
        for kind in [ListenerKind::Click, ListenerKind::KeyDown] {
            let weak = Rc::downgrade(self);
            let handler = Box::new(move |event: UiEvent<P::Node>| {
                if let Some(widget) = weak.upgrade() {
                    widget.on_event(event);
                }
            });
            match self.page.listen(kind, handler) {
                Ok(listener) => self.listeners.borrow_mut().push(listener),
                Err(err) => log::error!("{err}"),
            }
        }
    }

    fn on_event(self: &Rc<Self>, event: UiEvent<P::Node>) {
        let action = match event {
            UiEvent::Click { target } => route_click(&self.page, &target),
            UiEvent::Key { key } => route_key(&key),
        };
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    /// Execute a routed action.
    pub fn dispatch(self: &Rc<Self>, action: Action) {
        match action {
            Action::OpenSelector => {
                let widget = Rc::clone(self);
                (self.spawn)(Box::pin(async move { widget.open_selector().await }));
            }
            Action::ClearSelection => self.clear_selection(),
            Action::CloseModal => self.close_modal(),
            Action::SelectRow { snapshot } => match RowSnapshot::parse(&snapshot) {
                Ok(snapshot) => {
                    self.controller.apply_selection(&self.page, &self.host, snapshot);
                    self.close_modal();
                }
                Err(err) => log::error!("{err}"),
            },
        }
    }

    /// Show the modal in `Loading`, fetch, then render rows or the failure text.
    pub async fn open_selector(&self) {
        let token = self.fetch_seq.get() + 1;
        self.fetch_seq.set(token);
        let use_reserved = self
            .page
            .element_by_id(ids::CHECKBOX_ID)
            .is_some_and(|checkbox| self.page.is_checked(&checkbox));

        tables_modal::show_loading(&self.page, &self.config.loading_text);
        tables_modal::show(&self.page);
        self.modal.set(ModalState::Loading);

        let result = self.fetcher.fetch(use_reserved).await;
        if self.config.discard_stale_responses && token != self.fetch_seq.get() {
            log::debug!("dropping stale table response #{token}");
            return;
        }

        let next = match result.map(|rows| tables_modal::render(&self.page, &rows)) {
            Ok(Ok(RenderOutcome::Empty)) => ModalState::Empty,
            Ok(Ok(RenderOutcome::Populated(count))) => {
                log::debug!("{count} tables listed");
                ModalState::Populated
            }
            Ok(Err(err)) => {
                log::error!("failed to render tables: {err}");
                self.fail();
                ModalState::Failed
            }
            Err(err) => {
                log::error!("failed to fetch tables: {err}");
                self.fail();
                ModalState::Failed
            }
        };
        if self.modal.get().is_open() {
            self.modal.set(next);
        }
    }

    fn fail(&self) {
        tables_modal::show_failure(&self.page, &self.config.failure_text);
    }

    pub fn close_modal(&self) {
        tables_modal::hide(&self.page);
        self.modal.set(ModalState::Hidden);
    }

    pub fn clear_selection(&self) {
        self.controller.clear_selection(&self.page, &self.host);
    }

    pub fn selected_table(&self) -> Option<TableRecord> {
        self.controller.current()
    }

    pub fn modal_state(&self) -> ModalState {
        self.modal.get()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
