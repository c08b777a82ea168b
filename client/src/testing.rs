//! Test doubles: a recording host, a scripted transport, and a local task
//! pool standing in for the browser's microtask queue.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use tables::TableRecord;

use crate::host::{Hook, HookError, Host, RecomputeRequest, SelectionEvent};
use crate::net::{FetchError, HttpResponse, Transport};
use crate::widget::Spawner;

// =============================================================================
// HOST
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    Apply(Option<f64>),
    Recompute(RecomputeRequest),
    Render,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Broadcast {
    Selected(TableRecord),
    Cleared,
}

#[derive(Default)]
pub struct RecordingHost {
    hooks: Vec<Hook>,
    failing: Option<Hook>,
    pub calls: RefCell<Vec<HostCall>>,
    pub broadcasts: RefCell<Vec<Broadcast>>,
}

impl RecordingHost {
    /// Host page defining exactly `hooks`.
    pub fn with_hooks(hooks: &[Hook]) -> Self {
        Self { hooks: hooks.to_vec(), ..Self::default() }
    }

    /// Make `hook` throw when called.
    pub fn failing(mut self, hook: Hook) -> Self {
        self.failing = Some(hook);
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.broadcasts.borrow().clone()
    }

    fn record(&self, hook: Hook, call: HostCall) -> Result<(), HookError> {
        if !self.has(hook) {
            return Err(HookError::Missing(hook.name()));
        }
        self.calls.borrow_mut().push(call);
        if self.failing == Some(hook) {
            return Err(HookError::Threw { hook: hook.name(), message: "host exploded".to_owned() });
        }
        Ok(())
    }
}

impl Host for RecordingHost {
    fn has(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }

    fn apply_reserved_table_price(&self, price: Option<f64>) -> Result<(), HookError> {
        self.record(Hook::ApplyReservedTablePrice, HostCall::Apply(price))
    }

    fn recompute_totals(&self, request: &RecomputeRequest) -> Result<(), HookError> {
        self.record(Hook::RecomputeTotals, HostCall::Recompute(request.clone()))
    }

    fn render_order(&self) -> Result<(), HookError> {
        self.record(Hook::RenderOrder, HostCall::Render)
    }

    fn broadcast(&self, event: &SelectionEvent<'_>) {
        let entry = match event {
            SelectionEvent::Selected(table) => Broadcast::Selected((*table).clone()),
            SelectionEvent::Cleared => Broadcast::Cleared,
        };
        self.broadcasts.borrow_mut().push(entry);
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

pub enum Reply {
    Status(u16, String),
    Fail(String),
    /// Resolves when the paired sender fires.
    Gated(oneshot::Receiver<HttpResponse>),
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Reply>>,
    requests: Vec<String>,
}

/// Transport answering each URL from a queue of scripted replies. Clones share
/// the same script so a test can keep a handle after handing one to a fetcher.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn reply(&self, url: &str, reply: Reply) -> &Self {
        self.script
            .borrow_mut()
            .replies
            .entry(url.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(&self, url: &str, status: u16, body: &str) -> &Self {
        self.reply(url, Reply::Status(status, body.to_owned()))
    }

    /// Queue a reply that waits for the returned sender.
    pub fn gate(&self, url: &str) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.reply(url, Reply::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.script.borrow().requests.clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let next = {
            let mut script = self.script.borrow_mut();
            script.requests.push(url.to_owned());
            script.replies.get_mut(url).and_then(VecDeque::pop_front)
        };
        let transport = |message: String| FetchError::Transport { url: url.to_owned(), message };
        match next {
            Some(Reply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Fail(message)) => Err(transport(message)),
            Some(Reply::Gated(rx)) => rx.await.map_err(|_| transport("gate dropped".to_owned())),
            None => Err(transport("no scripted reply".to_owned())),
        }
    }
}

pub fn ok_json(body: &str) -> HttpResponse {
    HttpResponse { status: 200, body: body.to_owned() }
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// Single-threaded pool; tasks run only when the test drives it.
pub struct Tasks {
    pool: RefCell<LocalPool>,
}

impl Tasks {
    pub fn new() -> Rc<Self> {
        Rc::new(Self { pool: RefCell::new(LocalPool::new()) })
    }

    pub fn spawner(&self) -> Spawner {
        let spawner = self.pool.borrow().spawner();
        Box::new(move |task| spawner.spawn_local(task).expect("spawn task"))
    }

    pub fn run(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}
