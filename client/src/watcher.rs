//! Host-mutation watcher.
//!
//! The host re-renders the order panel by replacing its children. The watcher
//! keeps one subtree observer on `.order-section` and runs a callback, the
//! injector in practice, after every child-list mutation batch under it.

use std::cell::RefCell;

use crate::dom::{Page, ids};

pub struct HostWatcher<O> {
    observer: RefCell<Option<O>>,
}

impl<O> Default for HostWatcher<O> {
    fn default() -> Self {
        Self { observer: RefCell::new(None) }
    }
}

impl<O> HostWatcher<O> {
    /// Start observing. A no-op while already running; does not start when the
    /// page has no `.order-section`, so a later call may still succeed.
    ///
    /// Returns whether the watcher is running after the call.
    pub fn start<P>(&self, page: &P, on_change: Box<dyn Fn()>) -> bool
    where
        P: Page<Observer = O>,
    {
        if self.is_running() {
            return true;
        }
        let Some(section) = page.query_selector(ids::ORDER_SECTION_SELECTOR) else {
            log::debug!("no {} yet, watcher not started", ids::ORDER_SECTION_SELECTOR);
            return false;
        };
        match page.observe_subtree(&section, on_change) {
            Ok(observer) => {
                *self.observer.borrow_mut() = Some(observer);
                true
            }
            Err(err) => {
                log::error!("watcher not started: {err}");
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.observer.borrow().is_some()
    }
}

#[cfg(test)]
#[path = "watcher_test.rs"]
mod tests;
