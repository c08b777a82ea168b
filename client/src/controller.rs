//! Selection controller.
//!
//! DESIGN
//! ======
//! Owns the selected-table slot and keeps three observers of it in step: the
//! summary readout in the control block, the `data-reserved-table-price` body
//! attribute, and whichever totals hook the host exposes.
//!
//! ERROR HANDLING
//! ==============
//! Missing summary elements are skipped and hook failures are logged; neither
//! stops the state change or the remaining updates.

use std::cell::RefCell;

use tables::{TableRecord, format_price};

use crate::components::control_block::{PLACEHOLDER, PRICE_PLACEHOLDER};
use crate::dom::{Page, ids};
use crate::host::{Hook, Host, RecomputeRequest, SelectionEvent};
use crate::state::{RowSnapshot, SelectionState};

/// Direction of a price propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceUpdate {
    Apply,
    Clear,
}

#[derive(Default)]
pub struct SelectionController {
    state: RefCell<SelectionState>,
}

impl SelectionController {
    /// Currently selected table, if any.
    pub fn current(&self) -> Option<TableRecord> {
        self.state.borrow().current().cloned()
    }

    pub fn apply_selection<P: Page, H: Host>(&self, page: &P, host: &H, snapshot: RowSnapshot) {
        let table = self.state.borrow_mut().select(snapshot).clone();

        let number = if table.table_number.is_empty() {
            table.id.as_ref().map(ToString::to_string).unwrap_or_default()
        } else {
            table.table_number.clone()
        };
        set_field(page, ids::SUMMARY_NAME_ID, or_placeholder(&table.name));
        set_field(page, ids::SUMMARY_NUMBER_ID, or_placeholder(&number));
        set_field(page, ids::SUMMARY_PARTY_ID, or_placeholder(&table.party_size));
        set_field(page, ids::SUMMARY_PRICE_ID, &format_price(table.price));
        show_summary(page, true);

        if let Some(checkbox) = page.element_by_id(ids::CHECKBOX_ID)
            && !page.is_checked(&checkbox)
        {
            page.set_checked(&checkbox, true);
        }

        host.broadcast(&SelectionEvent::Selected(&table));
        page.set_body_attribute(ids::PRICE_BODY_ATTR, &table.price.to_string());
        let used = propagate_price(page, host, table.price, PriceUpdate::Apply);
        log::info!("table {number} selected, price {:.2} via {used:?}", table.price);
    }

    pub fn clear_selection<P: Page, H: Host>(&self, page: &P, host: &H) {
        let previous = self.state.borrow_mut().clear();

        set_field(page, ids::SUMMARY_NAME_ID, PLACEHOLDER);
        set_field(page, ids::SUMMARY_NUMBER_ID, PLACEHOLDER);
        set_field(page, ids::SUMMARY_PARTY_ID, PLACEHOLDER);
        set_field(page, ids::SUMMARY_PRICE_ID, PRICE_PLACEHOLDER);
        show_summary(page, false);

        host.broadcast(&SelectionEvent::Cleared);
        page.set_body_attribute(ids::PRICE_BODY_ATTR, "0");
        let used = propagate_price(page, host, 0.0, PriceUpdate::Clear);

        if let Some(checkbox) = page.element_by_id(ids::CHECKBOX_ID) {
            page.set_checked(&checkbox, false);
        }
        log::info!("selection cleared (had table: {}) via {used:?}", previous.is_some());
    }
}

/// Hand `price` to the first totals hook the host defines.
///
/// Returns the hook that was called, or `None` when the host has none. A hook
/// that throws still counts as used; the failure is logged.
pub fn propagate_price<P: Page, H: Host>(page: &P, host: &H, price: f64, update: PriceUpdate) -> Option<Hook> {
    let clearing = update == PriceUpdate::Clear;
    let (hook, result) = if host.has(Hook::ApplyReservedTablePrice) {
        let arg = if clearing { None } else { Some(price) };
        (Hook::ApplyReservedTablePrice, host.apply_reserved_table_price(arg))
    } else if host.has(Hook::RecomputeTotals) {
        let request = if clearing { RecomputeRequest::clear() } else { RecomputeRequest::apply(price) };
        (Hook::RecomputeTotals, host.recompute_totals(&request))
    } else if host.has(Hook::RenderOrder) {
        let value = if clearing { "0".to_owned() } else { price.to_string() };
        page.set_body_attribute(ids::PRICE_BODY_ATTR, &value);
        (Hook::RenderOrder, host.render_order())
    } else {
        return None;
    };
    if let Err(err) = result {
        log::error!("price propagation failed: {err}");
    }
    Some(hook)
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() { PLACEHOLDER } else { text }
}

fn set_field<P: Page>(page: &P, id: &str, text: &str) {
    if let Some(field) = page.element_by_id(id) {
        page.set_text(&field, text);
    }
}

fn show_summary<P: Page>(page: &P, visible: bool) {
    if let Some(summary) = page.element_by_id(ids::SUMMARY_ID) {
        page.set_visible(&summary, visible);
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
