//! Table selection dialog.
//!
//! The dialog markup (`#tablesModal` with its loading line, empty placeholder
//! and results table) belongs to the host page. This module only toggles it and
//! fills the results `tbody`; a missing element is skipped.

use serde_json::Value;
use tables::TableRecord;

use crate::dom::{DomError, Page, ids};

const SELECT_LABEL: &str = "Select";
const CELL_PADDING: &str = "6px";

/// What [`render`] put on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Empty,
    Populated(usize),
}

pub fn show<P: Page>(page: &P) {
    let Some(modal) = page.element_by_id(ids::MODAL_ID) else {
        return;
    };
    page.remove_class(&modal, ids::HIDDEN_CLASS);
    page.set_attribute(&modal, "tabindex", "-1");
    page.focus(&modal);
}

pub fn hide<P: Page>(page: &P) {
    if let Some(modal) = page.element_by_id(ids::MODAL_ID) {
        page.add_class(&modal, ids::HIDDEN_CLASS);
    }
}

pub fn is_shown<P: Page>(page: &P) -> bool {
    page.element_by_id(ids::MODAL_ID)
        .is_some_and(|modal| !page.has_class(&modal, ids::HIDDEN_CLASS))
}

/// Reset the loading line to `text` and show it.
pub fn show_loading<P: Page>(page: &P, text: &str) {
    if let Some(loading) = page.element_by_id(ids::LOADING_ID) {
        page.set_text(&loading, text);
        page.set_visible(&loading, true);
    }
}

/// Replace the loading line with `text` and hide both result surfaces.
pub fn show_failure<P: Page>(page: &P, text: &str) {
    if let Some(loading) = page.element_by_id(ids::LOADING_ID) {
        page.set_text(&loading, text);
    }
    set_visible_by_id(page, ids::LIST_ID, false);
    set_visible_by_id(page, ids::EMPTY_ID, false);
}

/// Render fetched rows. Anything but a non-empty array shows the empty placeholder.
///
/// # Errors
///
/// Returns [`DomError`] only when the results body itself cannot be created;
/// a row that fails to build is logged and skipped.
pub fn render<P: Page>(page: &P, rows: &Value) -> Result<RenderOutcome, DomError> {
    set_visible_by_id(page, ids::LOADING_ID, false);

    let rows = match rows.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            set_visible_by_id(page, ids::LIST_ID, false);
            set_visible_by_id(page, ids::EMPTY_ID, true);
            return Ok(RenderOutcome::Empty);
        }
    };
    set_visible_by_id(page, ids::EMPTY_ID, false);
    let Some(list) = page.element_by_id(ids::LIST_ID) else {
        log::warn!("#{} is missing, {} rows not shown", ids::LIST_ID, rows.len());
        return Ok(RenderOutcome::Populated(0));
    };
    page.set_visible(&list, true);

    let tbody = match page.query_within(&list, "tbody") {
        Some(tbody) => tbody,
        None => {
            let tbody = page.create_element("tbody")?;
            page.append_child(&list, &tbody)?;
            tbody
        }
    };
    page.clear_children(&tbody);

    let mut rendered = 0;
    for (index, row) in rows.iter().enumerate() {
        match build_row(page, &TableRecord::from_row(row)) {
            Ok(tr) => match page.append_child(&tbody, &tr) {
                Ok(()) => rendered += 1,
                Err(err) => log::error!("row {index} not inserted: {err}"),
            },
            Err(err) => log::error!("row {index} not rendered: {err}"),
        }
    }
    Ok(RenderOutcome::Populated(rendered))
}

#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Snapshot(#[from] tables::SnapshotError),
}

fn build_row<P: Page>(page: &P, table: &TableRecord) -> Result<P::Node, RowError> {
    let snapshot = table.to_snapshot()?;
    let tr = page.create_element("tr")?;
    let price = table.price_label();
    let cells = [
        table.name.as_str(),
        table.table_number.as_str(),
        table.party_size.as_str(),
        table.status.as_str(),
        price.as_str(),
    ];
    for (column, text) in cells.into_iter().enumerate() {
        let td = page.create_element("td")?;
        page.set_style(&td, "padding", CELL_PADDING);
        if column == cells.len() - 1 {
            page.set_style(&td, "text-align", "right");
        }
        page.set_text(&td, text);
        page.append_child(&tr, &td)?;
    }

    let action = page.create_element("td")?;
    page.set_style(&action, "padding", CELL_PADDING);
    let button = page.element_with(
        "button",
        &[
            ("type", "button"),
            ("class", "btn-small table-select-btn"),
            (ids::SNAPSHOT_ATTR, snapshot.as_str()),
        ],
    )?;
    page.set_text(&button, SELECT_LABEL);
    page.append_child(&action, &button)?;
    page.append_child(&tr, &action)?;
    Ok(tr)
}

fn set_visible_by_id<P: Page>(page: &P, id: &str, visible: bool) {
    if let Some(node) = page.element_by_id(id) {
        page.set_visible(&node, visible);
    }
}

#[cfg(test)]
#[path = "tables_modal_test.rs"]
mod tests;
