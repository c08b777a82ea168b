//! Reserved-table control block injected into the order panel.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host renderer owns the order panel and rebuilds it wholesale. The block
//! is therefore never cached: [`ensure_injected`] checks for the checkbox id
//! and rebuilds the whole block when it is gone.
//!
//! DESIGN
//! ======
//! The block is assembled detached and inserted with a single call, so a
//! subtree observer on the panel sees one mutation batch per injection.

use crate::dom::{DomError, Page, ids};

/// Text placeholder shown in summary fields without a selection.
pub const PLACEHOLDER: &str = "—";
pub const PRICE_PLACEHOLDER: &str = "0.00";

const CHECKBOX_LABEL: &str = "Customer has a reserved table";
const OPEN_LABEL: &str = "Choose table";
const CLEAR_LABEL: &str = "Clear";

/// Where the block goes relative to the host markup.
enum Anchor<N> {
    Before { parent: N, reference: N },
    First { parent: N },
    Last { parent: N },
}

/// Insert the control block unless it is already present.
///
/// Returns `Ok(true)` when a block was inserted and `Ok(false)` when the block
/// already exists or the page has no order panel to anchor it to.
///
/// # Errors
///
/// Returns [`DomError`] if the page rejects element creation or insertion.
pub fn ensure_injected<P: Page>(page: &P) -> Result<bool, DomError> {
    if page.element_by_id(ids::CHECKBOX_ID).is_some() {
        return Ok(false);
    }
    let Some(anchor) = find_anchor(page) else {
        return Ok(false);
    };
    let block = build_block(page)?;
    match anchor {
        Anchor::Before { parent, reference } => page.insert_before(&parent, &block, Some(&reference))?,
        Anchor::First { parent } => page.prepend_child(&parent, &block)?,
        Anchor::Last { parent } => page.append_child(&parent, &block)?,
    }
    log::debug!("reserved-table block injected");
    Ok(true)
}

fn find_anchor<P: Page>(page: &P) -> Option<Anchor<P::Node>> {
    let compute = page
        .element_by_id(ids::ORDER_COMPUTE_ID)
        .or_else(|| page.query_selector(ids::ORDER_COMPUTE_SELECTOR));
    if let Some(parent) = compute {
        return Some(match page.query_within(&parent, ids::COMPUTE_ACTIONS_SELECTOR) {
            Some(reference) => Anchor::Before { parent, reference },
            None => Anchor::First { parent },
        });
    }
    let parent = page.query_selector(ids::ORDER_SECTION_SELECTOR)?;
    Some(match page.query_within(&parent, ids::ORDER_BUTTONS_SELECTOR) {
        Some(reference) => Anchor::Before { parent, reference },
        None => Anchor::Last { parent },
    })
}

fn build_block<P: Page>(page: &P) -> Result<P::Node, DomError> {
    let block = page.element_with("div", &[("class", ids::BLOCK_CLASS)])?;
    page.set_style(&block, "padding", "8px");
    page.set_style(&block, "border-bottom", "1px solid rgba(0,0,0,0.05)");
    page.set_style(&block, "box-sizing", "border-box");

    let label = page.element_with("label", &[("class", "reserved-checkbox-label")])?;
    page.set_style(&label, "display", "flex");
    page.set_style(&label, "align-items", "center");
    page.set_style(&label, "gap", "8px");
    let checkbox = page.element_with(
        "input",
        &[("type", "checkbox"), ("id", ids::CHECKBOX_ID), ("aria-controls", ids::MODAL_ID)],
    )?;
    let caption = page.create_element("span")?;
    page.set_text(&caption, CHECKBOX_LABEL);
    page.append_child(&label, &checkbox)?;
    page.append_child(&label, &caption)?;
    page.append_child(&block, &label)?;

    let open = page.element_with("button", &[("type", "button"), ("id", ids::OPEN_BUTTON_ID), ("class", "btn-small")])?;
    page.set_text(&open, OPEN_LABEL);
    page.set_style(&open, "margin-top", "8px");
    page.append_child(&block, &open)?;

    let summary = build_summary(page)?;
    page.append_child(&block, &summary)?;
    Ok(block)
}

/// `Selected table: <name> (Table <n>, Party size: <p>, Price: ₱<price>) [Clear]`
fn build_summary<P: Page>(page: &P) -> Result<P::Node, DomError> {
    let summary = page.element_with("div", &[("id", ids::SUMMARY_ID)])?;
    page.set_visible(&summary, false);
    page.set_style(&summary, "margin-top", "8px");
    page.set_style(&summary, "font-size", "13px");

    let fields = [
        ("Selected table: ", "strong", ids::SUMMARY_NAME_ID, PLACEHOLDER),
        (" (Table ", "span", ids::SUMMARY_NUMBER_ID, PLACEHOLDER),
        (", Party size: ", "span", ids::SUMMARY_PARTY_ID, PLACEHOLDER),
        (", Price: ₱", "span", ids::SUMMARY_PRICE_ID, PRICE_PLACEHOLDER),
    ];
    for (prefix, tag, id, placeholder) in fields {
        page.append_text(&summary, prefix)?;
        let field = page.element_with(tag, &[("id", id)])?;
        page.set_text(&field, placeholder);
        page.append_child(&summary, &field)?;
    }
    page.append_text(&summary, ") ")?;

    let clear = page.element_with("button", &[("type", "button"), ("id", ids::CLEAR_BUTTON_ID), ("class", "btn-link")])?;
    page.set_style(&clear, "margin-left", "8px");
    page.set_text(&clear, CLEAR_LABEL);
    page.append_child(&summary, &clear)?;
    Ok(summary)
}

#[cfg(test)]
#[path = "control_block_test.rs"]
mod tests;
