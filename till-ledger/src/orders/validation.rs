//! Draft validation, run before any storage access
//!
//! The total formula (`subtotal + tax + tip + card_fee - discounts`) is the
//! caller's responsibility and is not checked here.

use super::error::{LedgerError, LedgerResult};
use super::money::MAX_AMOUNT;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::order::{LineDraft, OrderDraft};

/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 9999;

fn require_id(value: &str, field: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_amount(value: Decimal, field: &str) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::validation(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(LedgerError::validation(
            field,
            format!("exceeds maximum allowed ({MAX_AMOUNT}), got {value}"),
        ));
    }
    Ok(())
}

fn validate_line(index: usize, line: &LineDraft) -> LedgerResult<()> {
    require_id(&line.item_id, &format!("lines[{index}].item_id"))?;

    if line.quantity <= 0 {
        return Err(LedgerError::validation(
            format!("lines[{index}].quantity"),
            format!("must be positive, got {}", line.quantity),
        ));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(LedgerError::validation(
            format!("lines[{index}].quantity"),
            format!("exceeds maximum allowed ({MAX_QUANTITY}), got {}", line.quantity),
        ));
    }

    require_amount(line.unit_price, &format!("lines[{index}].unit_price"))?;
    require_amount(line.line_total, &format!("lines[{index}].line_total"))?;

    for (j, option) in line.options.iter().enumerate() {
        require_id(&option.option_id, &format!("lines[{index}].options[{j}].option_id"))?;
        require_amount(option.price, &format!("lines[{index}].options[{j}].price"))?;
    }
    Ok(())
}

/// Reject malformed drafts
pub fn validate_draft(draft: &OrderDraft) -> LedgerResult<()> {
    require_id(&draft.staff_id, "staff_id")?;

    require_amount(draft.subtotal, "subtotal")?;
    require_amount(draft.tax, "tax")?;
    require_amount(draft.tip, "tip")?;
    require_amount(draft.card_fee, "card_fee")?;
    require_amount(draft.total, "total")?;

    // Tendered/change only make sense when cash changes hands
    if !draft.tender.is_cash() {
        if draft.tendered.is_some() {
            return Err(LedgerError::validation("tendered", "only allowed for cash tenders"));
        }
        if draft.change.is_some() {
            return Err(LedgerError::validation("change", "only allowed for cash tenders"));
        }
    }
    if let Some(tendered) = draft.tendered {
        require_amount(tendered, "tendered")?;
    }
    if let Some(change) = draft.change {
        require_amount(change, "change")?;
    }

    for (i, line) in draft.lines.iter().enumerate() {
        validate_line(i, line)?;
    }

    for (k, discount) in draft.discounts.iter().enumerate() {
        require_id(&discount.discount_id, &format!("discounts[{k}].discount_id"))?;
        require_amount(discount.amount, &format!("discounts[{k}].amount"))?;
    }

    Ok(())
}

/// Inclusive calendar range, `last` not before `first`
pub fn validate_date_range(first: NaiveDate, last: NaiveDate) -> LedgerResult<()> {
    if last < first {
        return Err(LedgerError::validation(
            "date range",
            format!("end date {last} is before start date {first}"),
        ));
    }
    Ok(())
}
