//! Shared reserved-table row model.
//!
//! This crate owns the row shape used by both the reservations service and the
//! browser widget. Rows in the store spell each field several ways; every
//! consumer resolves them through the same ordered candidate lists so the two
//! sides never disagree about what a table is called or what it costs.
//!
//! DESIGN
//! ======
//! Resolution follows loose truthiness: a candidate key wins only when it is
//! present and non-empty (`null`, `false`, `0` and `""` fall through to the next
//! candidate). Nothing in this module fails on malformed input; every field has
//! a typed default.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Candidate keys for the table identifier, in priority order.
pub const ID_KEYS: &[&str] = &["id", "table_id"];
/// Candidate keys for the guest / display name.
pub const NAME_KEYS: &[&str] = &["name", "guest_name", "guest"];
/// Candidate keys for the table slot label.
pub const TABLE_NUMBER_KEYS: &[&str] = &["table_number", "table_no", "number"];
/// Candidate keys for the party size.
pub const PARTY_SIZE_KEYS: &[&str] = &["party_size", "pax", "seats"];
/// Candidate keys for the reservation status.
pub const STATUS_KEYS: &[&str] = &["status", "reservation_status"];
/// Candidate keys for the reservation price.
pub const PRICE_KEYS: &[&str] = &["price", "reservation_price"];

/// Error returned by [`TableRecord::from_snapshot`] and [`TableRecord::to_snapshot`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The stored snapshot is not a JSON object of the expected shape.
    #[error("failed to parse table snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// TABLE ID
// =============================================================================

/// Opaque table identifier. The store hands out integers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableId {
    Int(i64),
    Text(String),
}

impl TableId {
    /// Build an identifier from an arbitrary JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.as_i64() {
            Some(n) => Self::Int(n),
            None => Self::Text(display_text(value)),
        }
    }
}

// Numbers are kept verbatim (`arbitrary_precision`), which untagged derives
// cannot buffer; go through `Value` instead.
impl<'de> Deserialize<'de> for TableId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(&Value::deserialize(deserializer)?))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// TABLE RECORD
// =============================================================================

/// A read-only snapshot of one reservable table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRecord {
    pub id: Option<TableId>,
    pub name: String,
    /// Slot label; falls back to the id when the row carries no number.
    pub table_number: String,
    pub party_size: String,
    pub status: String,
    /// Always finite and non-negative.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl TableRecord {
    /// Normalize one tolerant-shaped row. Non-object input yields an empty record.
    #[must_use]
    pub fn from_row(row: &Value) -> Self {
        let id = first_truthy(row, ID_KEYS).map(TableId::from_value);
        let table_number = first_truthy(row, TABLE_NUMBER_KEYS)
            .map(display_text)
            .or_else(|| id.as_ref().map(ToString::to_string))
            .unwrap_or_default();

        Self {
            name: text_field(row, NAME_KEYS),
            table_number,
            party_size: text_field(row, PARTY_SIZE_KEYS),
            status: text_field(row, STATUS_KEYS),
            price: first_truthy(row, PRICE_KEYS).map_or(0.0, parse_price),
            id,
        }
    }

    /// Normalize every row of a payload. Anything but an array yields no rows.
    #[must_use]
    pub fn from_rows(payload: &Value) -> Vec<Self> {
        payload
            .as_array()
            .map(|rows| rows.iter().map(Self::from_row).collect())
            .unwrap_or_default()
    }

    /// Serialize the record into the self-contained snapshot stored on select triggers.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot previously produced by [`TableRecord::to_snapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] when the text is not a JSON object with
    /// string-valued text fields.
    pub fn from_snapshot(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Price rendered with exactly two decimal digits.
    #[must_use]
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }

    /// Ordering key: leading integer of the table number, then the label itself.
    #[must_use]
    pub fn sort_key(&self) -> (u64, &str) {
        (table_number_sort_key(&self.table_number), self.table_number.as_str())
    }

    /// Whether the record's status marks it as booked or reserved.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        is_reserved_status(&self.status)
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(parse_price(&raw))
}

// =============================================================================
// FIELD RESOLUTION
// =============================================================================

/// Loose truthiness: `null`, `false`, zero and the empty string are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First candidate key whose value is present and truthy.
#[must_use]
pub fn first_truthy<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = row.as_object()?;
    keys.iter().find_map(|key| obj.get(*key).filter(|v| is_truthy(v)))
}

fn text_field(row: &Value, keys: &[&str]) -> String {
    first_truthy(row, keys).map(display_text).unwrap_or_default()
}

/// Render a JSON scalar as display text. Integral numbers print without a fraction.
#[must_use]
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
                Some(f) => f.to_string(),
                None => n.to_string(),
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

// =============================================================================
// PRICE
// =============================================================================

/// Coerce any JSON value into a price.
///
/// Numbers are taken as-is; strings contribute their leading numeric prefix
/// (`"12.5 PHP"` is `12.5`). Anything unparseable, non-finite or negative is `0`.
#[must_use]
pub fn parse_price(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

/// Parse the longest leading decimal literal of `s` after leading whitespace.
#[must_use]
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().map_or(None, Some)
}

/// Format a price with exactly two decimal digits.
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

// =============================================================================
// STATUS + ORDERING
// =============================================================================

/// Loose reservation match: any status mentioning `reserv` or `book`.
#[must_use]
pub fn is_reserved_status(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    status.contains("reserv") || status.contains("book")
}

/// Leading unsigned integer of a table label; labels without one sort as `0`.
#[must_use]
pub fn table_number_sort_key(label: &str) -> u64 {
    label
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d - b'0')))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
