//! Cell value helpers.
//!
//! Checks never compare cells as native numbers: every non-null value is
//! rendered to text first, the way a member record would be read.

use polars::prelude::AnyValue;

/// Returns true for the table's null markers: `Null` and floating-point NaN.
pub fn is_null(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Renders a cell to its string form, or `None` for a null cell.
///
/// Integral floats drop their trailing zeros, so a `5508.0` read from a
/// spreadsheet is checked as `5508`.
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    if is_null(&value) {
        return None;
    }
    let text = match value {
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    };
    Some(text)
}

/// Formats a float without trailing zeros after the decimal point.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}
