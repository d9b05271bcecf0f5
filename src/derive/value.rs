//! Row value coercion and comparison.

use crate::types::Row;
use serde_json::Value;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Direct `row[key]` access. Missing members and non-object rows read as null.
pub fn field<'a>(row: &'a Row, key: &str) -> &'a Value {
    match row {
        Value::Object(map) => map.get(key).unwrap_or(&Value::Null),
        _ => &Value::Null,
    }
}

/// Display form used for filter comparison and string sorting.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                // Same exponent cutoffs as a JS number-to-string.
                Some(f) if f != 0.0 && (f.abs() >= 1e21 || f.abs() < 1e-6) => {
                    exponent_string(f)
                }
                Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", f as i128),
                Some(f) => f.to_string(),
                None => n.to_string(),
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `1e21` -> `1e+21`, `1.5e-7` stays as is.
fn exponent_string(f: f64) -> String {
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased with accents kept, so `a` sorts before `á`.
fn secondary_key(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

/// Collation-style comparison in three levels: base letters, then accents,
/// then case with lowercase first. Byte order breaks any remaining tie.
///
/// `Álvaro` sorts with the a's and `Ñandú` with the n's instead of after `z`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Compare two non-null values: numerically when both are numbers,
/// otherwise by their display strings.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => locale_compare(&display_string(a), &display_string(b)),
    }
}
