// Utility helpers for cell parsing and label normalization.
//
// This module centralizes all the "dirty" cell handling from the source
// tables so the rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder pair the source tables write for "not applicable".
const NOT_APPLICABLE: &str = "x x";

/// Sub-header token that marks a structural, non-region row.
const NON_REGION_MARKER: &str = "Localização";

/// Leading NUTS code on region rows, e.g. `PT11: Norte`.
static NUTS_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Z]+: ?").expect("static pattern"));

/// True for the cells that mean "no data collected": blank, the `NaN`
/// literal, or the `x x` placeholder pair. These are distinct from cells
/// that merely fail to parse.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == NOT_APPLICABLE || cell == "NaN"
}

/// Parse an integer cell while being forgiving about the formatting quirks
/// of the source tables:
///
/// - Strips the `&` thousands marker before parsing.
/// - Trims whitespace.
/// - Returns `None` for missing-value cells and anything that cannot be
///   safely parsed. Parse failures never escalate to errors.
pub fn coerce_int(cell: &str) -> Option<i64> {
    if is_missing(cell) {
        return None;
    }
    let s = cell.replace('&', "");
    s.trim().parse::<i64>().ok()
}

/// Parse a float cell. Same rules as [`coerce_int`], plus a decimal-comma
/// to decimal-point rewrite (the proportions table writes `7,7`).
///
/// The missing-value check runs first: `NaN` would otherwise parse as a
/// float NaN, and non-finite values are rejected outright.
pub fn coerce_float(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    let s = cell.replace('&', "").replace(',', ".");
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when a raw label carries the `NUTS:` prefix of a region row.
pub fn matches_region_label(raw: &str) -> bool {
    NUTS_PREFIX.is_match(raw)
}

/// Strip the NUTS code prefix from a row label and validate the remainder.
///
/// Labels without the prefix pass through unmodified; they are rejected
/// only if the trimmed result is empty, reads `nan`, or the raw label is a
/// structural sub-header row. A `None` here drops the row entirely.
pub fn normalize_region_label(raw: &str) -> Option<String> {
    if raw.contains(NON_REGION_MARKER) {
        return None;
    }
    let name = NUTS_PREFIX.replace(raw, "").trim().to_string();
    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(name)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with a fixed number of decimal places
    // and locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `1,205 entries`).
    n.to_formatted_string(&Locale::en)
}
