//! Deterministic text rules applied around the translation provider.
//!
//! These are pure functions so every rule is testable without a network.

use std::sync::LazyLock;

use regex::Regex;

/// Pure numeric/punctuation strings ("2.5", "10-15", "+", "1 000").
static NUMERIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.,\-+\s]+$").unwrap_or_else(|e| unreachable!("{e}")));

/// Number with an explicit unit suffix ("5 мм", "1,5 кг", "40 °C").
static UNIT_SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+([.,]\d+)?\s*(мм|м|см|кг|г|°C|%|л)$")
        .unwrap_or_else(|e| unreachable!("{e}"))
});

/// Whether a string should be sent to the translation provider at all.
///
/// Values that are pure numbers/punctuation, carry a unit suffix, or
/// contain any Latin letter (part numbers, standards like "ГОСТ 7399" with
/// ASCII markings, brand names) are locale-invariant and pass through
/// unchanged without a network call.
#[must_use]
pub fn is_translatable(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if NUMERIC_ONLY.is_match(text) || UNIT_SUFFIXED.is_match(text) {
        return false;
    }
    !text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Strip quotes and backslashes the provider tends to wrap answers in,
/// then trim whitespace.
#[must_use]
pub fn clean_string(text: &str) -> String {
    text.replace(['"', '\\'], "").trim().to_string()
}

/// Collapse a provider answer of the form `"A -> A"` (source echoed as an
/// arrow-translation with identical sides) down to `"A"`.
#[must_use]
pub fn collapse_arrow_echo(text: &str) -> String {
    if text.contains("->") {
        let parts: Vec<&str> = text.split("->").map(str::trim).collect();
        if let [left, right] = parts.as_slice()
            && left == right
        {
            return (*left).to_string();
        }
    }
    text.to_string()
}

/// Cleanup for translated key-like terms (parameter type names): on top of
/// [`clean_string`], collapse an `"X - X"` echo and drop a trailing period.
#[must_use]
pub fn clean_key(text: &str) -> String {
    let mut cleaned = clean_string(text);
    let parts: Vec<&str> = cleaned.split(" - ").collect();
    if let [left, right] = parts.as_slice()
        && left == right
    {
        cleaned = (*left).to_string();
    }
    cleaned.trim_end_matches('.').to_string()
}
