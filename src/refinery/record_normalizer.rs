// * Record Normalization
// * Cleans the price and display-name fields of a raw listing.
// *
// * Price: coerce to text, drop thousands separators, take the first digit run.
// * Name: remove every "(...)" variant annotation, then trim.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid digit-run regex"));

// * Non-greedy: "(Blue) X (8GB)" loses both spans, not the text between them
static PAREN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("Invalid parenthesis regex"));

/// Renders a loosely typed field as text; `null` has no text form
fn coerce_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses a price string such as `"₹29,999"` into a number.
///
/// Only the first run of digits counts, so `"29,999 - 31,999"` yields 29999
/// and `"18999.50"` yields 18999.
pub fn normalize_price_text(text: &str) -> Option<f64> {
    let without_commas = text.replace(',', "");
    DIGIT_RUN
        .find(&without_commas)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Normalizes a raw price field, which may be text or a JSON number
pub fn normalize_price(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(coerce_to_text)
        .and_then(|text| normalize_price_text(&text))
}

/// Strips parenthesized variant annotations and surrounding whitespace
pub fn normalize_name(name: &str) -> String {
    PAREN_SPAN.replace_all(name, "").trim().to_string()
}

/// Normalizes a raw name field; non-text names are treated as missing
pub fn normalize_name_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(normalize_name(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_with_commas_and_currency() {
        assert_eq!(normalize_price_text("₹29,999"), Some(29999.0));
        assert_eq!(normalize_price_text("Rs. 1,09,999"), Some(109999.0));
    }

    #[test]
    fn test_price_range_takes_first_run() {
        assert_eq!(normalize_price_text("29,999 - 31,999"), Some(29999.0));
        assert_eq!(normalize_price_text("18999.50"), Some(18999.0));
    }

    #[test]
    fn test_price_without_digits_is_absent() {
        assert_eq!(normalize_price_text("Coming soon"), None);
        assert_eq!(normalize_price_text(""), None);
    }

    #[test]
    fn test_price_numeric_and_null_values() {
        assert_eq!(normalize_price(Some(&json!(15999))), Some(15999.0));
        assert_eq!(normalize_price(Some(&json!(15999.0))), Some(15999.0));
        assert_eq!(normalize_price(Some(&json!(null))), None);
        assert_eq!(normalize_price(None), None);
    }

    #[test]
    fn test_name_strips_variants() {
        assert_eq!(normalize_name("Phone X (Blue, 128GB)"), "Phone X");
        assert_eq!(normalize_name("  (5G) Phone Y (Black) Pro "), "Phone Y  Pro");
    }

    #[test]
    fn test_name_is_idempotent() {
        let once = normalize_name("Galaxy M14 (Icy Silver, 6GB RAM)");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn test_name_unbalanced_parenthesis_kept() {
        assert_eq!(normalize_name("Phone (Blue"), "Phone (Blue");
    }

    #[test]
    fn test_non_text_name_is_missing() {
        assert_eq!(normalize_name_value(Some(&json!(42))), None);
        assert_eq!(normalize_name_value(Some(&json!("Nord (Gray)"))), Some("Nord".to_string()));
    }
}
