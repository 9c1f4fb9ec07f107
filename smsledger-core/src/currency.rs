//! Currency token normalization: symbol or code fragment -> 3-letter code.

/// Code used when a message carries no currency token at all.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Known symbols and codes. Lookup key is the trimmed, upper-cased token.
const CURRENCY_TABLE: &[(&str, &str)] = &[
    ("$", "USD"),
    ("USD", "USD"),
    ("₹", "INR"),
    ("INR", "INR"),
    ("RS", "INR"),
    ("₵", "GHS"),
    ("GHS", "GHS"),
    ("€", "EUR"),
    ("EUR", "EUR"),
    ("£", "GBP"),
    ("GBP", "GBP"),
];

/// Normalize a raw currency token.
///
/// - absent / blank -> `USD`
/// - known symbol or code -> its code
/// - anything else -> first 3 characters of the upper-cased token.
///
/// The last rule is lossy: `"DOLLARS"` becomes `"DOL"` and short tokens are
/// returned whole. Nothing is checked against ISO-4217.
pub fn normalize_currency(raw: Option<&str>) -> String {
    let token = match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_uppercase(),
        _ => return DEFAULT_CURRENCY.to_string(),
    };

    if let Some((_, code)) = CURRENCY_TABLE.iter().find(|(k, _)| *k == token) {
        return code.to_string();
    }

    token.chars().take(3).collect()
}

/// Display symbol for the codes the table knows about
pub fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "INR" => Some("₹"),
        "GHS" => Some("₵"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}
