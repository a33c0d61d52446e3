use crate::errors::CoreError;

/// The fixed set of currencies the converter offers in its pickers.
///
/// Providers may know more currencies than this; the list only bounds what
/// the UI enumerates, not what the APIs can answer for.
pub const SUPPORTED_CURRENCIES: [&str; 20] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR", "MXN",
    "SGD", "NZD", "BRL", "ZAR", "RUB", "HKD", "SEK", "NOK", "TRY", "KRW",
];

/// Check whether a code is in the supported set (case-insensitive).
#[must_use]
pub fn is_supported(code: &str) -> bool {
    let upper = code.trim().to_uppercase();
    SUPPORTED_CURRENCIES.contains(&upper.as_str())
}

/// Validate and normalize a currency code to its canonical uppercase form.
/// Currency codes must be exactly 3 ASCII letters.
pub fn normalize_code(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim().to_uppercase();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., USD, EUR, GBP)"
        )));
    }
    Ok(trimmed)
}
