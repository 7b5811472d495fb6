//! Locale-aware amount parsing and display formatting.
//!
//! Source pages publish prices in the Argentine format (`$1.485,50`), while
//! the P2P API and the rest of the pipeline use plain floats. The separator
//! rule is deliberately narrow:
//!
//! - both `.` and `,` present: `.` is the thousands separator, `,` the decimal
//! - only `,` present: `,` is the decimal separator
//! - otherwise the text is parsed as-is
//!
//! A lone `.` is never treated as a thousands separator, so `"1.485"` parses
//! as `1.485`.

use thiserror::Error;

/// Currency symbols removed before parsing.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₿'];

/// Currency code prefixes removed before parsing, longest first.
const CURRENCY_PREFIXES: &[&str] = &["USD", "ARS", "US"];

/// Tolerance under which a value is displayed as an integer.
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Raised when a text fragment does not hold a finite number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid amount: '{input}'")]
pub struct AmountParseError {
    /// The original, uncleaned input.
    pub input: String,
}

/// Parse a locale-formatted amount such as `"$ 1.485,00"` into an `f64`.
///
/// # Examples
///
/// ```
/// use cotizador_market_data::parse_amount;
///
/// assert_eq!(parse_amount("1.485,00").unwrap(), 1485.0);
/// assert_eq!(parse_amount("1485,50").unwrap(), 1485.5);
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(text: &str) -> Result<f64, AmountParseError> {
    let cleaned = clean(text);

    let normalized = if cleaned.contains('.') && cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    // f64::from_str accepts "inf" and "NaN", which are not amounts.
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AmountParseError {
            input: text.to_string(),
        }),
    }
}

/// Format an amount for display and for the published record.
///
/// Values within `1e-9` of an integer render without decimals, everything
/// else renders with exactly two decimals.
///
/// # Examples
///
/// ```
/// use cotizador_market_data::format_amount;
///
/// assert_eq!(format_amount(1485.0), "1485");
/// assert_eq!(format_amount(1485.5), "1485.50");
/// ```
pub fn format_amount(value: f64) -> String {
    let nearest = value.round();
    if (value - nearest).abs() < INTEGER_TOLERANCE {
        // `as` saturates; amounts never get close to i64 bounds.
        format!("{}", nearest as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Strip whitespace, currency symbols and leading currency codes.
fn clean(text: &str) -> String {
    let mut trimmed = text.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            trimmed = rest;
            break;
        }
    }

    trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect()
}
