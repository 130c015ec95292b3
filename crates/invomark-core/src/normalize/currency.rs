use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Fixed USD to EUR conversion rate.
pub const USD_TO_EUR: Decimal = Decimal::from_parts(97, 0, 0, false, 2);

// Longest alternatives first so "euros" is removed whole.
static EUR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(€|euros|euro|eurs|eur)").expect("valid EUR pattern"));
static USD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\$|dollars|dollar|usds|usd)").expect("valid USD pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Currency {
    Eur,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    /// (thousands separator, decimal separator) as written on invoices.
    fn separators(&self) -> (char, char) {
        match self {
            Currency::Eur => ('.', ','),
            Currency::Usd => (',', '.'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAmount {
    Amount { value: Decimal, currency: Currency },
    /// The keyword for the amount was not found in the document.
    NotFound,
    /// No currency marker in the value.
    UnknownFormat,
    /// Both EUR and USD markers in the same value.
    MixedCurrencies,
    /// A currency was detected but the number could not be read.
    Invalid { raw: String, reason: String },
}

impl NormalizedAmount {
    /// The amount in EUR, converting USD at [`USD_TO_EUR`] and rounding to cents.
    pub fn value_in_eur(&self) -> Option<Decimal> {
        match self {
            NormalizedAmount::Amount {
                value,
                currency: Currency::Eur,
            } => Some(*value),
            NormalizedAmount::Amount {
                value,
                currency: Currency::Usd,
            } => Some((*value * USD_TO_EUR).round_dp(2)),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedAmount::Amount { value, currency } => {
                let (thousands, decimal) = currency.separators();
                write!(
                    f,
                    "{} {}",
                    format_grouped(*value, thousands, decimal),
                    currency.symbol()
                )
            }
            NormalizedAmount::NotFound => write!(f, "N/A"),
            NormalizedAmount::UnknownFormat => write!(f, "Unknown Format"),
            NormalizedAmount::MixedCurrencies => write!(f, "Error: Mixed currencies in value!"),
            NormalizedAmount::Invalid { raw, reason } => {
                write!(f, "Error processing value '{raw}': {reason}")
            }
        }
    }
}

impl Serialize for NormalizedAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Detect the currency of an invoice amount and read its value.
///
/// Handles formats like:
/// - "50 EUR" -> 50 €
/// - "€1.234,56" -> 1234.56 € (German separators)
/// - "$1,234.56" / "1,234.56 USD" -> 1234.56 $
pub fn normalize_currency(raw: &str) -> NormalizedAmount {
    let is_eur = EUR_PATTERN.is_match(raw);
    let is_usd = USD_PATTERN.is_match(raw);

    let currency = match (is_eur, is_usd) {
        (true, true) => return NormalizedAmount::MixedCurrencies,
        (true, false) => Currency::Eur,
        (false, true) => Currency::Usd,
        (false, false) => return NormalizedAmount::UnknownFormat,
    };

    let cleaned = EUR_PATTERN.replace_all(raw, "");
    let cleaned = USD_PATTERN.replace_all(&cleaned, "");
    let (thousands, decimal) = currency.separators();
    let number: String = cleaned
        .trim()
        .chars()
        .filter(|c| *c != thousands)
        .map(|c| if c == decimal { '.' } else { c })
        .collect();

    match Decimal::from_str(&number) {
        Ok(value) => NormalizedAmount::Amount { value, currency },
        Err(e) => NormalizedAmount::Invalid {
            raw: raw.to_string(),
            reason: format!("invalid number '{}': {}", number, e),
        },
    }
}

/// Format with two decimals and a thousands separator.
fn format_grouped(value: Decimal, thousands: char, decimal: char) -> String {
    let fixed = format!("{:.2}", value.round_dp(2).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && !value.is_zero() {
        grouped.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(c);
    }
    grouped.push(decimal);
    grouped.push_str(frac_part);
    grouped
}
