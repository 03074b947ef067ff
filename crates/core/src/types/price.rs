//! Type-safe price representation using decimal arithmetic.
//!
//! Monetary amounts use [`rust_decimal::Decimal`] rather than floats so that
//! discount arithmetic (percentages, proportional remainder pricing) stays
//! exact for the two-decimal-place currencies the storefront deals in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not pence).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display (e.g., "£19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
///
/// The catalog document carries bare numbers with no currency field; the
/// storefront is single-currency (GBP), which is therefore the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    GBP,
    USD,
    EUR,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GBP => "£",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GBP => "GBP",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_pads_to_two_places() {
        let price = Price::new(dec!(30), CurrencyCode::GBP);
        assert_eq!(price.display(), "£30.00");

        let price = Price::new(dec!(9.5), CurrencyCode::GBP);
        assert_eq!(price.display(), "£9.50");
    }

    #[test]
    fn test_default_currency_is_gbp() {
        assert_eq!(CurrencyCode::default().code(), "GBP");
        assert_eq!(Price::zero(CurrencyCode::default()).display(), "£0.00");
    }
}
