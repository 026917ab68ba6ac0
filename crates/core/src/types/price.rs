//! Currency codes and price formatting.
//!
//! Amounts are always integers in the smallest unit of their currency. For
//! IDR that is the rupiah itself; for USD it is the cent.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IDR,
    USD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::IDR => "Rp ",
            Self::USD => "$",
        }
    }

    /// Number of minor-unit digits (0 for rupiah, 2 for dollars).
    #[must_use]
    pub const fn decimals(self) -> u32 {
        match self {
            Self::IDR => 0,
            Self::USD => 2,
        }
    }

    const fn thousands_separator(self) -> char {
        match self {
            Self::IDR => '.',
            Self::USD => ',',
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::IDR => ',',
            Self::USD => '.',
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IDR => write!(f, "IDR"),
            Self::USD => write!(f, "USD"),
        }
    }
}

/// Format an amount in minor units for display.
///
/// ```rust
/// # use tenun_core::{CurrencyCode, format_price};
/// assert_eq!(format_price(1_250_000, CurrencyCode::IDR), "Rp 1.250.000");
/// assert_eq!(format_price(1999, CurrencyCode::USD), "$19.99");
/// ```
#[must_use]
pub fn format_price(amount: i64, currency: CurrencyCode) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let divisor = 10_u64.pow(currency.decimals());
    let whole = group_thousands(abs / divisor, currency.thousands_separator());

    if currency.decimals() == 0 {
        format!("{sign}{}{whole}", currency.symbol())
    } else {
        let fraction = abs % divisor;
        format!(
            "{sign}{}{whole}{}{fraction:0width$}",
            currency.symbol(),
            currency.decimal_separator(),
            width = currency.decimals() as usize
        )
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_price(0, CurrencyCode::IDR), "Rp 0");
        assert_eq!(format_price(500, CurrencyCode::IDR), "Rp 500");
        assert_eq!(format_price(500_000, CurrencyCode::IDR), "Rp 500.000");
        assert_eq!(format_price(2_500_000, CurrencyCode::IDR), "Rp 2.500.000");
        assert_eq!(format_price(-5_000, CurrencyCode::IDR), "-Rp 5.000");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_price(5, CurrencyCode::USD), "$0.05");
        assert_eq!(format_price(12_345_678, CurrencyCode::USD), "$123,456.78");
    }

    #[test]
    fn test_default_currency_is_rupiah() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::IDR);
        assert_eq!(CurrencyCode::IDR.to_string(), "IDR");
    }
}
