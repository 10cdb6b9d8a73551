//! Monetary amounts in minor units.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An amount of money in a single currency.
///
/// Stored in minor units (e.g. kopecks, cents). Value object: compared by
/// value, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount_minor: u64,
    currency: String,
}

impl Money {
    /// Construct an amount. Currency must be a three-letter uppercase code.
    pub fn new(amount_minor: u64, currency: impl Into<String>) -> Result<Self, DomainError> {
        let currency = currency.into();
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DomainError::validation(
                "currency must be a three-letter uppercase code",
            ));
        }
        Ok(Self {
            amount_minor,
            currency,
        })
    }

    /// Parse the provider's decimal form back into minor units: `"20"` is
    /// 2000, `"20.5"` and `"20.50"` are both 2050.
    pub fn from_units_str(units: &str, currency: impl Into<String>) -> Result<Self, DomainError> {
        let units = units.trim();
        let (whole, frac) = match units.split_once('.') {
            Some((w, f)) => (w, f),
            None => (units, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation("amount is malformed"));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation("amount is malformed"));
        }
        let whole: u64 = whole
            .parse()
            .map_err(|_| DomainError::validation("amount is out of range"))?;
        let frac_minor = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().unwrap_or(0) * 10,
            _ => frac.parse::<u64>().unwrap_or(0),
        };
        let amount_minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac_minor))
            .ok_or_else(|| DomainError::validation("amount is out of range"))?;
        Self::new(amount_minor, currency)
    }

    pub fn amount_minor(&self) -> u64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Decimal form used on the provider wire: whole units without a
    /// fraction when possible (`"20"`), otherwise two decimals (`"20.50"`).
    pub fn units_string(&self) -> String {
        if self.amount_minor % 100 == 0 {
            format!("{}", self.amount_minor / 100)
        } else {
            format!("{}.{:02}", self.amount_minor / 100, self.amount_minor % 100)
        }
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.units_string(), self.currency)
    }
}
