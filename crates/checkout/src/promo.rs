//! Promo code rules.

use serde::{Deserialize, Serialize};

use frota_core::{DomainError, DomainResult};

/// Normalize user input the way codes are stored: trimmed, uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A promo code as configured by the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount_percent: u32,
    /// Flat discount in minor currency units.
    pub discount_amount: u64,
    pub max_uses: u32,
    pub current_uses: u32,
    pub is_active: bool,
}

/// What a valid promo code is worth right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoEvaluation {
    pub discount_percent: u32,
    pub discount_amount: u64,
    pub remaining_uses: u32,
}

impl PromoCode {
    /// Check whether the code is currently redeemable.
    pub fn evaluate(&self) -> DomainResult<PromoEvaluation> {
        if !self.is_active {
            return Err(DomainError::invariant("promo code is not active"));
        }
        if self.current_uses >= self.max_uses {
            return Err(DomainError::invariant("promo code has no uses left"));
        }
        Ok(PromoEvaluation {
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount,
            remaining_uses: self.max_uses - self.current_uses,
        })
    }
}
