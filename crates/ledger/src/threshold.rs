//! Low-stock classification.
//!
//! Two threshold sources exist side by side: a fixed constant suiting a
//! single global stock screen, and a per-product threshold carried by the
//! catalog. Both are supported and the caller picks a policy.

use serde::{Deserialize, Serialize};

/// Threshold applied when neither the caller nor the product supplies one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 50;

/// Which threshold source governs a low-stock decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// One fixed threshold for every row.
    Fixed(i64),
    /// The product's own threshold when set, otherwise the fallback.
    PerProduct { fallback: i64 },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

impl ThresholdPolicy {
    /// The threshold in force for a row whose product carries
    /// `per_product_threshold`.
    pub fn effective(&self, per_product_threshold: Option<i64>) -> i64 {
        match self {
            ThresholdPolicy::Fixed(t) => *t,
            ThresholdPolicy::PerProduct { fallback } => {
                per_product_threshold.unwrap_or(*fallback)
            }
        }
    }
}

/// Is a ledger row low on stock under the given policy?
pub fn is_low(quantity: i64, per_product_threshold: Option<i64>, policy: ThresholdPolicy) -> bool {
    quantity <= policy.effective(per_product_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_ignores_product_threshold() {
        assert!(is_low(50, Some(10), ThresholdPolicy::Fixed(50)));
        assert!(!is_low(51, Some(100), ThresholdPolicy::Fixed(50)));
    }

    #[test]
    fn per_product_policy_prefers_product_threshold() {
        let policy = ThresholdPolicy::PerProduct { fallback: 50 };
        assert!(is_low(10, Some(10), policy));
        assert!(!is_low(11, Some(10), policy));
    }

    #[test]
    fn per_product_policy_falls_back_when_unset() {
        let policy = ThresholdPolicy::PerProduct { fallback: 50 };
        assert!(is_low(50, None, policy));
        assert!(!is_low(51, None, policy));
    }

    #[test]
    fn default_policy_is_the_fixed_constant() {
        assert!(is_low(DEFAULT_LOW_STOCK_THRESHOLD, None, ThresholdPolicy::default()));
    }
}
