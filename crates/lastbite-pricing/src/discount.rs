//! Discount tiers keyed by time remaining until the item's deadline.

use chrono::Duration;
use rust_decimal::Decimal;

use lastbite_types::constants::{
    DISCOUNT_CLOSING_PCT, DISCOUNT_EARLY_PCT, DISCOUNT_FINAL_PCT, TIER_CLOSING_MINUTES,
    TIER_FINAL_MINUTES,
};

/// One of the three fixed percentage-off bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum DiscountTier {
    /// An hour or more remaining: 10% off.
    EarlyBird,
    /// Between 30 and 60 minutes remaining: 15% off.
    ClosingSoon,
    /// Under 30 minutes remaining: 20% off.
    FinalCall,
}

impl DiscountTier {
    /// Classify by time remaining until the deadline.
    ///
    /// Boundaries are minute-exact: 29:59 remaining is `FinalCall`, 30:00
    /// is `ClosingSoon`, 59:59 is `ClosingSoon`, 60:00 is `EarlyBird`.
    #[must_use]
    pub fn for_remaining(remaining: Duration) -> Self {
        let seconds = remaining.num_seconds();
        if seconds < TIER_FINAL_MINUTES * 60 {
            Self::FinalCall
        } else if seconds < TIER_CLOSING_MINUTES * 60 {
            Self::ClosingSoon
        } else {
            Self::EarlyBird
        }
    }

    /// Discount fraction, e.g. `0.20` for `FinalCall`.
    #[must_use]
    pub fn fraction(self) -> Decimal {
        let pct = match self {
            Self::EarlyBird => DISCOUNT_EARLY_PCT,
            Self::ClosingSoon => DISCOUNT_CLOSING_PCT,
            Self::FinalCall => DISCOUNT_FINAL_PCT,
        };
        Decimal::new(pct, 2)
    }
}

impl std::fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EarlyBird => write!(f, "EARLY_BIRD"),
            Self::ClosingSoon => write!(f, "CLOSING_SOON"),
            Self::FinalCall => write!(f, "FINAL_CALL"),
        }
    }
}
