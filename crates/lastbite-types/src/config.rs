//! Configuration for marketplace behavior.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::money::from_cents;

/// Tunable marketplace rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRules {
    /// A new bid must exceed the current highest by at least this much.
    pub bid_increment: Decimal,
}

impl MarketRules {
    /// The bid increment to apply on top of the current highest bid.
    #[must_use]
    pub fn bid_increment(&self) -> Decimal {
        self.bid_increment
    }
}

impl Default for MarketRules {
    fn default() -> Self {
        Self {
            bid_increment: from_cents(constants::BID_INCREMENT_CENTS),
        }
    }
}
