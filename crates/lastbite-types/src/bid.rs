//! The bid model and its canonical ordering.
//!
//! The original storage relied on a pre-sorted collection to mean
//! "highest"; here the comparator is explicit: **amount descending,
//! `created_at` descending** (among equal amounts, the most recent bid
//! wins the tie).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, ItemId, UserId};

/// A single bid on a sellable item. Immutable once placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub item_id: ItemId,
    pub bidder: UserId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    #[must_use]
    pub fn new(item_id: ItemId, bidder: UserId, amount: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            id: BidId::new(),
            item_id,
            bidder,
            amount,
            created_at: now,
        }
    }

    /// Canonical ranking: higher amount first; among equal amounts, the
    /// more recent bid first.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .amount
            .cmp(&self.amount)
            .then_with(|| other.created_at.cmp(&self.created_at))
    }

    /// Whether this bid outranks `other` under the canonical order.
    #[must_use]
    pub fn outranks(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Bid {
    pub fn dummy(item_id: ItemId, amount: Decimal) -> Self {
        Self::new(item_id, UserId::new(), amount, Utc::now())
    }
}
