//! The sellable item model: surplus inventory with optional time-based
//! discounting and optional bidding.
//!
//! Everything here is **pure data and pure predicates**. The lazy
//! expiration transition that mutates `(status, winning_bid)` lives in the
//! auction crate; callers there are required to run it before trusting any
//! predicate that depends on the clock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, ItemId, MarketError, Result, UserId};

/// Lifecycle status of a sellable item.
///
/// `Draft` and `Sold` are written only by creation and checkout flows; the
/// auction state machine drives `Listed -> Reserved` (winner selected) and
/// `Listed -> Expired` (deadline passed with no bids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Draft,
    Listed,
    Reserved,
    Sold,
    Expired,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Listed => write!(f, "listed"),
            Self::Reserved => write!(f, "reserved"),
            Self::Sold => write!(f, "sold"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A unit of inventory a vendor offers, with optional dynamic discounting
/// (`end_time`) and optional bidding (`bidding_enabled` + `min_price`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellableItem {
    pub id: ItemId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    /// The price when the item becomes available, before any discount.
    pub base_price: Decimal,
    /// Floor for the dynamic discount and for bids. Required when bidding
    /// is enabled; always strictly below `base_price`.
    pub min_price: Option<Decimal>,
    pub quantity: u32,
    pub status: ItemStatus,
    /// Deadline for the dynamic discount and for the auction.
    pub end_time: Option<DateTime<Utc>>,
    pub bidding_enabled: bool,
    /// Set exactly once, by the expiration transition, while flipping the
    /// status to `Reserved`.
    pub winning_bid: Option<BidId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SellableItem {
    /// Create a new item directly in `Listed` status (the vendor "create
    /// product" flow publishes immediately).
    ///
    /// # Errors
    /// Returns `InvalidListing` if the field combination fails
    /// [`SellableItem::validate`].
    pub fn listed(
        owner: UserId,
        title: impl Into<String>,
        base_price: Decimal,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let item = Self {
            id: ItemId::new(),
            owner,
            title: title.into(),
            description: String::new(),
            base_price,
            min_price: None,
            quantity,
            status: ItemStatus::Listed,
            end_time: None,
            bidding_enabled: false,
            winning_bid: None,
            created_at: now,
            updated_at: now,
        };
        item.validate()?;
        Ok(item)
    }

    /// Validate the listing-level invariants. Enforced at creation and
    /// edit, never by the state machine.
    ///
    /// # Errors
    /// Returns `InvalidListing` when:
    /// - `base_price` is not positive,
    /// - `min_price` is set but not strictly below `base_price`,
    /// - bidding is enabled without both `min_price` and `end_time`.
    pub fn validate(&self) -> Result<()> {
        if self.base_price <= Decimal::ZERO {
            return Err(MarketError::InvalidListing {
                reason: "base price must be positive".into(),
            });
        }
        if let Some(min) = self.min_price {
            if min <= Decimal::ZERO {
                return Err(MarketError::InvalidListing {
                    reason: "minimum price must be positive".into(),
                });
            }
            if min >= self.base_price {
                return Err(MarketError::InvalidListing {
                    reason: "minimum price must be less than base price".into(),
                });
            }
        }
        if self.bidding_enabled {
            if self.min_price.is_none() {
                return Err(MarketError::InvalidListing {
                    reason: "minimum price is required when bidding is enabled".into(),
                });
            }
            if self.end_time.is_none() {
                return Err(MarketError::InvalidListing {
                    reason: "end time is required when bidding is enabled".into(),
                });
            }
        }
        Ok(())
    }

    /// Whether the item can be sold right now: listed and in stock.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Listed && self.quantity > 0
    }

    /// Whether bidding is open at `now`.
    ///
    /// Pure predicate over stored state. A stale `Listed` item whose
    /// `end_time` has passed answers `false` here, but its status still
    /// needs the expiration transition -- callers go through the auction
    /// engine, which runs that transition first.
    #[must_use]
    pub fn bidding_open_at(&self, now: DateTime<Utc>) -> bool {
        if !self.bidding_enabled {
            return false;
        }
        let (Some(_), Some(end_time)) = (self.min_price, self.end_time) else {
            return false;
        };
        self.is_available() && now < end_time
    }

    /// Whether the auction deadline has passed at `now`.
    /// `false` when no deadline is configured.
    #[must_use]
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.end_time.is_some_and(|end| now >= end)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl SellableItem {
    /// A plainly listed, non-auction item.
    pub fn dummy_listing(base_price: Decimal, quantity: u32) -> Self {
        let now = Utc::now();
        Self::listed(UserId::new(), "Day-old sourdough", base_price, quantity, now)
            .expect("dummy listing is valid")
    }

    /// An auction item: bidding enabled, floor price set, deadline at
    /// `end_time`.
    pub fn dummy_auction(
        base_price: Decimal,
        min_price: Decimal,
        end_time: DateTime<Utc>,
    ) -> Self {
        let mut item = Self::dummy_listing(base_price, 1);
        item.min_price = Some(min_price);
        item.end_time = Some(end_time);
        item.bidding_enabled = true;
        item.validate().expect("dummy auction is valid");
        item
    }
}
