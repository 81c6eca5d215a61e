//! The board: every item on the marketplace plus its bid ledger.
//!
//! Plain single-threaded state -- all mutation goes through `&mut self`.
//! The serialization discipline (one lock around every check-then-act)
//! lives in [`crate::engine::AuctionHouse`], which owns the only `Board`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use lastbite_types::{
    Bid, ItemId, ItemStatus, MarketError, Result, SellableItem, UserId,
};

use crate::ledger::BidLedger;

/// What `claim_expiration` did, observable by every caller of the
/// read-time trigger.
#[derive(Debug, Clone)]
pub enum ExpirationOutcome {
    /// Nothing to do: not an auction, not yet expired, or already
    /// processed. The common case on every read.
    Unchanged,
    /// First observation of the passed deadline, with bids: the leader
    /// was selected and the item flipped `Listed -> Reserved`.
    WinnerSelected(Bid),
    /// First observation of the passed deadline, without bids: the item
    /// flipped `Listed -> Expired`.
    ExpiredNoBids,
}

/// A vendor's edit of an existing listing. Mirrors the edit form: the
/// full field set is submitted, not a sparse patch.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub title: String,
    pub description: String,
    pub base_price: Decimal,
    pub min_price: Option<Decimal>,
    pub quantity: u32,
    pub end_time: Option<DateTime<Utc>>,
    pub bidding_enabled: bool,
}

/// All items and their ledgers.
#[derive(Debug, Default)]
pub struct Board {
    items: HashMap<ItemId, SellableItem>,
    ledgers: HashMap<ItemId, BidLedger>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            ledgers: HashMap::new(),
        }
    }

    // =================================================================
    // Listings
    // =================================================================

    /// Insert a new item after validating its listing invariants.
    pub fn insert(&mut self, item: SellableItem) -> Result<ItemId> {
        if self.items.contains_key(&item.id) {
            return Err(MarketError::DuplicateItem(item.id));
        }
        item.validate()?;
        let id = item.id;
        self.items.insert(id, item);
        Ok(id)
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&SellableItem> {
        self.items.get(&id)
    }

    #[must_use]
    pub fn ledger(&self, id: ItemId) -> Option<&BidLedger> {
        self.ledgers.get(&id)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Move a draft onto the marketplace.
    pub fn publish(&mut self, owner: UserId, id: ItemId, now: DateTime<Utc>) -> Result<()> {
        let item = self.owned_item_mut(owner, id)?;
        if item.status != ItemStatus::Draft {
            return Err(MarketError::InvalidListing {
                reason: format!("only drafts can be published, item is {}", item.status),
            });
        }
        item.status = ItemStatus::Listed;
        item.updated_at = now;
        Ok(())
    }

    /// Apply a vendor edit. Disabling bidding clears the floor price;
    /// the edited state must still satisfy the listing invariants, and a
    /// failed validation leaves the item untouched.
    pub fn apply_edit(
        &mut self,
        owner: UserId,
        id: ItemId,
        update: ListingUpdate,
        now: DateTime<Utc>,
    ) -> Result<SellableItem> {
        let current = self.owned_item_mut(owner, id)?;

        let mut edited = current.clone();
        edited.title = update.title;
        edited.description = update.description;
        edited.base_price = update.base_price;
        edited.min_price = if update.bidding_enabled {
            update.min_price
        } else {
            None
        };
        edited.quantity = update.quantity;
        edited.end_time = update.end_time;
        edited.bidding_enabled = update.bidding_enabled;
        edited.updated_at = now;
        edited.validate()?;

        *current = edited.clone();
        Ok(edited)
    }

    fn owned_item_mut(&mut self, owner: UserId, id: ItemId) -> Result<&mut SellableItem> {
        match self.items.get_mut(&id) {
            Some(item) if item.owner == owner => Ok(item),
            _ => Err(MarketError::ItemNotFound(id)),
        }
    }

    // =================================================================
    // Bids
    // =================================================================

    /// Append a validated bid to the item's ledger.
    pub fn record_bid(&mut self, bid: Bid) {
        self.ledgers.entry(bid.item_id).or_default().record(bid);
    }

    // =================================================================
    // Expiration transition
    // =================================================================

    /// The idempotent expiration transition; the single place the pair
    /// `(status, winning_bid)` changes. The whole check-then-act runs
    /// under one `&mut self` borrow, so two callers can never both claim.
    pub fn claim_expiration(&mut self, id: ItemId, now: DateTime<Utc>) -> ExpirationOutcome {
        let Some(item) = self.items.get_mut(&id) else {
            return ExpirationOutcome::Unchanged;
        };

        // No-op guards: not an auction, deadline not reached, or already
        // processed. These make the transition safe on every read.
        if !item.bidding_enabled
            || !item.deadline_passed(now)
            || item.status != ItemStatus::Listed
            || item.winning_bid.is_some()
        {
            return ExpirationOutcome::Unchanged;
        }

        let highest = self
            .ledgers
            .get(&id)
            .and_then(BidLedger::highest)
            .cloned();

        match highest {
            Some(winner) => {
                item.winning_bid = Some(winner.id);
                item.status = ItemStatus::Reserved;
                item.updated_at = now;
                ExpirationOutcome::WinnerSelected(winner)
            }
            None => {
                item.status = ItemStatus::Expired;
                item.updated_at = now;
                ExpirationOutcome::ExpiredNoBids
            }
        }
    }

    // =================================================================
    // Inventory (checkout collaborator's entry point)
    // =================================================================

    /// Deduct sold units. Checkout is the sole writer of `Sold`: when the
    /// last unit goes, the item flips there. Returns the remaining stock.
    pub fn consume_stock(&mut self, id: ItemId, quantity: u32, now: DateTime<Utc>) -> Result<u32> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(MarketError::ItemNotFound(id))?;

        if !matches!(item.status, ItemStatus::Listed | ItemStatus::Reserved) {
            return Err(MarketError::ItemUnavailable);
        }
        if quantity > item.quantity {
            return Err(MarketError::InsufficientStock {
                requested: quantity,
                available: item.quantity,
            });
        }

        item.quantity -= quantity;
        if item.quantity == 0 {
            item.status = ItemStatus::Sold;
        }
        item.updated_at = now;
        Ok(item.quantity)
    }
}
