//! Per-item bid ledger.
//!
//! Append-only: bids are placed, never edited or removed by this core.
//! "Highest" is an explicit query backed by the canonical comparator
//! (amount desc, `created_at` desc), not a consequence of insertion order.

use rust_decimal::Decimal;

use lastbite_types::{Bid, SellableItem, UserId};

/// The ordered collection of bids on a single item.
#[derive(Debug, Default)]
pub struct BidLedger {
    /// All bids in placement order.
    bids: Vec<Bid>,
}

impl BidLedger {
    #[must_use]
    pub fn new() -> Self {
        Self { bids: Vec::new() }
    }

    /// Append a bid. Validation (open check, minimum amount, self-bid)
    /// happens in the engine before this is called.
    pub fn record(&mut self, bid: Bid) {
        self.bids.push(bid);
    }

    /// The current leader: highest amount, most recent among equals.
    #[must_use]
    pub fn highest(&self) -> Option<&Bid> {
        self.bids.iter().reduce(|best, bid| {
            if bid.outranks(best) {
                bid
            } else {
                best
            }
        })
    }

    /// The minimum amount the next bid must reach: leader + increment, or
    /// the item's floor price, or its base price when no floor is set.
    #[must_use]
    pub fn minimum_next_bid(&self, item: &SellableItem, increment: Decimal) -> Decimal {
        match self.highest() {
            Some(leader) => leader.amount + increment,
            None => item.min_price.unwrap_or(item.base_price),
        }
    }

    /// All bids in canonical order (highest first).
    #[must_use]
    pub fn ranked(&self) -> Vec<Bid> {
        let mut sorted = self.bids.clone();
        sorted.sort_by(Bid::rank_cmp);
        sorted
    }

    /// This bidder's bids, most recent first (the "my bids" view).
    #[must_use]
    pub fn by_bidder(&self, bidder: UserId) -> Vec<Bid> {
        let mut own: Vec<Bid> = self
            .bids
            .iter()
            .filter(|bid| bid.bidder == bidder)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        own
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    /// Look up a bid by ID.
    #[must_use]
    pub fn get(&self, id: lastbite_types::BidId) -> Option<&Bid> {
        self.bids.iter().find(|bid| bid.id == id)
    }
}
