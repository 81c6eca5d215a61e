//! The auction house: serialized access to the board, bid validation,
//! and the lazy expiration transition with its fulfillment side effect.
//!
//! There is no background scheduler. Expiry is discovered only when a
//! request path touches the item, so every read that matters runs
//! [`AuctionHouse::process_expiration_if_needed`] first -- reads can
//! write. An item nobody looks at stays `Listed` in storage past its
//! deadline; that is a documented property of the design, not a bug.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use lastbite_types::{
    Bid, ItemId, MarketError, MarketRules, Result, SellableItem, UserId,
};

use crate::board::{Board, ExpirationOutcome, ListingUpdate};

/// Where the winning bidder's cart line gets deposited.
///
/// Implemented by the fulfillment crate over its cart store; the auction
/// outcome never depends on the result -- a failed deposit is logged and
/// swallowed, and the item stays `Reserved` for the winner.
pub trait FulfillmentSink {
    /// Deposit (or overwrite) the winner's cart line for this item at the
    /// winning unit price. `now` is the instant the expiration was
    /// observed; the sink reads no clock of its own.
    fn deposit_winning_line(
        &self,
        winner: UserId,
        item_id: ItemId,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()>;
}

/// A sink that drops deposits. For deployments without a cart layer and
/// for tests that only care about the state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardFulfillment;

impl FulfillmentSink for DiscardFulfillment {
    fn deposit_winning_line(
        &self,
        _: UserId,
        _: ItemId,
        _: Decimal,
        _: DateTime<Utc>,
    ) -> Result<()> {
        Ok(())
    }
}

/// The per-process marketplace engine.
///
/// One mutex serializes every check-then-act on the board: winner claims,
/// bid inserts, stock consumption. Coarser than a per-item row lock but
/// never less safe; see DESIGN.md for the granularity decision.
pub struct AuctionHouse {
    board: Mutex<Board>,
    rules: MarketRules,
}

impl AuctionHouse {
    #[must_use]
    pub fn new(rules: MarketRules) -> Self {
        Self {
            board: Mutex::new(Board::new()),
            rules,
        }
    }

    pub(crate) fn lock_board(&self) -> MutexGuard<'_, Board> {
        // A poisoned lock means a panic mid-mutation elsewhere; the board
        // holds no partially-applied transitions, so recover the guard.
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn market_rules(&self) -> &MarketRules {
        &self.rules
    }

    // =================================================================
    // Listings
    // =================================================================

    /// Put a new item on the board.
    pub fn list_item(&self, item: SellableItem) -> Result<ItemId> {
        self.lock_board().insert(item)
    }

    /// Snapshot of an item's current stored state.
    pub fn item(&self, id: ItemId) -> Result<SellableItem> {
        self.lock_board()
            .item(id)
            .cloned()
            .ok_or(MarketError::ItemNotFound(id))
    }

    /// Move an owner's draft onto the marketplace.
    pub fn publish(&self, owner: UserId, id: ItemId, now: DateTime<Utc>) -> Result<()> {
        self.lock_board().publish(owner, id, now)
    }

    /// Apply an owner's edit to a listing.
    pub fn edit_listing(
        &self,
        owner: UserId,
        id: ItemId,
        update: ListingUpdate,
        now: DateTime<Utc>,
    ) -> Result<SellableItem> {
        self.lock_board().apply_edit(owner, id, update, now)
    }

    // =================================================================
    // The expiration transition (the read-time trigger's target)
    // =================================================================

    /// Run the idempotent expiration transition for one item.
    ///
    /// The claim -- checking `Listed` + unset `winning_bid` and flipping to
    /// `Reserved`/`Expired` -- happens atomically under the board lock, so
    /// concurrent callers race to exactly one `WinnerSelected`. Only the
    /// claiming caller invokes the fulfillment sink, after the lock is
    /// released; a sink failure is logged and swallowed, never reopening
    /// the auction.
    pub fn process_expiration_if_needed(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<ExpirationOutcome> {
        let outcome = {
            let mut board = self.lock_board();
            if board.item(id).is_none() {
                return Err(MarketError::ItemNotFound(id));
            }
            board.claim_expiration(id, now)
        };

        match &outcome {
            ExpirationOutcome::WinnerSelected(winner) => {
                info!(
                    item = %id,
                    winner = %winner.bidder,
                    amount = %winner.amount,
                    "auction closed, winner selected"
                );
                if let Err(err) = sink.deposit_winning_line(winner.bidder, id, winner.amount, now) {
                    // The auction outcome is authoritative; the cart line
                    // is best-effort and can be re-derived from the item.
                    warn!(item = %id, %err, "failed to deposit winning cart line");
                }
            }
            ExpirationOutcome::ExpiredNoBids => {
                info!(item = %id, "auction deadline passed with no bids, item expired");
            }
            ExpirationOutcome::Unchanged => {}
        }

        Ok(outcome)
    }

    /// Whether bidding is open for this item right now.
    ///
    /// Runs the expiration transition first, so a stale
    /// Listed-but-actually-expired item is resolved before answering.
    pub fn is_bidding_open(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<bool> {
        self.process_expiration_if_needed(id, now, sink)?;
        Ok(self.item(id)?.bidding_open_at(now))
    }

    /// The winning bid, if the auction has closed with one. Transition
    /// runs first.
    pub fn get_winning_bid(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<Option<Bid>> {
        self.process_expiration_if_needed(id, now, sink)?;
        let board = self.lock_board();
        let Some(bid_id) = board.item(id).and_then(|item| item.winning_bid) else {
            return Ok(None);
        };
        Ok(board.ledger(id).and_then(|ledger| ledger.get(bid_id)).cloned())
    }

    /// The winning bidder, if one exists. Transition runs first.
    pub fn get_winning_bidder(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<Option<UserId>> {
        Ok(self.get_winning_bid(id, now, sink)?.map(|bid| bid.bidder))
    }

    /// Whether the item has a winning bid. Transition runs first.
    pub fn has_winner(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<bool> {
        self.process_expiration_if_needed(id, now, sink)?;
        Ok(self.item(id)?.winning_bid.is_some())
    }

    // =================================================================
    // Bidding
    // =================================================================

    /// The minimum amount the next bid on this item must reach.
    /// Transition runs first.
    pub fn get_minimum_bid(
        &self,
        id: ItemId,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<Decimal> {
        self.process_expiration_if_needed(id, now, sink)?;
        let board = self.lock_board();
        let item = board.item(id).ok_or(MarketError::ItemNotFound(id))?;
        Ok(match board.ledger(id) {
            Some(ledger) => ledger.minimum_next_bid(item, self.rules.bid_increment()),
            None => item.min_price.unwrap_or(item.base_price),
        })
    }

    /// Place a bid.
    ///
    /// Validation, in order: the item must resolve (`InvalidRequest`); the
    /// bidder must not own it (`SelfBidForbidden`, checked before anything
    /// else so owners are rejected regardless of amount or auction state);
    /// bidding must be open after the expiration transition has run
    /// (`AuctionClosed`); the amount must reach the minimum next bid
    /// (`BidTooLow`, carrying that minimum). The open check, amount check,
    /// and insert all run under one board lock, so the auction cannot
    /// close out from under a bid that passed validation.
    pub fn place_bid(
        &self,
        id: ItemId,
        bidder: UserId,
        amount: Decimal,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<Bid> {
        // Resolve expiry first; this may select a winner and deposit the
        // winning cart line, after which the open check below fails.
        match self.process_expiration_if_needed(id, now, sink) {
            Ok(_) => {}
            Err(MarketError::ItemNotFound(_)) => return Err(MarketError::InvalidRequest),
            Err(err) => return Err(err),
        }

        let mut board = self.lock_board();
        let Some(item) = board.item(id) else {
            return Err(MarketError::InvalidRequest);
        };

        if bidder == item.owner {
            return Err(MarketError::SelfBidForbidden);
        }
        if !item.bidding_open_at(now) {
            return Err(MarketError::AuctionClosed);
        }

        let minimum = match board.ledger(id) {
            Some(ledger) => ledger.minimum_next_bid(item, self.rules.bid_increment()),
            None => item.min_price.unwrap_or(item.base_price),
        };
        if amount < minimum {
            return Err(MarketError::BidTooLow { minimum });
        }

        let bid = Bid::new(id, bidder, amount, now);
        board.record_bid(bid.clone());
        debug!(item = %id, bidder = %bidder, amount = %amount, "bid placed");
        Ok(bid)
    }

    /// All bids on an item, highest first.
    pub fn bids(&self, id: ItemId) -> Result<Vec<Bid>> {
        let board = self.lock_board();
        if board.item(id).is_none() {
            return Err(MarketError::ItemNotFound(id));
        }
        Ok(board.ledger(id).map(crate::ledger::BidLedger::ranked).unwrap_or_default())
    }

    /// One bidder's bids on an item, most recent first.
    pub fn bids_by(&self, id: ItemId, bidder: UserId) -> Result<Vec<Bid>> {
        let board = self.lock_board();
        if board.item(id).is_none() {
            return Err(MarketError::ItemNotFound(id));
        }
        Ok(board
            .ledger(id)
            .map(|ledger| ledger.by_bidder(bidder))
            .unwrap_or_default())
    }

    // =================================================================
    // Inventory (checkout collaborator)
    // =================================================================

    /// Deduct sold units; flips the item to `Sold` when stock reaches
    /// zero. Returns the remaining stock.
    pub fn consume_stock(&self, id: ItemId, quantity: u32, now: DateTime<Utc>) -> Result<u32> {
        self.lock_board().consume_stock(id, quantity, now)
    }
}

impl Default for AuctionHouse {
    fn default() -> Self {
        Self::new(MarketRules::default())
    }
}
