//! # lastbite-auction
//!
//! **Bid ledger, auction state machine, and read-time expiration
//! trigger for LastBite.**
//!
//! This is the control plane of the marketplace. It owns:
//!
//! - **The board** ([`Board`]): every listed item plus its bid ledger,
//!   mutated only through `&mut self`
//! - **The ledger** ([`BidLedger`]): append-only bids ranked amount
//!   descending, most recent winning ties
//! - **The engine** ([`AuctionHouse`]): one mutex over the board, bid
//!   validation, and the idempotent `Listed -> Reserved | Expired`
//!   transition that runs lazily on reads instead of on a scheduler
//! - **The view** ([`ItemView`]): the product-page snapshot assembled
//!   under a single lock
//!
//! Winner fulfillment crosses a seam: the engine calls a
//! [`FulfillmentSink`] exactly once per selected winner and never lets
//! its failure reopen the auction. The cart implementation lives in
//! `lastbite-fulfillment`.

pub mod board;
pub mod engine;
pub mod ledger;
pub mod view;

pub use board::{Board, ExpirationOutcome, ListingUpdate};
pub use engine::{AuctionHouse, DiscardFulfillment, FulfillmentSink};
pub use ledger::BidLedger;
pub use view::ItemView;
