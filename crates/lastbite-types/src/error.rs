//! Error types for the LastBite marketplace core.
//!
//! All errors use the `LB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing errors
//! - 2xx: Bidding errors
//! - 3xx: Inventory errors
//! - 4xx: Fulfillment errors
//! - 9xx: General / internal errors
//!
//! Bidding errors (2xx) are recoverable and meant to be surfaced to the
//! user by the web layer. Fulfillment errors (4xx) are internal only: the
//! auction state machine logs and swallows them, never reversing an
//! already-committed auction outcome.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ItemId;

/// Central error enum for all LastBite core operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Listing Errors (1xx)
    // =================================================================
    /// The requested item was not found in the store.
    #[error("LB_ERR_100: Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The listing failed creation/edit validation.
    #[error("LB_ERR_101: Invalid listing: {reason}")]
    InvalidListing { reason: String },

    /// An item with this ID already exists.
    #[error("LB_ERR_102: Item already listed: {0}")]
    DuplicateItem(ItemId),

    // =================================================================
    // Bidding Errors (2xx)
    // =================================================================
    /// A bid arrived without a resolvable item context.
    #[error("LB_ERR_200: Invalid bid request: no resolvable item")]
    InvalidRequest,

    /// Bidding is not open for this item (disabled, unconfigured, wrong
    /// status, past its end time, or out of stock).
    #[error("LB_ERR_201: Bidding is not open for this item")]
    AuctionClosed,

    /// The bid amount is below the minimum next bid.
    #[error("LB_ERR_202: Bid too low: must be at least {minimum}")]
    BidTooLow { minimum: Decimal },

    /// The bidder owns the item.
    #[error("LB_ERR_203: You cannot bid on your own item")]
    SelfBidForbidden,

    // =================================================================
    // Inventory Errors (3xx)
    // =================================================================
    /// A sale requested more units than the item has in stock.
    #[error("LB_ERR_300: Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// The item is not in a sellable state.
    #[error("LB_ERR_301: Item is not available for sale")]
    ItemUnavailable,

    // =================================================================
    // Fulfillment Errors (4xx) -- internal, never user-facing
    // =================================================================
    /// Depositing the winning bidder's cart line failed. The auction
    /// outcome stands regardless.
    #[error("LB_ERR_400: Fulfillment failed: {reason}")]
    FulfillmentFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("LB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("LB_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
