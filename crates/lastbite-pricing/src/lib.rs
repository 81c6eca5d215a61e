//! # lastbite-pricing
//!
//! **Pure time-decay pricing engine for LastBite.**
//!
//! This is the compute plane of the marketplace -- it turns an item's base
//! price, floor price, and time-to-deadline into the price to display
//! right now. It has:
//!
//! - **Zero side effects**: no store reads, no status transitions
//! - **Fixed-point arithmetic**: `Decimal` throughout, half-even cents
//! - **Three fixed tiers**: 10% / 15% / 20% off as the deadline approaches
//!
//! Auction close-out is a different concern: see `lastbite-auction`.

pub mod discount;
pub mod quote;

pub use discount::DiscountTier;
pub use quote::{current_price, item_price};
