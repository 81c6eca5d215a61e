//! # lastbite-types
//!
//! Shared types, errors, and configuration for the **LastBite**
//! marketplace core.
//!
//! This crate is the leaf dependency of the workspace -- every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ItemId`], [`BidId`], [`UserId`], [`CustomerId`], [`CartId`]
//! - **Item model**: [`SellableItem`], [`ItemStatus`]
//! - **Bid model**: [`Bid`] and its canonical ordering
//! - **Cart model**: [`Cart`], [`CartLine`]
//! - **Money**: half-even cent rounding and Decimal/cents conversions
//! - **Configuration**: [`MarketRules`]
//! - **Errors**: [`MarketError`] with `LB_ERR_` prefix codes
//! - **Constants**: discount tiers, bid increment, price precision

pub mod bid;
pub mod cart;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod item;
pub mod money;

// Re-export all primary types at crate root for ergonomic imports:
//   use lastbite_types::{SellableItem, Bid, MarketError, ...};

pub use bid::*;
pub use cart::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use item::*;

// Money helpers are accessed via `lastbite_types::money::round_to_cents`
// and constants via `lastbite_types::constants::FOO`
// (not re-exported to avoid name collisions).
