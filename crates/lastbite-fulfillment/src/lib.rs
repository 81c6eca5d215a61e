//! # lastbite-fulfillment
//!
//! **Cart storage, winner fulfillment, and checkout for LastBite.**
//!
//! The settlement side of the marketplace:
//!
//! - [`CartStore`]: get-or-create customer profiles and carts, one line
//!   per `(cart, item)` pair, prices stored in integer cents
//! - [`CartBridge`]: the auction engine's `FulfillmentSink`, depositing
//!   the winner's quantity-1 line at the winning amount
//! - [`checkout`]: settles a cart against marketplace stock, line by
//!   line, skipping what can no longer be bought
//! - [`refresh_cart_prices`]: follows the dynamic price on ordinary
//!   lines while pinning won-at-auction lines to the winning amount

pub mod bridge;
pub mod cart_store;
pub mod checkout;

pub use bridge::CartBridge;
pub use cart_store::CartStore;
pub use checkout::{checkout, refresh_cart_prices, CheckoutReceipt};
