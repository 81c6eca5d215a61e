//! Checkout and cart-refresh flows over the auction engine.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use lastbite_auction::{AuctionHouse, FulfillmentSink};
use lastbite_types::{money, CartLine, ItemId, MarketError, Result, UserId};

use crate::cart_store::CartStore;

/// What a checkout settled, line by line.
#[derive(Debug)]
pub struct CheckoutReceipt {
    /// Lines whose stock was consumed; removed from the cart.
    pub purchased: Vec<CartLine>,
    /// Lines that could not be settled, left in the cart for the
    /// shopper to fix.
    pub skipped: Vec<(ItemId, MarketError)>,
}

impl CheckoutReceipt {
    /// Total of the purchased lines, in cents.
    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.purchased.iter().map(CartLine::total_cents).sum()
    }
}

/// Settle the user's cart against marketplace stock.
///
/// Each line is consumed independently: a line whose item sold out or
/// left the marketplace is skipped and stays in the cart, the rest go
/// through. An empty cart checks out to an empty receipt.
pub fn checkout(
    store: &CartStore,
    house: &AuctionHouse,
    user: UserId,
    now: DateTime<Utc>,
) -> CheckoutReceipt {
    let cart = store.cart_for(user, now);
    let mut purchased = Vec::new();
    let mut skipped = Vec::new();

    for line in cart.lines {
        match house.consume_stock(line.item_id, line.quantity, now) {
            Ok(remaining) => {
                store.remove_line(user, line.item_id, now);
                info!(
                    user = %user,
                    item = %line.item_id,
                    quantity = line.quantity,
                    remaining,
                    "cart line settled"
                );
                purchased.push(line);
            }
            Err(err) => {
                warn!(user = %user, item = %line.item_id, %err, "cart line skipped at checkout");
                skipped.push((line.item_id, err));
            }
        }
    }

    CheckoutReceipt { purchased, skipped }
}

/// Refresh the user's cart lines to current marketplace prices.
///
/// A line the user **won at auction** keeps the winning amount; every
/// other line follows the dynamic price as the deadline approaches.
/// Lines whose item vanished from the marketplace are left untouched.
pub fn refresh_cart_prices(
    store: &CartStore,
    house: &AuctionHouse,
    user: UserId,
    now: DateTime<Utc>,
    sink: &dyn FulfillmentSink,
) -> Result<()> {
    store.reprice_lines(
        user,
        |item_id| match house.item_view(item_id, Some(user), now, sink) {
            Ok(view) => {
                let won_amount = view
                    .winner
                    .filter(|winner| *winner == user)
                    .and_then(|_| view.highest_bid.as_ref().map(|bid| bid.amount));
                Some(money::to_cents(won_amount.unwrap_or(view.current_price)))
            }
            Err(_) => None,
        },
        now,
    );
    Ok(())
}
