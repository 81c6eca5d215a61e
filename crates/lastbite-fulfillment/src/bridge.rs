//! The winner-fulfillment bridge: the auction engine's sink, backed by
//! the cart store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use lastbite_auction::FulfillmentSink;
use lastbite_types::{money, ItemId, Result, UserId};

use crate::cart_store::CartStore;

/// Deposits winning cart lines into a [`CartStore`].
///
/// The winner gets their customer profile and cart created on the spot
/// if they have none. The deposited line always carries **quantity 1**:
/// a won auction hands over a single claim at the winning price, even
/// when the listing had more units in stock.
#[derive(Debug, Clone)]
pub struct CartBridge {
    store: Arc<CartStore>,
}

impl CartBridge {
    #[must_use]
    pub fn new(store: Arc<CartStore>) -> Self {
        Self { store }
    }

    /// The store this bridge deposits into.
    #[must_use]
    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }
}

impl FulfillmentSink for CartBridge {
    fn deposit_winning_line(
        &self,
        winner: UserId,
        item_id: ItemId,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let cents = money::to_cents(unit_price);
        self.store.upsert_line(winner, item_id, cents, 1, now);
        info!(%winner, item = %item_id, amount_cents = cents, "winning line deposited");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_creates_profile_and_forces_quantity_one() {
        let store = Arc::new(CartStore::new());
        let bridge = CartBridge::new(Arc::clone(&store));
        let winner = UserId::new();
        let item = ItemId::new();
        let now = Utc::now();

        bridge
            .deposit_winning_line(winner, item, Decimal::new(725, 2), now)
            .unwrap();

        let cart = store.cart_for(winner, now);
        let line = cart.line_for(item).unwrap();
        assert_eq!(line.unit_price_cents, 725);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn redeposit_overwrites_same_line() {
        let store = Arc::new(CartStore::new());
        let bridge = CartBridge::new(Arc::clone(&store));
        let winner = UserId::new();
        let item = ItemId::new();
        let now = Utc::now();

        bridge
            .deposit_winning_line(winner, item, Decimal::new(700, 2), now)
            .unwrap();
        bridge
            .deposit_winning_line(winner, item, Decimal::new(700, 2), now)
            .unwrap();

        assert_eq!(store.cart_for(winner, now).lines.len(), 1);
    }

    #[test]
    fn deposit_stamps_the_observed_instant() {
        let store = Arc::new(CartStore::new());
        let bridge = CartBridge::new(Arc::clone(&store));
        let winner = UserId::new();
        let observed = Utc::now() - chrono::Duration::minutes(3);

        bridge
            .deposit_winning_line(winner, ItemId::new(), Decimal::new(700, 2), observed)
            .unwrap();

        // The cart carries the caller's timestamp, not a fresh clock read.
        assert_eq!(store.cart_for(winner, observed).updated_at, observed);
    }
}
