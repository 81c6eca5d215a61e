//! Cart and cart-line models.
//!
//! The cart layer is the fulfillment target: one cart per customer
//! profile, one line per `(cart, item)` pair. Lines persist integer cents
//! (the storage shape), converted at the edge via [`crate::money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CartId, CustomerId, ItemId};

/// One unit-priced, quantity-counted line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// A shopping cart tied to one customer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub customer: CustomerId,
    pub lines: Vec<CartLine>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    #[must_use]
    pub fn new(customer: CustomerId, now: DateTime<Utc>) -> Self {
        Self {
            id: CartId::new(),
            customer,
            lines: Vec::new(),
            updated_at: now,
        }
    }

    /// Look up the line for an item, if present.
    #[must_use]
    pub fn line_for(&self, item_id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Mutable lookup of the line for an item.
    pub fn line_for_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }

    /// Sum of all line totals, in cents.
    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(CartLine::total_cents).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
