//! In-memory customer-profile and cart storage.
//!
//! Everything here is get-or-create: a user who has never shopped gets a
//! customer profile and an empty cart on first touch, so callers never
//! see "no cart" errors for valid users. One mutex guards both maps,
//! which makes concurrent get-or-create safe.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use lastbite_types::{Cart, CartLine, CustomerId, ItemId, MarketError, Result, UserId};

#[derive(Debug, Default)]
struct Shelves {
    profiles: HashMap<UserId, CustomerId>,
    carts: HashMap<CustomerId, Cart>,
}

/// The cart store: one customer profile per user, one cart per customer,
/// one line per `(cart, item)` pair.
#[derive(Debug, Default)]
pub struct CartStore {
    shelves: Mutex<Shelves>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn shelves(&self) -> MutexGuard<'_, Shelves> {
        self.shelves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve the user's customer profile, creating one on first touch.
    pub fn customer_for(&self, user: UserId) -> CustomerId {
        *self
            .shelves()
            .profiles
            .entry(user)
            .or_insert_with(CustomerId::new)
    }

    /// Snapshot of the user's cart; an empty one is created on first
    /// touch.
    pub fn cart_for(&self, user: UserId, now: DateTime<Utc>) -> Cart {
        let mut shelves = self.shelves();
        let customer = *shelves.profiles.entry(user).or_insert_with(CustomerId::new);
        shelves
            .carts
            .entry(customer)
            .or_insert_with(|| Cart::new(customer, now))
            .clone()
    }

    /// Insert or overwrite the `(cart, item)` line.
    ///
    /// A line that already exists has its price and quantity replaced,
    /// never accumulated; re-running a deposit is therefore harmless.
    pub fn upsert_line(
        &self,
        user: UserId,
        item_id: ItemId,
        unit_price_cents: i64,
        quantity: u32,
        now: DateTime<Utc>,
    ) {
        let mut shelves = self.shelves();
        let customer = *shelves.profiles.entry(user).or_insert_with(CustomerId::new);
        let cart = shelves
            .carts
            .entry(customer)
            .or_insert_with(|| Cart::new(customer, now));

        match cart.line_for_mut(item_id) {
            Some(line) => {
                line.unit_price_cents = unit_price_cents;
                line.quantity = quantity;
            }
            None => cart.lines.push(CartLine {
                item_id,
                unit_price_cents,
                quantity,
            }),
        }
        cart.updated_at = now;
    }

    /// Change a line's quantity; zero removes the line.
    pub fn set_line_quantity(
        &self,
        user: UserId,
        item_id: ItemId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut shelves = self.shelves();
        let customer = shelves.profiles.get(&user).copied();
        let cart = customer
            .and_then(|customer| shelves.carts.get_mut(&customer))
            .ok_or_else(|| MarketError::FulfillmentFailed {
                reason: "no cart for user".into(),
            })?;

        if quantity == 0 {
            cart.lines.retain(|line| line.item_id != item_id);
        } else {
            cart.line_for_mut(item_id)
                .ok_or_else(|| MarketError::FulfillmentFailed {
                    reason: format!("item {item_id} is not in the cart"),
                })?
                .quantity = quantity;
        }
        cart.updated_at = now;
        Ok(())
    }

    /// Drop the `(cart, item)` line if present.
    pub fn remove_line(&self, user: UserId, item_id: ItemId, now: DateTime<Utc>) {
        let mut shelves = self.shelves();
        let Some(customer) = shelves.profiles.get(&user).copied() else {
            return;
        };
        if let Some(cart) = shelves.carts.get_mut(&customer) {
            cart.lines.retain(|line| line.item_id != item_id);
            cart.updated_at = now;
        }
    }

    /// Sum of the user's cart, in cents. Zero for users without a cart.
    #[must_use]
    pub fn cart_total_cents(&self, user: UserId) -> i64 {
        let shelves = self.shelves();
        shelves
            .profiles
            .get(&user)
            .and_then(|customer| shelves.carts.get(customer))
            .map_or(0, Cart::total_cents)
    }

    /// Rewrite each line's unit price from the resolver. `None` leaves
    /// the line unchanged. See the checkout module for the marketplace
    /// wiring.
    ///
    /// The resolver runs with the store unlocked: it may re-enter this
    /// store, as it does when a price lookup triggers an expiration whose
    /// winning line is deposited right back here through the bridge.
    pub fn reprice_lines(
        &self,
        user: UserId,
        mut price_for: impl FnMut(ItemId) -> Option<i64>,
        now: DateTime<Utc>,
    ) {
        let item_ids: Vec<ItemId> = {
            let shelves = self.shelves();
            let Some(customer) = shelves.profiles.get(&user).copied() else {
                return;
            };
            let Some(cart) = shelves.carts.get(&customer) else {
                return;
            };
            cart.lines.iter().map(|line| line.item_id).collect()
        };

        let repriced: Vec<(ItemId, i64)> = item_ids
            .into_iter()
            .filter_map(|item_id| price_for(item_id).map(|cents| (item_id, cents)))
            .collect();

        let mut shelves = self.shelves();
        let Some(customer) = shelves.profiles.get(&user).copied() else {
            return;
        };
        let Some(cart) = shelves.carts.get_mut(&customer) else {
            return;
        };
        for (item_id, cents) in repriced {
            if let Some(line) = cart.line_for_mut(item_id) {
                line.unit_price_cents = cents;
            }
        }
        cart.updated_at = now;
    }
}
