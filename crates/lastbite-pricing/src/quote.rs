//! Current-price computation for a sellable item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use lastbite_types::money::round_to_cents;
use lastbite_types::SellableItem;

use crate::discount::DiscountTier;

/// Compute the current price from base price, optional floor, and
/// time-to-deadline.
///
/// - No `end_time`, or `now` at/past it: the base price, unchanged. The
///   discount window closing does not discount further; the auction state
///   machine handles what happens to expired items.
/// - Otherwise: the tiered discount for the remaining time, rounded
///   half-even to cents, then floored at `min_price` when one is set.
///
/// Pure function; safe to call anywhere a display price is needed.
#[must_use]
pub fn current_price(
    base_price: Decimal,
    min_price: Option<Decimal>,
    end_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Decimal {
    let Some(end_time) = end_time else {
        return base_price;
    };
    if now >= end_time {
        return base_price;
    }

    let tier = DiscountTier::for_remaining(end_time - now);
    let discounted = round_to_cents(base_price * (Decimal::ONE - tier.fraction()));

    match min_price {
        Some(floor) => discounted.max(floor),
        None => discounted,
    }
}

/// [`current_price`] over an item's own pricing fields.
#[must_use]
pub fn item_price(item: &SellableItem, now: DateTime<Utc>) -> Decimal {
    current_price(item.base_price, item.min_price, item.end_time, now)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const BASE: Decimal = Decimal::from_parts(1000, 0, 0, false, 2); // 10.00

    #[test]
    fn no_end_time_returns_base() {
        assert_eq!(current_price(BASE, None, None, Utc::now()), BASE);
    }

    #[test]
    fn past_end_time_returns_base() {
        let now = Utc::now();
        assert_eq!(current_price(BASE, None, Some(now), now), BASE);
        assert_eq!(
            current_price(BASE, None, Some(now - Duration::hours(1)), now),
            BASE
        );
    }

    #[test]
    fn tiered_discounts() {
        let now = Utc::now();
        // >= 60 min remaining: 10% off
        assert_eq!(
            current_price(BASE, None, Some(now + Duration::hours(2)), now),
            Decimal::new(900, 2)
        );
        // [30, 60) min remaining: 15% off
        assert_eq!(
            current_price(BASE, None, Some(now + Duration::minutes(45)), now),
            Decimal::new(850, 2)
        );
        // < 30 min remaining: 20% off
        assert_eq!(
            current_price(BASE, None, Some(now + Duration::minutes(10)), now),
            Decimal::new(800, 2)
        );
    }

    #[test]
    fn price_non_increasing_toward_deadline() {
        let now = Utc::now();
        let end = now + Duration::minutes(90);
        let far = current_price(BASE, None, Some(end), now);
        let mid = current_price(BASE, None, Some(end), now + Duration::minutes(45));
        let near = current_price(BASE, None, Some(end), now + Duration::minutes(75));
        assert!(far >= mid);
        assert!(mid >= near);
    }

    #[test]
    fn floor_applies() {
        let now = Utc::now();
        let end = Some(now + Duration::minutes(10)); // 20% off 10.00 = 8.00
        assert_eq!(
            current_price(BASE, Some(Decimal::new(900, 2)), end, now),
            Decimal::new(900, 2)
        );
        // Floor below the discount leaves the discount untouched.
        assert_eq!(
            current_price(BASE, Some(Decimal::new(500, 2)), end, now),
            Decimal::new(800, 2)
        );
    }

    #[test]
    fn rounds_half_even_to_cents() {
        let now = Utc::now();
        // 10.05 * 0.85 = 8.5425 -> 8.54
        assert_eq!(
            current_price(
                Decimal::new(1005, 2),
                None,
                Some(now + Duration::minutes(45)),
                now
            ),
            Decimal::new(854, 2)
        );
        // 10.15 * 0.90 = 9.135 -> 9.14 (midpoint to even)
        assert_eq!(
            current_price(
                Decimal::new(1015, 2),
                None,
                Some(now + Duration::hours(2)),
                now
            ),
            Decimal::new(914, 2)
        );
    }

    #[test]
    fn item_price_uses_item_fields() {
        let now = Utc::now();
        let item = lastbite_types::SellableItem::dummy_auction(
            BASE,
            Decimal::new(500, 2),
            now + Duration::minutes(10),
        );
        assert_eq!(item_price(&item, now), Decimal::new(800, 2));
    }
}
