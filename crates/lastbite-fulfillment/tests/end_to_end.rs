//! End-to-end integration tests across all three planes.
//!
//! These tests exercise the full marketplace lifecycle:
//! Pricing -> Auction engine -> Cart fulfillment
//!
//! They verify the planes work together in realistic scenarios: dynamic
//! prices on the product view, the read-time expiration trigger, winner
//! fulfillment into the cart, checkout against live stock, and the
//! concurrent race to close an auction.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use lastbite_auction::{AuctionHouse, ExpirationOutcome, FulfillmentSink};
use lastbite_fulfillment::{checkout, refresh_cart_prices, CartBridge, CartStore};
use lastbite_types::{ItemId, ItemStatus, MarketError, Result, SellableItem, UserId};

/// Helper: the whole marketplace -- engine, cart store, and the bridge
/// between them.
struct Marketplace {
    house: Arc<AuctionHouse>,
    store: Arc<CartStore>,
    bridge: CartBridge,
}

impl Marketplace {
    fn new() -> Self {
        // One subscriber for the whole test binary; later calls no-op.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();

        let store = Arc::new(CartStore::new());
        Self {
            house: Arc::new(AuctionHouse::default()),
            bridge: CartBridge::new(Arc::clone(&store)),
            store,
        }
    }

    fn list_auction(
        &self,
        base: Decimal,
        floor: Decimal,
        end_time: DateTime<Utc>,
    ) -> ItemId {
        self.house
            .list_item(SellableItem::dummy_auction(base, floor, end_time))
            .expect("listing should validate")
    }

    fn list_auction_with_stock(
        &self,
        base: Decimal,
        floor: Decimal,
        end_time: DateTime<Utc>,
        quantity: u32,
    ) -> ItemId {
        let mut item = SellableItem::dummy_auction(base, floor, end_time);
        item.quantity = quantity;
        self.house.list_item(item).expect("listing should validate")
    }

    fn bid(&self, item: ItemId, bidder: UserId, amount: Decimal, now: DateTime<Utc>) {
        self.house
            .place_bid(item, bidder, amount, now, &self.bridge)
            .expect("bid should be accepted");
    }
}

// =====================================================================
// Pricing through the product view
// =====================================================================

#[test]
fn product_view_walks_the_discount_tiers() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::minutes(90),
    );

    // 90 minutes out: early bird, 10% off.
    let view = market.house.item_view(id, None, now, &market.bridge).unwrap();
    assert_eq!(view.current_price, Decimal::new(900, 2));

    // 45 minutes out: closing soon, 15% off.
    let view = market
        .house
        .item_view(id, None, now + Duration::minutes(45), &market.bridge)
        .unwrap();
    assert_eq!(view.current_price, Decimal::new(850, 2));

    // 20 minutes out: final call, 20% off.
    let view = market
        .house
        .item_view(id, None, now + Duration::minutes(70), &market.bridge)
        .unwrap();
    assert_eq!(view.current_price, Decimal::new(800, 2));
}

#[test]
fn discount_never_undercuts_the_floor() {
    let market = Marketplace::new();
    let now = Utc::now();
    // 20% off $10.00 is $8.00, below the $8.50 floor.
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(850, 2),
        now + Duration::minutes(20),
    );

    let view = market.house.item_view(id, None, now, &market.bridge).unwrap();
    assert_eq!(view.current_price, Decimal::new(850, 2));
}

// =====================================================================
// The winner lifecycle
// =====================================================================

#[test]
fn winner_gets_cart_line_and_checks_out() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
    );

    let (alice, bob) = (UserId::new(), UserId::new());
    market.bid(id, alice, Decimal::new(600, 2), now);
    market.bid(id, bob, Decimal::new(725, 2), now + Duration::seconds(5));

    // Nobody looked since the deadline: still Listed in storage.
    let late = now + Duration::hours(2);
    assert_eq!(market.house.item(id).unwrap().status, ItemStatus::Listed);

    // The first read resolves it.
    let view = market.house.item_view(id, None, late, &market.bridge).unwrap();
    assert_eq!(view.item.status, ItemStatus::Reserved);
    assert_eq!(view.winner, Some(bob));

    // Bob's cart got the quantity-1 line at the winning amount.
    let cart = market.store.cart_for(bob, late);
    let line = cart.line_for(id).unwrap();
    assert_eq!(line.unit_price_cents, 725);
    assert_eq!(line.quantity, 1);
    assert!(market.store.cart_for(alice, late).is_empty());

    // Checkout consumes the reserved stock.
    let receipt = checkout(&market.store, &market.house, bob, late);
    assert_eq!(receipt.total_cents(), 725);
    assert!(receipt.skipped.is_empty());
    assert_eq!(market.house.item(id).unwrap().status, ItemStatus::Sold);
}

#[test]
fn expiration_is_idempotent_across_reads() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
    );
    let winner = UserId::new();
    market.bid(id, winner, Decimal::new(700, 2), now);

    let late = now + Duration::hours(2);
    let first = market
        .house
        .process_expiration_if_needed(id, late, &market.bridge)
        .unwrap();
    assert!(matches!(first, ExpirationOutcome::WinnerSelected(_)));

    // Every later read is a no-op: same status, same single cart line.
    for _ in 0..3 {
        let again = market
            .house
            .process_expiration_if_needed(id, late, &market.bridge)
            .unwrap();
        assert!(matches!(again, ExpirationOutcome::Unchanged));
        market.house.item_view(id, None, late, &market.bridge).unwrap();
    }
    assert_eq!(market.store.cart_for(winner, late).lines.len(), 1);
}

#[test]
fn no_bid_auction_expires_without_fulfillment() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::minutes(30),
    );

    let late = now + Duration::hours(1);
    let outcome = market
        .house
        .process_expiration_if_needed(id, late, &market.bridge)
        .unwrap();
    assert!(matches!(outcome, ExpirationOutcome::ExpiredNoBids));

    let item = market.house.item(id).unwrap();
    assert_eq!(item.status, ItemStatus::Expired);
    assert!(item.winning_bid.is_none());
}

#[test]
fn multi_unit_auction_still_deposits_quantity_one() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction_with_stock(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
        3,
    );
    let winner = UserId::new();
    market.bid(id, winner, Decimal::new(700, 2), now);

    let late = now + Duration::hours(2);
    market
        .house
        .process_expiration_if_needed(id, late, &market.bridge)
        .unwrap();

    let cart = market.store.cart_for(winner, late);
    assert_eq!(cart.line_for(id).unwrap().quantity, 1);

    // Checkout takes one of the three units.
    checkout(&market.store, &market.house, winner, late);
    let item = market.house.item(id).unwrap();
    assert_eq!(item.quantity, 2);
    assert_eq!(item.status, ItemStatus::Reserved);
}

#[test]
fn sink_failure_never_reopens_the_auction() {
    struct RefusingSink;

    impl FulfillmentSink for RefusingSink {
        fn deposit_winning_line(
            &self,
            _: UserId,
            _: ItemId,
            _: Decimal,
            _: DateTime<Utc>,
        ) -> Result<()> {
            Err(MarketError::FulfillmentFailed {
                reason: "cart backend unavailable".into(),
            })
        }
    }

    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
    );
    let winner = UserId::new();
    market.bid(id, winner, Decimal::new(700, 2), now);

    let late = now + Duration::hours(2);
    let outcome = market
        .house
        .process_expiration_if_needed(id, late, &RefusingSink)
        .unwrap();
    assert!(matches!(outcome, ExpirationOutcome::WinnerSelected(_)));

    // Reserved for the winner even though the deposit failed.
    let item = market.house.item(id).unwrap();
    assert_eq!(item.status, ItemStatus::Reserved);
    assert_eq!(
        market
            .house
            .get_winning_bidder(id, late, &market.bridge)
            .unwrap(),
        Some(winner)
    );
}

// =====================================================================
// Bid validation through the full stack
// =====================================================================

#[test]
fn rejected_low_bid_names_the_required_minimum() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
    );
    market.bid(id, UserId::new(), Decimal::new(1000, 2), now);

    let err = market
        .house
        .place_bid(id, UserId::new(), Decimal::new(1025, 2), now, &market.bridge)
        .unwrap_err();
    assert!(err.to_string().contains("10.50"));

    market.bid(id, UserId::new(), Decimal::new(1050, 2), now);
}

#[test]
fn owners_are_rejected_before_anything_else() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::hours(1),
    );
    let owner = market.house.item(id).unwrap().owner;

    // Open auction, generous amount, closed auction, lowball amount --
    // always the same error for the item's owner.
    for (amount, at) in [
        (Decimal::new(5000, 2), now),
        (Decimal::new(1, 2), now),
        (Decimal::new(5000, 2), now + Duration::hours(2)),
    ] {
        let err = market
            .house
            .place_bid(id, owner, amount, at, &market.bridge)
            .unwrap_err();
        assert!(matches!(err, MarketError::SelfBidForbidden), "{err}");
    }
}

#[test]
fn cart_refresh_resolves_unobserved_expiry_through_the_bridge() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::minutes(10),
    );
    let winner = UserId::new();
    market.bid(id, winner, Decimal::new(725, 2), now);

    // The winner also added the item to their cart at a display price.
    market.store.upsert_line(winner, id, 900, 1, now);

    // Deadline passes with nobody looking: still Listed in storage.
    let late = now + Duration::minutes(20);
    assert_eq!(market.house.item(id).unwrap().status, ItemStatus::Listed);

    // The refresh's own price lookup fires the expiration, and the
    // winning line comes back through the same store the refresh is
    // walking.
    refresh_cart_prices(&market.store, &market.house, winner, late, &market.bridge).unwrap();

    assert_eq!(market.house.item(id).unwrap().status, ItemStatus::Reserved);
    let cart = market.store.cart_for(winner, late);
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.line_for(id).unwrap().unit_price_cents, 725);
    assert_eq!(cart.line_for(id).unwrap().quantity, 1);
}

// =====================================================================
// The concurrent race to close
// =====================================================================

#[test]
fn concurrent_readers_select_exactly_one_winner() {
    let market = Marketplace::new();
    let now = Utc::now();
    let id = market.list_auction(
        Decimal::new(1000, 2),
        Decimal::new(500, 2),
        now + Duration::minutes(5),
    );
    let winner = UserId::new();
    market.bid(id, winner, Decimal::new(700, 2), now);

    let late = now + Duration::minutes(10);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let house = Arc::clone(&market.house);
        let bridge = market.bridge.clone();
        handles.push(thread::spawn(move || {
            matches!(
                house
                    .process_expiration_if_needed(id, late, &bridge)
                    .unwrap(),
                ExpirationOutcome::WinnerSelected(_)
            )
        }));
    }

    let wins: usize = handles
        .into_iter()
        .map(|handle| usize::from(handle.join().unwrap()))
        .sum();
    assert_eq!(wins, 1, "exactly one reader claims the transition");

    // And exactly one cart line came out of the race.
    assert_eq!(market.store.cart_for(winner, late).lines.len(), 1);
    assert_eq!(market.house.item(id).unwrap().status, ItemStatus::Reserved);
}
