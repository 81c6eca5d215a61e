//! Read-side composition: everything a product page needs in one call.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use lastbite_types::{Bid, ItemId, MarketError, Result, SellableItem, UserId};

use crate::engine::{AuctionHouse, FulfillmentSink};

/// A consistent snapshot of one item for display: the stored state, the
/// time-derived price, and the auction standing, all taken under a
/// single board lock.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub item: SellableItem,
    /// What a buyer pays right now, discount tier and floor applied.
    pub current_price: Decimal,
    pub highest_bid: Option<Bid>,
    pub bidding_open: bool,
    /// The amount the next bid must reach; `None` when bidding is closed
    /// or disabled.
    pub minimum_bid: Option<Decimal>,
    /// Set once the auction has closed with a winner.
    pub winner: Option<UserId>,
    /// The viewer's own bids on this item, most recent first. Empty for
    /// anonymous viewers.
    pub viewer_bids: Vec<Bid>,
}

impl AuctionHouse {
    /// Build the product-page view of an item.
    ///
    /// This is a read that can write: the expiration transition runs
    /// first, so a deadline that passed since the last request is
    /// resolved (winner selected, cart line deposited) before the
    /// snapshot is taken.
    pub fn item_view(
        &self,
        id: ItemId,
        viewer: Option<UserId>,
        now: DateTime<Utc>,
        sink: &dyn FulfillmentSink,
    ) -> Result<ItemView> {
        self.process_expiration_if_needed(id, now, sink)?;

        let board = self.lock_board();
        let item = board
            .item(id)
            .cloned()
            .ok_or(MarketError::ItemNotFound(id))?;

        let ledger = board.ledger(id);
        let highest_bid = ledger.and_then(|l| l.highest()).cloned();
        let bidding_open = item.bidding_open_at(now);
        let minimum_bid = bidding_open.then(|| match ledger {
            Some(ledger) => ledger.minimum_next_bid(&item, self.market_rules().bid_increment()),
            None => item.min_price.unwrap_or(item.base_price),
        });
        let winner = item
            .winning_bid
            .and_then(|bid_id| ledger.and_then(|l| l.get(bid_id)))
            .map(|bid| bid.bidder);
        let viewer_bids = viewer
            .and_then(|who| ledger.map(|l| l.by_bidder(who)))
            .unwrap_or_default();

        let current_price = lastbite_pricing::item_price(&item, now);

        Ok(ItemView {
            item,
            current_price,
            highest_bid,
            bidding_open,
            minimum_bid,
            winner,
            viewer_bids,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use lastbite_types::ItemStatus;

    use crate::engine::DiscardFulfillment;

    use super::*;

    fn auction_item(now: DateTime<Utc>, ends_in: Duration) -> SellableItem {
        SellableItem::dummy_auction(
            Decimal::new(1000, 2),
            Decimal::new(500, 2),
            now + ends_in,
        )
    }

    #[test]
    fn view_of_open_auction() {
        let house = AuctionHouse::default();
        let now = Utc::now();
        let id = house
            .list_item(auction_item(now, Duration::hours(2)))
            .unwrap();
        let sink = DiscardFulfillment;

        let bidder = UserId::new();
        house
            .place_bid(id, bidder, Decimal::new(600, 2), now, &sink)
            .unwrap();

        let view = house.item_view(id, Some(bidder), now, &sink).unwrap();
        assert!(view.bidding_open);
        // More than an hour out: early-bird 10% off.
        assert_eq!(view.current_price, Decimal::new(900, 2));
        assert_eq!(view.minimum_bid, Some(Decimal::new(650, 2)));
        assert_eq!(
            view.highest_bid.as_ref().map(|b| b.amount),
            Some(Decimal::new(600, 2))
        );
        assert!(view.winner.is_none());
        assert_eq!(view.viewer_bids.len(), 1);
    }

    #[test]
    fn view_resolves_expiry_and_reports_winner() {
        let house = AuctionHouse::default();
        let now = Utc::now();
        let id = house
            .list_item(auction_item(now, Duration::hours(1)))
            .unwrap();
        let sink = DiscardFulfillment;

        let bidder = UserId::new();
        house
            .place_bid(id, bidder, Decimal::new(700, 2), now, &sink)
            .unwrap();

        let late = now + Duration::hours(2);
        let view = house.item_view(id, None, late, &sink).unwrap();
        assert_eq!(view.item.status, ItemStatus::Reserved);
        assert!(!view.bidding_open);
        assert!(view.minimum_bid.is_none());
        assert_eq!(view.winner, Some(bidder));
        // Past the deadline the discount clock stops at the base price.
        assert_eq!(view.current_price, Decimal::new(1000, 2));
    }

    #[test]
    fn view_of_plain_listing_has_no_auction_fields() {
        let house = AuctionHouse::default();
        let now = Utc::now();
        let id = house
            .list_item(SellableItem::dummy_listing(Decimal::new(450, 2), 3))
            .unwrap();

        let view = house
            .item_view(id, None, now, &DiscardFulfillment)
            .unwrap();
        assert!(!view.bidding_open);
        assert!(view.minimum_bid.is_none());
        assert!(view.highest_bid.is_none());
        assert_eq!(view.current_price, Decimal::new(450, 2));
    }

    #[test]
    fn anonymous_viewer_sees_no_own_bids() {
        let house = AuctionHouse::default();
        let now = Utc::now();
        let id = house
            .list_item(auction_item(now, Duration::hours(2)))
            .unwrap();
        house
            .place_bid(id, UserId::new(), Decimal::new(600, 2), now, &DiscardFulfillment)
            .unwrap();

        let view = house
            .item_view(id, None, now, &DiscardFulfillment)
            .unwrap();
        assert!(view.viewer_bids.is_empty());
    }
}
