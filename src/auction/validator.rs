use chrono::{DateTime, Utc};

use crate::auction::error::Rejection;
use crate::auction::lifecycle;
use crate::models::product::Product;

/// Decide whether a prospective first bid may be accepted. Pure: all inputs
/// are explicit, so the chain is unit-testable without a datastore. Checks run
/// in a fixed order and the first failure wins.
///
/// `already_bid` is the caller's pre-fetched answer to "does this bidder hold
/// a bid on this product". It is an optimization only; the UNIQUE
/// (bidder_id, product_id) constraint is the arbiter under concurrency.
pub fn validate_new_bid(
    amount: i64,
    product: &Product,
    bidder_id: i64,
    already_bid: bool,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    if !lifecycle::is_available(product, now) {
        return Err(Rejection::AuctionClosed);
    }

    if bidder_id == product.creator_id {
        return Err(Rejection::SelfBidForbidden);
    }

    check_amount(amount, product)?;

    if already_bid {
        return Err(Rejection::DuplicateBid);
    }

    Ok(())
}

/// Amending an existing bid re-runs the full rule set minus the duplicate
/// check: the auction must still be open and the new amount must clear the
/// base price.
pub fn validate_bid_update(
    amount: i64,
    product: &Product,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    if !lifecycle::is_available(product, now) {
        return Err(Rejection::AuctionClosed);
    }

    check_amount(amount, product)
}

/// Cancelling a bid is allowed only while the auction is open.
pub fn validate_bid_cancel(product: &Product, now: DateTime<Utc>) -> Result<(), Rejection> {
    if !lifecycle::is_available(product, now) {
        return Err(Rejection::AuctionClosed);
    }

    Ok(())
}

// Boundary is inclusive: a bid equal to the base price is accepted.
fn check_amount(amount: i64, product: &Product) -> Result<(), Rejection> {
    if amount <= 0 {
        return Err(Rejection::InvalidAmount);
    }

    if amount < product.base_price {
        return Err(Rejection::BelowBasePrice);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const CREATOR: i64 = 10;
    const BIDDER: i64 = 20;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn product(base_price: i64) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: 1,
            title: "Mountain bike".to_string(),
            description: "Barely used".to_string(),
            base_price,
            valid_till: now() + Duration::days(1),
            is_sold: false,
            category_id: 1,
            creator_id: CREATOR,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn bid_below_base_price_is_rejected() {
        let p = product(1000);
        assert_eq!(
            validate_new_bid(900, &p, BIDDER, false, now()),
            Err(Rejection::BelowBasePrice)
        );
    }

    // Boundary policy: equality with the base price is accepted.
    #[test]
    fn bid_equal_to_base_price_is_accepted() {
        let p = product(1000);
        assert_eq!(validate_new_bid(1000, &p, BIDDER, false, now()), Ok(()));
    }

    #[test]
    fn bid_above_base_price_is_accepted() {
        let p = product(1000);
        assert_eq!(validate_new_bid(1500, &p, BIDDER, false, now()), Ok(()));
    }

    #[test]
    fn creator_cannot_bid_on_own_product_regardless_of_amount() {
        let p = product(1000);
        assert_eq!(
            validate_new_bid(5_000_000, &p, CREATOR, false, now()),
            Err(Rejection::SelfBidForbidden)
        );
    }

    #[test]
    fn second_bid_by_same_bidder_is_rejected() {
        let p = product(1000);
        assert_eq!(
            validate_new_bid(2000, &p, BIDDER, true, now()),
            Err(Rejection::DuplicateBid)
        );
    }

    #[test]
    fn bid_after_deadline_is_rejected() {
        let mut p = product(1000);
        p.valid_till = now() - Duration::seconds(1);
        assert_eq!(
            validate_new_bid(2000, &p, BIDDER, false, now()),
            Err(Rejection::AuctionClosed)
        );
    }

    #[test]
    fn bid_on_sold_product_is_rejected() {
        let mut p = product(1000);
        p.is_sold = true;
        assert_eq!(
            validate_new_bid(2000, &p, BIDDER, false, now()),
            Err(Rejection::AuctionClosed)
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let p = product(1000);
        assert_eq!(
            validate_new_bid(0, &p, BIDDER, false, now()),
            Err(Rejection::InvalidAmount)
        );
        assert_eq!(
            validate_new_bid(-50, &p, BIDDER, false, now()),
            Err(Rejection::InvalidAmount)
        );
    }

    // Closed-auction wins over self-bid: check order is fixed.
    #[test]
    fn closed_auction_reported_before_self_bid() {
        let mut p = product(1000);
        p.valid_till = now() - Duration::days(1);
        assert_eq!(
            validate_new_bid(900, &p, CREATOR, false, now()),
            Err(Rejection::AuctionClosed)
        );
    }

    #[test]
    fn update_revalidates_amount_and_window() {
        let p = product(1000);
        assert_eq!(validate_bid_update(1200, &p, now()), Ok(()));
        assert_eq!(
            validate_bid_update(800, &p, now()),
            Err(Rejection::BelowBasePrice)
        );

        let mut closed = product(1000);
        closed.valid_till = now() - Duration::hours(1);
        assert_eq!(
            validate_bid_update(1200, &closed, now()),
            Err(Rejection::AuctionClosed)
        );
    }

    #[test]
    fn cancel_only_while_auction_open() {
        let p = product(1000);
        assert_eq!(validate_bid_cancel(&p, now()), Ok(()));

        let mut sold = product(1000);
        sold.is_sold = true;
        assert_eq!(
            validate_bid_cancel(&sold, now()),
            Err(Rejection::AuctionClosed)
        );
    }
}
