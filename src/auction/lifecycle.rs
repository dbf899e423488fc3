use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::auction::error::Rejection;
use crate::models::product::Product;

/// Derived auction state of a product. Never stored; recomputed from the
/// sold flag and deadline on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Ongoing,
    Finished,
    Sold,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Ongoing => "ongoing",
            ProductStatus::Finished => "finished",
            ProductStatus::Sold => "sold",
        }
    }
}

/// Sold wins over the deadline check: a sold product stays sold even while
/// its deadline is still in the future.
pub fn status(product: &Product, now: DateTime<Utc>) -> ProductStatus {
    if product.is_sold {
        ProductStatus::Sold
    } else if product.valid_till > now {
        ProductStatus::Ongoing
    } else {
        ProductStatus::Finished
    }
}

pub fn is_available(product: &Product, now: DateTime<Utc>) -> bool {
    status(product, now) == ProductStatus::Ongoing
}

/// Remaining auction time, clamped at zero once the deadline has passed.
pub fn time_left(product: &Product, now: DateTime<Utc>) -> Duration {
    let left = product.valid_till - now;
    if left > Duration::zero() {
        left
    } else {
        Duration::zero()
    }
}

/// Guard for the explicit mark-sold transition. Only the creator may settle,
/// only once, and only after the deadline has elapsed. No transition leaves
/// the sold state.
pub fn check_mark_sold(
    product: &Product,
    caller_id: i64,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    if product.creator_id != caller_id {
        return Err(Rejection::NotOwner);
    }

    match status(product, now) {
        ProductStatus::Sold => Err(Rejection::AlreadySold),
        ProductStatus::Ongoing => Err(Rejection::AuctionStillOpen),
        ProductStatus::Finished => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(valid_till: DateTime<Utc>, is_sold: bool) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: 1,
            title: "Vintage camera".to_string(),
            description: "Working condition".to_string(),
            base_price: 1000,
            valid_till,
            is_sold,
            category_id: 1,
            creator_id: 10,
            created_at: created,
            updated_at: created,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn ongoing_while_deadline_in_future() {
        let p = product(now() + Duration::days(1), false);
        assert_eq!(status(&p, now()), ProductStatus::Ongoing);
        assert!(is_available(&p, now()));
    }

    #[test]
    fn finished_once_deadline_passes() {
        let p = product(now() - Duration::seconds(1), false);
        assert_eq!(status(&p, now()), ProductStatus::Finished);
        assert!(!is_available(&p, now()));
    }

    #[test]
    fn deadline_exactly_now_counts_as_finished() {
        let p = product(now(), false);
        assert_eq!(status(&p, now()), ProductStatus::Finished);
    }

    #[test]
    fn sold_takes_precedence_over_open_deadline() {
        let p = product(now() + Duration::days(7), true);
        assert_eq!(status(&p, now()), ProductStatus::Sold);
        assert!(!is_available(&p, now()));
    }

    #[test]
    fn time_left_counts_down() {
        let p = product(now() + Duration::hours(3), false);
        assert_eq!(time_left(&p, now()), Duration::hours(3));
    }

    #[test]
    fn time_left_clamps_at_zero() {
        let p = product(now() - Duration::hours(3), false);
        assert_eq!(time_left(&p, now()), Duration::zero());
    }

    #[test]
    fn mark_sold_allowed_for_creator_after_deadline() {
        let p = product(now() - Duration::days(1), false);
        assert_eq!(check_mark_sold(&p, 10, now()), Ok(()));
    }

    #[test]
    fn mark_sold_rejected_while_ongoing() {
        let p = product(now() + Duration::days(1), false);
        assert_eq!(
            check_mark_sold(&p, 10, now()),
            Err(Rejection::AuctionStillOpen)
        );
    }

    #[test]
    fn mark_sold_twice_rejected_as_already_sold() {
        let p = product(now() - Duration::days(1), true);
        assert_eq!(check_mark_sold(&p, 10, now()), Err(Rejection::AlreadySold));
    }

    #[test]
    fn mark_sold_rejected_for_non_creator() {
        let p = product(now() - Duration::days(1), false);
        assert_eq!(check_mark_sold(&p, 99, now()), Err(Rejection::NotOwner));
    }
}
