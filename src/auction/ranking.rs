use std::cmp::Ordering;

use crate::models::bid::Bid;

/// Ordering used everywhere a set of bids is ranked: highest amount first,
/// ties broken by earliest last update (first to reach the amount wins).
/// Matches the SQL `ORDER BY amount DESC, updated_at ASC` used in queries.
pub fn ranking_order(a: &Bid, b: &Bid) -> Ordering {
    b.amount
        .cmp(&a.amount)
        .then_with(|| a.updated_at.cmp(&b.updated_at))
}

/// The winning bid of a snapshot, or None for an empty set. A pure function
/// of the set: re-sorting or re-calling never changes the answer.
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().min_by(|a, b| ranking_order(a, b))
}

/// Number of bids in the snapshot.
pub fn bid_count(bids: &[Bid]) -> usize {
    bids.len()
}

/// 1-indexed position of `bid_id` within the snapshot under `ranking_order`.
/// None when the bid is not part of the snapshot.
pub fn rank(bid_id: i64, bids: &[Bid]) -> Option<usize> {
    let mut sorted: Vec<&Bid> = bids.iter().collect();
    sorted.sort_by(|a, b| ranking_order(a, b));
    sorted.iter().position(|b| b.id == bid_id).map(|p| p + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn bid(id: i64, bidder_id: i64, amount: i64, updated_offset_secs: i64) -> Bid {
        Bid {
            id,
            amount,
            bidder_id,
            product_id: 1,
            created_at: t0(),
            updated_at: t0() + Duration::seconds(updated_offset_secs),
        }
    }

    #[test]
    fn empty_set_has_no_highest_bid() {
        assert!(highest_bid(&[]).is_none());
    }

    #[test]
    fn highest_bid_picks_maximum_amount() {
        // Base price 1_200_000 auction scenario.
        let bids = vec![bid(1, 20, 1_300_000, 0), bid(2, 30, 1_400_000, 10)];
        let winner = highest_bid(&bids).unwrap();
        assert_eq!(winner.amount, 1_400_000);
        assert_eq!(bid_count(&bids), 2);
        assert_eq!(rank(2, &bids), Some(1));
        assert_eq!(rank(1, &bids), Some(2));
    }

    #[test]
    fn tie_broken_by_earliest_update() {
        let bids = vec![
            bid(1, 20, 2000, 30),
            bid(2, 30, 2000, 5),
            bid(3, 40, 1500, 0),
        ];
        assert_eq!(highest_bid(&bids).unwrap().id, 2);
        assert_eq!(rank(2, &bids), Some(1));
        assert_eq!(rank(1, &bids), Some(2));
        assert_eq!(rank(3, &bids), Some(3));
    }

    #[test]
    fn highest_bid_is_stable_under_reordering() {
        let mut bids = vec![
            bid(1, 20, 900, 0),
            bid(2, 30, 1100, 3),
            bid(3, 40, 1000, 6),
        ];
        let first = highest_bid(&bids).unwrap().id;
        bids.reverse();
        assert_eq!(highest_bid(&bids).unwrap().id, first);
    }

    #[test]
    fn rank_of_highest_is_one_for_any_non_empty_set() {
        let bids = vec![
            bid(1, 20, 700, 4),
            bid(2, 30, 900, 2),
            bid(3, 40, 900, 9),
            bid(4, 50, 650, 1),
        ];
        let winner = highest_bid(&bids).unwrap();
        assert_eq!(rank(winner.id, &bids), Some(1));
    }

    #[test]
    fn rank_of_unknown_bid_is_none() {
        let bids = vec![bid(1, 20, 700, 0)];
        assert_eq!(rank(42, &bids), None);
    }
}
