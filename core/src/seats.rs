//! Seat availability filter.
//!
//! Pure views over a seat inventory. Every view is lazy, preserves the input
//! order and never deduplicates.
//!
//! ```
//! use flightdeck_core::seats::{free_business_seats, free_economy_seats, free_seats};
//! use flightdeck_core::types::{Seat, SeatCategory, SeatId};
//!
//! let mut business = Seat::new(SeatId::new(2), SeatCategory::Business);
//! business.is_registered = true;
//! let seats = vec![Seat::new(SeatId::new(1), SeatCategory::Economy), business];
//!
//! assert_eq!(free_seats(&seats).count(), 1);
//! assert_eq!(free_economy_seats(&seats).count(), 1);
//! assert_eq!(free_business_seats(&seats).count(), 0);
//! ```

use crate::types::{Seat, SeatCategory};

/// Free seats, optionally restricted to one fare category.
pub fn free_seats_in(
    seats: &[Seat],
    category: Option<SeatCategory>,
) -> impl Iterator<Item = &Seat> + '_ {
    seats
        .iter()
        .filter(move |seat| category.is_none_or(|c| seat.category == c))
        .filter(|seat| seat.is_free())
}

/// All free seats.
pub fn free_seats(seats: &[Seat]) -> impl Iterator<Item = &Seat> + '_ {
    free_seats_in(seats, None)
}

/// Free seats in the Economy cabin.
pub fn free_economy_seats(seats: &[Seat]) -> impl Iterator<Item = &Seat> + '_ {
    free_seats_in(seats, Some(SeatCategory::Economy))
}

/// Free seats in the Business cabin.
pub fn free_business_seats(seats: &[Seat]) -> impl Iterator<Item = &Seat> + '_ {
    free_seats_in(seats, Some(SeatCategory::Business))
}

/// Seats that are registered, sold, or both.
///
/// Exactly the complement of [`free_seats`].
pub fn occupied_seats(seats: &[Seat]) -> impl Iterator<Item = &Seat> + '_ {
    seats.iter().filter(|seat| !seat.is_free())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeatId;
    use proptest::prelude::*;

    fn seat(id: i64, category: SeatCategory, is_registered: bool, is_sold: bool) -> Seat {
        Seat {
            id: SeatId::new(id),
            category,
            is_registered,
            is_sold,
        }
    }

    fn ids<'a>(seats: impl Iterator<Item = &'a Seat>) -> Vec<i64> {
        seats.map(|s| s.id.get()).collect()
    }

    #[test]
    fn mixed_cabin_scenario() {
        let seats = vec![
            seat(1, SeatCategory::Economy, false, false),
            seat(2, SeatCategory::Business, true, false),
            seat(3, SeatCategory::Economy, false, true),
        ];

        assert_eq!(ids(free_seats(&seats)), vec![1]);
        assert_eq!(ids(free_economy_seats(&seats)), vec![1]);
        assert!(ids(free_business_seats(&seats)).is_empty());
        assert_eq!(ids(occupied_seats(&seats)), vec![2, 3]);
    }

    #[test]
    fn empty_inventory_yields_nothing() {
        let seats: Vec<Seat> = Vec::new();
        assert_eq!(free_seats(&seats).count(), 0);
        assert_eq!(free_economy_seats(&seats).count(), 0);
        assert_eq!(occupied_seats(&seats).count(), 0);
    }

    #[test]
    fn input_order_is_preserved() {
        let seats = vec![
            seat(30, SeatCategory::Business, false, false),
            seat(10, SeatCategory::Economy, false, false),
            seat(20, SeatCategory::Business, false, false),
        ];

        assert_eq!(ids(free_seats(&seats)), vec![30, 10, 20]);
        assert_eq!(ids(free_business_seats(&seats)), vec![30, 20]);
    }

    fn arb_category() -> impl Strategy<Value = SeatCategory> {
        prop_oneof![Just(SeatCategory::Economy), Just(SeatCategory::Business)]
    }

    fn arb_seats() -> impl Strategy<Value = Vec<Seat>> {
        prop::collection::vec((arb_category(), any::<bool>(), any::<bool>()), 0..40).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .zip(0_i64..)
                    .map(|((category, registered, sold), id)| seat(id, category, registered, sold))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn free_seats_are_an_unoccupied_subset(seats in arb_seats()) {
            let free: Vec<&Seat> = free_seats(&seats).collect();

            for s in &free {
                prop_assert!(!s.is_registered && !s.is_sold);
                prop_assert!(seats.contains(s));
            }
        }

        #[test]
        fn occupied_is_the_exact_complement(seats in arb_seats()) {
            let free = ids(free_seats(&seats));
            let occupied = ids(occupied_seats(&seats));

            prop_assert_eq!(free.len() + occupied.len(), seats.len());
            prop_assert!(free.iter().all(|id| !occupied.contains(id)));
        }

        #[test]
        fn cabin_views_are_disjoint_subsets_of_free(seats in arb_seats()) {
            let free = ids(free_seats(&seats));
            let economy = ids(free_economy_seats(&seats));
            let business = ids(free_business_seats(&seats));

            prop_assert!(economy.iter().all(|id| free.contains(id)));
            prop_assert!(business.iter().all(|id| free.contains(id)));
            prop_assert!(economy.iter().all(|id| !business.contains(id)));
            // Only two cabins exist, so together they cover every free seat
            prop_assert_eq!(economy.len() + business.len(), free.len());
        }
    }
}
