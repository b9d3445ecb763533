//! Unit tests for pd-spatial.

use pd_core::{EntityId, Point, SimRng, TimeLapse};

use crate::{ARRIVAL_SLACK, Bounds, EntityKind, PlaneModel, SpatialError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The 10 × 10 plane used throughout the workspace tests.
fn plane() -> PlaneModel {
    PlaneModel::new(Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap())
}

fn lapse(len: u64) -> TimeLapse {
    TimeLapse::new(0, len)
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounds {
    use super::*;

    #[test]
    fn corners_are_inside() {
        let b = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
        assert!(b.contains(Point::new(0.0, 0.0)));
        assert!(b.contains(Point::new(10.0, 10.0)));
        assert!(!b.contains(Point::new(10.0001, 5.0)));
    }

    #[test]
    fn degenerate_rejected() {
        let r = Bounds::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!(matches!(r, Err(SpatialError::InvalidBounds { .. })));
    }
}

// ── Placement & queries ───────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use super::*;

    #[test]
    fn place_and_lookup() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::new(1.0, 2.0)).unwrap();
        assert_eq!(p.position(EntityId(0)), Some(Point::new(1.0, 2.0)));
        assert_eq!(p.kind_of(EntityId(0)), Some(EntityKind::Vehicle));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn absent_entity_has_no_position() {
        let p = plane();
        assert_eq!(p.position(EntityId(3)), None);
        assert!(!p.contains(EntityId(3)));
    }

    #[test]
    fn double_place_rejected() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Parcel, Point::new(1.0, 1.0)).unwrap();
        let r = p.place(EntityId(0), EntityKind::Parcel, Point::new(2.0, 2.0));
        assert!(matches!(r, Err(SpatialError::AlreadyPlaced(EntityId(0)))));
    }

    #[test]
    fn out_of_bounds_rejected() {
        let mut p = plane();
        let r = p.place(EntityId(0), EntityKind::Parcel, Point::new(-1.0, 1.0));
        assert!(matches!(r, Err(SpatialError::OutOfBounds(_))));
    }

    #[test]
    fn remove_returns_last_position() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Parcel, Point::new(4.0, 4.0)).unwrap();
        assert_eq!(p.remove(EntityId(0)).unwrap(), Point::new(4.0, 4.0));
        assert!(p.is_empty());
        assert!(matches!(p.remove(EntityId(0)), Err(SpatialError::NotPlaced(_))));
    }

    #[test]
    fn equal_position_is_exact() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::new(5.0, 0.0)).unwrap();
        p.place(EntityId(1), EntityKind::Parcel, Point::new(5.0, 0.0)).unwrap();
        p.place(EntityId(2), EntityKind::Parcel, Point::new(5.0, 1e-12)).unwrap();
        assert!(p.equal_position(EntityId(0), EntityId(1)));
        assert!(!p.equal_position(EntityId(0), EntityId(2)));
        assert!(!p.equal_position(EntityId(0), EntityId(9)));
    }

    #[test]
    fn random_positions_stay_in_bounds() {
        let p = plane();
        let mut rng = SimRng::new(7);
        for _ in 0..1_000 {
            assert!(p.bounds().contains(p.random_position(&mut rng)));
        }
    }
}

// ── Nearest lookup ────────────────────────────────────────────────────────────

#[cfg(test)]
mod nearest {
    use super::*;

    #[test]
    fn filters_by_kind() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::new(1.0, 0.0)).unwrap();
        p.place(EntityId(1), EntityKind::Parcel, Point::new(5.0, 0.0)).unwrap();
        let found = p.nearest_of_kind(Point::ORIGIN, EntityKind::Parcel, |_| true);
        assert_eq!(found, Some(EntityId(1)));
    }

    #[test]
    fn applies_predicate() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Parcel, Point::new(1.0, 0.0)).unwrap();
        p.place(EntityId(1), EntityKind::Parcel, Point::new(5.0, 0.0)).unwrap();
        let found = p.nearest_of_kind(Point::ORIGIN, EntityKind::Parcel, |e| e != EntityId(0));
        assert_eq!(found, Some(EntityId(1)));
    }

    #[test]
    fn ties_go_to_first_placed() {
        let mut p = plane();
        p.place(EntityId(4), EntityKind::Parcel, Point::new(0.0, 3.0)).unwrap();
        p.place(EntityId(2), EntityKind::Parcel, Point::new(3.0, 0.0)).unwrap();
        let found = p.nearest_of_kind(Point::ORIGIN, EntityKind::Parcel, |_| true);
        assert_eq!(found, Some(EntityId(4)));
    }

    #[test]
    fn none_when_empty() {
        let p = plane();
        assert_eq!(p.nearest_of_kind(Point::ORIGIN, EntityKind::Parcel, |_| true), None);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn partial_step_consumes_whole_budget() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::ORIGIN).unwrap();
        let mut t = lapse(1);
        let used = p.move_toward(EntityId(0), Point::new(5.0, 0.0), &mut t, 1.0).unwrap();
        assert_eq!(used, 1);
        assert!(!t.has_time_left());
        assert_eq!(p.position(EntityId(0)), Some(Point::new(1.0, 0.0)));
    }

    #[test]
    fn arrival_snaps_and_returns_leftover() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::new(4.5, 0.0)).unwrap();
        let mut t = lapse(10);
        let used = p.move_toward(EntityId(0), Point::new(5.0, 0.0), &mut t, 1.0).unwrap();
        assert_eq!(used, 1, "0.5 units at speed 1 rounds up to one time unit");
        assert_eq!(t.time_left(), 9);
        assert_eq!(p.position(EntityId(0)), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn already_there_consumes_nothing() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::new(2.0, 2.0)).unwrap();
        let mut t = lapse(5);
        assert_eq!(p.move_toward(EntityId(0), Point::new(2.0, 2.0), &mut t, 1.0).unwrap(), 0);
        assert_eq!(t.time_left(), 5);
    }

    #[test]
    fn unplaced_entity_rejected() {
        let mut p = plane();
        let mut t = lapse(5);
        let r = p.move_toward(EntityId(0), Point::new(1.0, 1.0), &mut t, 1.0);
        assert!(matches!(r, Err(SpatialError::NotPlaced(EntityId(0)))));
        assert_eq!(t.time_left(), 5);
    }

    #[test]
    fn bad_speed_and_target_rejected() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::ORIGIN).unwrap();
        let mut t = lapse(5);
        assert!(matches!(
            p.move_toward(EntityId(0), Point::new(1.0, 1.0), &mut t, 0.0),
            Err(SpatialError::InvalidSpeed(_))
        ));
        assert!(matches!(
            p.move_toward(EntityId(0), Point::new(11.0, 1.0), &mut t, 1.0),
            Err(SpatialError::OutOfBounds(_))
        ));
    }

    #[test]
    fn five_unit_trip_takes_five_ticks() {
        let mut p = plane();
        p.place(EntityId(0), EntityKind::Vehicle, Point::ORIGIN).unwrap();
        let target = Point::new(5.0, 0.0);
        for tick in 1..=5u64 {
            let mut t = TimeLapse::new(tick - 1, tick);
            p.move_toward(EntityId(0), target, &mut t, 1.0).unwrap();
            let expected = Point::new(tick as f64, 0.0);
            assert_eq!(p.position(EntityId(0)), Some(expected));
        }
    }

    #[test]
    fn seven_step_diagonal_lands_on_seventh_tick() {
        let mut p = plane();
        let target = Point::new(0.9, 0.6);
        p.place(EntityId(0), EntityKind::Vehicle, Point::ORIGIN).unwrap();
        let speed = Point::ORIGIN.distance(target) / 7.0;
        for tick in 1..=7u64 {
            let mut t = TimeLapse::new(tick - 1, tick);
            p.move_toward(EntityId(0), target, &mut t, speed).unwrap();
            let at = p.position(EntityId(0)).unwrap();
            assert_eq!(at == target, tick == 7, "tick {tick}: at {at}");
        }
    }

    fn coord() -> impl Strategy<Value = f64> {
        0.0..=10.0f64
    }

    proptest! {
        /// A step never increases the distance to the target.
        #[test]
        fn never_overshoots(
            sx in coord(), sy in coord(), tx in coord(), ty in coord(),
            speed in 0.001..5.0f64, budget in 1u64..50,
        ) {
            let mut p = plane();
            let target = Point::new(tx, ty);
            p.place(EntityId(0), EntityKind::Vehicle, Point::new(sx, sy)).unwrap();
            let before = Point::new(sx, sy).distance(target);
            let mut t = lapse(budget);
            p.move_toward(EntityId(0), target, &mut t, speed).unwrap();
            let at = p.position(EntityId(0)).unwrap();
            prop_assert!(at.distance(target) <= before);
        }

        /// Once the cumulative reach covers the initial distance, the entity
        /// sits exactly on the target; before that it is strictly short of it.
        #[test]
        fn arrives_exactly_when_reach_suffices(
            sx in coord(), sy in coord(), tx in coord(), ty in coord(),
            speed in 0.05..2.0f64,
        ) {
            let mut p = plane();
            let start = Point::new(sx, sy);
            let target = Point::new(tx, ty);
            p.place(EntityId(0), EntityKind::Vehicle, start).unwrap();
            let initial = start.distance(target);

            let mut elapsed = 0u64;
            for _ in 0..400 {
                let mut t = TimeLapse::new(elapsed, elapsed + 1);
                p.move_toward(EntityId(0), target, &mut t, speed).unwrap();
                elapsed += 1;
                let at = p.position(EntityId(0)).unwrap();
                let reach = speed * elapsed as f64;
                if reach >= initial {
                    prop_assert_eq!(at, target);
                } else if reach < initial - 2.0 * ARRIVAL_SLACK {
                    prop_assert!(at != target);
                }
            }
        }

        /// Trips that take a whole number of ticks end on exactly that tick.
        #[test]
        fn exact_multiple_arrives_on_time(
            sx in coord(), sy in coord(), tx in coord(), ty in coord(),
            ticks in 2u64..=7,
        ) {
            let start = Point::new(sx, sy);
            let target = Point::new(tx, ty);
            let initial = start.distance(target);
            prop_assume!(initial > 0.0);
            let speed = initial / ticks as f64;

            let mut p = plane();
            p.place(EntityId(0), EntityKind::Vehicle, start).unwrap();
            for tick in 1..=ticks {
                let mut t = TimeLapse::new(tick - 1, tick);
                p.move_toward(EntityId(0), target, &mut t, speed).unwrap();
            }
            prop_assert_eq!(p.position(EntityId(0)), Some(target));
        }
    }
}
