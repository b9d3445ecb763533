//! Unit tests for pd-pdp.

use pd_core::{EntityId, Point, TimeLapse};
use pd_spatial::{Bounds, EntityKind, PlaneModel};

use crate::{ParcelSpec, ParcelState, PdpError, PdpModel, VehicleState};

// ── Helpers ───────────────────────────────────────────────────────────────────

const TRUCK: EntityId = EntityId(0);
const BOX: EntityId = EntityId(1);

fn plane() -> PlaneModel {
    PlaneModel::new(Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap())
}

fn spec(magnitude: f64, pickup: u64, delivery: u64) -> ParcelSpec {
    ParcelSpec {
        destination:       Point::new(5.0, 5.0),
        pickup_duration:   pickup,
        delivery_duration: delivery,
        magnitude,
    }
}

/// Truck and box co-located at (5, 0); box bound for (5, 5).
fn setup(capacity: f64, parcel: ParcelSpec) -> (PlaneModel, PdpModel) {
    let mut plane = plane();
    let mut pdp = PdpModel::new();
    plane.place(TRUCK, EntityKind::Vehicle, Point::new(5.0, 0.0)).unwrap();
    plane.place(BOX, EntityKind::Parcel, Point::new(5.0, 0.0)).unwrap();
    pdp.add_vehicle(TRUCK, capacity).unwrap();
    pdp.add_parcel(BOX, parcel).unwrap();
    (plane, pdp)
}

fn lapse(len: u64) -> TimeLapse {
    TimeLapse::new(0, len)
}

// ── Pickup ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pickup {
    use super::*;

    #[test]
    fn instant_pickup_moves_parcel_into_cargo() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        let mut t = lapse(5);
        pdp.pickup(&mut plane, TRUCK, BOX, &mut t).unwrap();
        assert!(pdp.container_contains(TRUCK, BOX));
        assert_eq!(pdp.contents_size(TRUCK), 1.0);
        assert_eq!(pdp.parcel_state(BOX), Some(ParcelState::InCargo));
        assert!(!plane.contains(BOX), "carried parcel leaves the plane");
        assert_eq!(t.time_left(), 5);
        assert_eq!(pdp.vehicle_state(TRUCK), Some(VehicleState::Idle));
    }

    #[test]
    fn long_pickup_spans_ticks() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 25, 0));
        let mut t = lapse(10);
        pdp.pickup(&mut plane, TRUCK, BOX, &mut t).unwrap();
        assert!(!t.has_time_left());
        assert_eq!(pdp.vehicle_state(TRUCK), Some(VehicleState::PickingUp));
        assert!(!pdp.container_contains(TRUCK, BOX));

        let mut t = lapse(10);
        assert!(!pdp.continue_service(TRUCK, &mut t).unwrap());
        assert_eq!(pdp.vehicle_state(TRUCK), Some(VehicleState::PickingUp));

        let mut t = lapse(10);
        assert!(pdp.continue_service(TRUCK, &mut t).unwrap());
        assert_eq!(t.time_left(), 5, "only the remaining 5 units are spent");
        assert!(pdp.container_contains(TRUCK, BOX));
        assert_eq!(pdp.vehicle_state(TRUCK), Some(VehicleState::Idle));
    }

    #[test]
    fn not_co_located_rejected() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        let mut t = lapse(10);
        plane.move_toward(TRUCK, Point::new(5.0, 1.0), &mut t, 0.01).unwrap();
        let r = pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::NotCoLocated { .. })));
        assert!(plane.contains(BOX));
    }

    #[test]
    fn over_capacity_rejected() {
        let (mut plane, mut pdp) = setup(2.0, spec(3.0, 0, 0));
        let r = pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::OverCapacity { .. })));
        assert_eq!(pdp.parcel_state(BOX), Some(ParcelState::Available));
    }

    #[test]
    fn exact_fit_accepted() {
        let (mut plane, mut pdp) = setup(3.0, spec(3.0, 0, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert_eq!(pdp.contents_size(TRUCK), 3.0);
    }

    #[test]
    fn second_pickup_of_same_parcel_rejected() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        let r = pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::ParcelNotAvailable { state: ParcelState::InCargo, .. })));
    }

    #[test]
    fn busy_vehicle_rejected() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 100, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        let r = pdp.deliver(&plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::VehicleBusy(TRUCK))));
    }
}

// ── Delivery ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod delivery {
    use super::*;

    fn loaded(delivery: u64) -> (PlaneModel, PdpModel) {
        let (mut plane, mut pdp) = setup(10.0, spec(2.0, 0, delivery));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        (plane, pdp)
    }

    #[test]
    fn deliver_at_destination() {
        let (mut plane, mut pdp) = loaded(0);
        plane.move_toward(TRUCK, Point::new(5.0, 5.0), &mut lapse(5), 1.0).unwrap();
        pdp.deliver(&plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert!(!pdp.container_contains(TRUCK, BOX));
        assert_eq!(pdp.contents_size(TRUCK), 0.0);
        assert_eq!(pdp.parcel_state(BOX), Some(ParcelState::Delivered));
        assert_eq!(pdp.take_delivered(), vec![BOX]);
        assert!(pdp.take_delivered().is_empty());
    }

    #[test]
    fn long_delivery_reports_delivering() {
        let (mut plane, mut pdp) = loaded(3);
        plane.move_toward(TRUCK, Point::new(5.0, 5.0), &mut lapse(5), 1.0).unwrap();
        pdp.deliver(&plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert_eq!(pdp.vehicle_state(TRUCK), Some(VehicleState::Delivering));
        assert!(pdp.container_contains(TRUCK, BOX), "still aboard until done");
        assert!(pdp.continue_service(TRUCK, &mut lapse(2)).unwrap());
        assert_eq!(pdp.parcel_state(BOX), Some(ParcelState::Delivered));
    }

    #[test]
    fn away_from_destination_rejected() {
        let (plane, mut pdp) = loaded(0);
        let r = pdp.deliver(&plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::NotAtDestination { .. })));
    }

    #[test]
    fn uncarried_parcel_rejected() {
        let (plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        let r = pdp.deliver(&plane, TRUCK, BOX, &mut lapse(1));
        assert!(matches!(r, Err(PdpError::NotCarried { .. })));
    }
}

// ── Registration ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod registration {
    use super::*;

    #[test]
    fn duplicate_ids_rejected() {
        let mut pdp = PdpModel::new();
        pdp.add_vehicle(TRUCK, 1.0).unwrap();
        assert!(matches!(pdp.add_parcel(TRUCK, spec(1.0, 0, 0)), Err(PdpError::AlreadyRegistered(_))));
        assert!(matches!(pdp.add_vehicle(TRUCK, 1.0), Err(PdpError::AlreadyRegistered(_))));
    }

    #[test]
    fn negative_magnitude_rejected() {
        let mut pdp = PdpModel::new();
        assert!(matches!(pdp.add_parcel(BOX, spec(-1.0, 0, 0)), Err(PdpError::InvalidMagnitude(_))));
    }

    #[test]
    fn remove_parcel_clears_contents() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert!(pdp.remove_parcel(BOX).is_some());
        assert!(pdp.contents(TRUCK).is_empty());
        assert_eq!(pdp.parcel_state(BOX), None);
    }

    #[test]
    fn unknown_vehicle_has_no_state() {
        let pdp = PdpModel::new();
        assert_eq!(pdp.vehicle_state(TRUCK), None);
        assert_eq!(pdp.contents_size(TRUCK), 0.0);
    }

    #[test]
    fn empty_load_is_positive_zero() {
        let (mut plane, mut pdp) = setup(2.0, spec(3.0, 0, 0));
        assert!(pdp.contents_size(TRUCK).is_sign_positive());
        match pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)) {
            Err(PdpError::OverCapacity { load, .. }) => assert!(load.is_sign_positive()),
            other => panic!("expected OverCapacity, got {other:?}"),
        }
    }

    #[test]
    fn remove_vehicle_returns_cargo() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 0, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert_eq!(pdp.remove_vehicle(TRUCK), Some(vec![BOX]));
        assert_eq!(pdp.capacity(TRUCK), None);
        assert_eq!(pdp.remove_vehicle(TRUCK), None);
    }

    #[test]
    fn remove_vehicle_mid_pickup_returns_parcel() {
        let (mut plane, mut pdp) = setup(10.0, spec(1.0, 5, 0));
        pdp.pickup(&mut plane, TRUCK, BOX, &mut lapse(1)).unwrap();
        assert_eq!(pdp.parcel_state(BOX), Some(ParcelState::PickingUp));
        assert!(pdp.contents(TRUCK).is_empty());
        assert_eq!(pdp.remove_vehicle(TRUCK), Some(vec![BOX]));
    }
}

// ── Capacity invariant ────────────────────────────────────────────────────────

#[cfg(test)]
mod capacity {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// However many co-located parcels a vehicle attempts to load, its
        /// carried magnitude never exceeds its capacity, and every refusal is
        /// an `OverCapacity` error.
        #[test]
        fn load_never_exceeds_capacity(
            capacity in 0.0..20.0f64,
            magnitudes in proptest::collection::vec(0.0..6.0f64, 1..12),
        ) {
            let mut plane = plane();
            let mut pdp = PdpModel::new();
            let at = Point::new(3.0, 3.0);
            plane.place(TRUCK, EntityKind::Vehicle, at).unwrap();
            pdp.add_vehicle(TRUCK, capacity).unwrap();

            for (i, &m) in magnitudes.iter().enumerate() {
                let parcel = EntityId(i as u32 + 1);
                plane.place(parcel, EntityKind::Parcel, at).unwrap();
                pdp.add_parcel(parcel, spec(m, 0, 0)).unwrap();
                match pdp.pickup(&mut plane, TRUCK, parcel, &mut lapse(1)) {
                    Ok(()) => prop_assert!(pdp.container_contains(TRUCK, parcel)),
                    Err(PdpError::OverCapacity { .. }) => prop_assert!(plane.contains(parcel)),
                    Err(e) => prop_assert!(false, "unexpected error {e}"),
                }
                prop_assert!(pdp.contents_size(TRUCK) <= capacity);
            }
        }
    }
}
