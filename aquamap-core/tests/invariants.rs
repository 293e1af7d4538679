mod common;

use aquamap_core::{store::MarkerStore, validation};
use common::{north, valid_draft};
use proptest::prelude::*;
use std::collections::HashSet;

const BASE_LAT: f64 = 28.6139;
const BASE_LNG: f64 = 77.2090;

#[derive(Debug, Clone)]
enum Op {
    /// Add at an offset in meters from the base point.
    Add { north_m: f64, east_m: f64 },
    /// Move the n-th stored marker (modulo store size).
    Update { target: usize, north_m: f64, east_m: f64 },
    Remove { target: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0.0..200.0f64, 0.0..200.0f64).prop_map(|(north_m, east_m)| Op::Add { north_m, east_m }),
        2 => (any::<usize>(), 0.0..200.0f64, 0.0..200.0f64)
            .prop_map(|(target, north_m, east_m)| Op::Update { target, north_m, east_m }),
        1 => any::<usize>().prop_map(|target| Op::Remove { target }),
    ]
}

fn offset(north_m: f64, east_m: f64) -> (f64, f64) {
    let east_deg = north(east_m) / BASE_LAT.to_radians().cos();
    (BASE_LAT + north(north_m), BASE_LNG + east_deg)
}

fn apply(store: &mut MarkerStore, op: &Op) {
    match *op {
        Op::Add { north_m, east_m } => {
            let (lat, lng) = offset(north_m, east_m);
            let _ = store.add(&valid_draft(lat, lng));
        }
        Op::Update { target, north_m, east_m } => {
            if store.is_empty() {
                return;
            }
            let id = store.markers()[target % store.len()].id.clone();
            let (lat, lng) = offset(north_m, east_m);
            let _ = store.update(&id, &valid_draft(lat, lng));
        }
        Op::Remove { target } => {
            if store.is_empty() {
                return;
            }
            let id = store.markers()[target % store.len()].id.clone();
            store.remove(&id);
        }
    }
}

proptest! {
    #[test]
    fn committed_markers_stay_twenty_meters_apart(ops in prop::collection::vec(op(), 1..60)) {
        let mut store = MarkerStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let markers = store.markers();
        for (i, a) in markers.iter().enumerate() {
            for b in &markers[i + 1..] {
                let d = validation::distance_m(a.coordinates(), b.coordinates());
                prop_assert!(d >= validation::MIN_SPACING_M, "{} and {} are {} m apart", a.id, b.id, d);
            }
        }
    }

    #[test]
    fn ids_are_unique(ops in prop::collection::vec(op(), 1..60)) {
        let mut store = MarkerStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let ids: HashSet<_> = store.iter().map(|m| &m.id).collect();
        prop_assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn removing_twice_equals_removing_once(ops in prop::collection::vec(op(), 1..30), target in any::<usize>()) {
        let mut store = MarkerStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        prop_assume!(!store.is_empty());
        let id = store.markers()[target % store.len()].id.clone();

        store.remove(&id);
        let once = store.markers().to_vec();
        prop_assert!(store.remove(&id).is_none());
        prop_assert_eq!(store.markers(), once.as_slice());
    }
}

#[test]
fn haversine_matches_a_meridian_arc() {
    let a = aquamap_schemas::geo::Coordinates::new(BASE_LAT, BASE_LNG);
    let b = aquamap_schemas::geo::Coordinates::new(BASE_LAT + north(1000.0), BASE_LNG);
    assert!((validation::distance_m(a, b) - 1000.0).abs() < 0.01);
}
