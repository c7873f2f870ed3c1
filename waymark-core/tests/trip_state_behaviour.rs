//! Behavioural tests for `TripState`.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use waymark_core::test_support::MemoryKeyValueStore;
use waymark_core::{Coordinate, TripDefaults, TripState, ViaPoint, ViaPointKey, ViewId};

/// World state for trip scenarios.
struct TripWorld {
    trip: RefCell<TripState<MemoryKeyValueStore>>,
}

#[fixture]
fn world() -> TripWorld {
    TripWorld {
        trip: RefCell::new(TripState::new(MemoryKeyValueStore::default())),
    }
}

fn via_coordinate() -> Coordinate {
    Coordinate::new(51.509, -0.14).expect("valid via coordinate")
}

#[given("a fresh trip in London")]
fn fresh_trip(world: &TripWorld) {
    world
        .trip
        .replace(TripState::with_defaults(
            MemoryKeyValueStore::default(),
            TripDefaults::LONDON,
        ));
}

#[when("I add via point {id} at {lat}, {lng}")]
fn add_via_point(world: &TripWorld, id: String, lat: f64, lng: f64) {
    let point = ViaPoint::new(lat, lng).with_id(id.trim_matches('"'));
    world.trip.borrow_mut().add_via_point(point);
}

#[when("I remove via point {id}")]
fn remove_via_point(world: &TripWorld, id: String) {
    world
        .trip
        .borrow_mut()
        .remove_via_point(&ViaPointKey::id(id.trim_matches('"')));
}

#[when("I clear the via points")]
fn clear_via_points(world: &TripWorld) {
    world.trip.borrow_mut().clear_via_points();
}

#[when("I set the interest weight to {weight}")]
fn set_interest_weight(world: &TripWorld, weight: f64) {
    world.trip.borrow_mut().set_interest_weight(weight);
}

#[when("the step list toggles the pin on step {index}")]
fn list_toggles_pin(world: &TripWorld, index: usize) {
    world
        .trip
        .borrow_mut()
        .toggle_pinned_step(index, ViewId::StepList);
}

#[when("the map toggles the pin on step {index}")]
fn map_toggles_pin(world: &TripWorld, index: usize) {
    world.trip.borrow_mut().toggle_pinned_step(index, ViewId::Map);
}

#[when("the step list hovers step {index}")]
fn list_hovers(world: &TripWorld, index: usize) {
    world
        .trip
        .borrow_mut()
        .set_hovered_step(index, ViewId::StepList);
}

#[when("the map clears its hover")]
fn map_clears_hover(world: &TripWorld) {
    world.trip.borrow_mut().clear_hovered_step(ViewId::Map);
}

#[then("the waypoints are the start, p1 and the end")]
fn waypoints_with_via(world: &TripWorld) {
    let defaults = TripDefaults::LONDON;
    assert_eq!(
        world.trip.borrow().build_waypoints(),
        vec![defaults.start, via_coordinate(), defaults.end]
    );
}

#[then("the waypoints are the start and the end")]
fn waypoints_without_via(world: &TripWorld) {
    let defaults = TripDefaults::LONDON;
    assert_eq!(
        world.trip.borrow().build_waypoints(),
        vec![defaults.start, defaults.end]
    );
}

#[then("the trip has {count} via points")]
fn via_point_count(world: &TripWorld, count: usize) {
    assert_eq!(world.trip.borrow().via_points().len(), count);
}

#[then("the store was written {count} times")]
fn store_writes(world: &TripWorld, count: usize) {
    assert_eq!(world.trip.borrow().store().write_count(), count);
}

#[then("the interest weight is {weight}")]
fn interest_weight_is(world: &TripWorld, weight: f64) {
    let actual = world.trip.borrow().interest_weight().get();
    assert!((actual - weight).abs() < 1e-12, "got {actual}");
}

#[then("step {index} is pinned")]
fn step_is_pinned(world: &TripWorld, index: usize) {
    let pinned = world.trip.borrow().selection().pinned();
    assert_eq!(pinned.map(|step| step.index), Some(index));
}

#[then("no step is pinned")]
fn nothing_pinned(world: &TripWorld) {
    assert_eq!(world.trip.borrow().selection().pinned(), None);
}

#[then("step {index} is hovered")]
fn step_is_hovered(world: &TripWorld, index: usize) {
    let hovered = world.trip.borrow().selection().hovered();
    assert_eq!(hovered.map(|step| step.index), Some(index));
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/trip_state.feature", name = $title)]
        fn $fn_name(world: TripWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    london_round_trip,
    "adding and removing a via point in London"
);
register_scenario!(duplicate_via_point, "adding the same via point twice");
register_scenario!(
    shared_position_via_point,
    "a second id at the same position is the same via point"
);
register_scenario!(clearing_empty_trip, "clearing an empty trip");
register_scenario!(legacy_weight, "a legacy interest weight is rescaled");
register_scenario!(
    toggle_from_other_view,
    "toggling a pin from another view clears it"
);
register_scenario!(
    guarded_hover_clear,
    "the map cannot clear a hover set by the list"
);
