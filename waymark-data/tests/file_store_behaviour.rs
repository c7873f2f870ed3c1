//! Behavioural tests for trips persisted through `FileKeyValueStore`.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;
use waymark_core::{TripState, VIA_POINTS_KEY, ViaPoint};
use waymark_data::FileKeyValueStore;

/// World state: a temporary settings file and the trip opened on it.
struct StoreWorld {
    dir: TempDir,
    trip: RefCell<Option<TripState<FileKeyValueStore>>>,
}

impl StoreWorld {
    fn settings_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join("settings.json"))
            .expect("utf-8 temp path")
    }

    fn reopen(&self) {
        let store = FileKeyValueStore::new(self.settings_path());
        self.trip.replace(Some(TripState::new(store)));
    }

    fn with_trip<T>(&self, action: impl FnOnce(&mut TripState<FileKeyValueStore>) -> T) -> T {
        let mut borrowed = self.trip.borrow_mut();
        let trip = borrowed.as_mut().expect("trip opened");
        action(trip)
    }
}

#[fixture]
fn world() -> StoreWorld {
    StoreWorld {
        dir: TempDir::new().expect("create temp dir"),
        trip: RefCell::new(None),
    }
}

#[given("an empty settings file")]
fn empty_settings(world: &StoreWorld) {
    world.reopen();
}

#[given("a settings file that is not JSON")]
fn corrupt_settings(world: &StoreWorld) {
    waymark_fs::write_atomic(&world.settings_path(), b"{not json").expect("seed file");
    world.reopen();
}

#[given("a settings file whose via points are not a list")]
fn non_list_via_points(world: &StoreWorld) {
    let contents = format!("{{\"{VIA_POINTS_KEY}\": \"oops\"}}");
    waymark_fs::write_atomic(&world.settings_path(), contents.as_bytes()).expect("seed file");
    world.reopen();
}

#[when("I add via point {id} at {lat}, {lng}")]
fn add_via_point(world: &StoreWorld, id: String, lat: f64, lng: f64) {
    let point = ViaPoint::new(lat, lng).with_id(id.trim_matches('"'));
    world.with_trip(|trip| trip.add_via_point(point));
}

#[when("I set the interest weight to {weight}")]
fn set_interest_weight(world: &StoreWorld, weight: f64) {
    world.with_trip(|trip| trip.set_interest_weight(weight));
}

#[when("I reopen the trip")]
fn reopen_trip(world: &StoreWorld) {
    world.reopen();
}

#[then("the trip has {count} via points")]
fn via_point_count(world: &StoreWorld, count: usize) {
    assert_eq!(world.with_trip(|trip| trip.via_points().len()), count);
}

#[then("the interest weight is {weight}")]
fn interest_weight_is(world: &StoreWorld, weight: f64) {
    let actual = world.with_trip(|trip| trip.interest_weight().get());
    assert!((actual - weight).abs() < 1e-12, "got {actual}");
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/file_store.feature", name = $title)]
        fn $fn_name(world: StoreWorld) {
            let _ = world;
        }
    };
}

register_scenario!(settings_survive_reopen, "settings survive reopening the trip");
register_scenario!(
    corrupt_file_defaults,
    "a corrupt settings file falls back to defaults"
);
register_scenario!(
    corrupt_via_points_replaced,
    "corrupt via points are replaced on the next write"
);
register_scenario!(
    corrupt_file_replaced,
    "a corrupt settings file is replaced on the next write"
);
