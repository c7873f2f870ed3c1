//! In-memory stores and scripted ports used by unit and behaviour tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geo::{Coord, LineString};

use crate::{
    Coordinate, GatewayError, KeyValueStore, ProfileError, ProfileSource, RecommendationGateway,
    RecommendationQuery, RecommendationSet, RouteLeg, RouteResult, RouteStep, RoutingAdapter,
    RoutingError, StorageError, UserInterestProfile,
};

/// `KeyValueStore` backed by a `HashMap`, counting writes.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryKeyValueStore {
    /// Create a store holding a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.lock().insert(key.to_owned(), value.to_owned());
        store
    }

    /// Number of successful `set` and `remove` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value of `key`.
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// `KeyValueStore` that fails every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

fn unavailable() -> StorageError {
    StorageError::Unavailable {
        message: "storage disabled".to_owned(),
    }
}

/// `RoutingAdapter` producing straight segments between waypoints.
///
/// Each leg holds a single step of 1 km taking 10 minutes.
#[derive(Debug, Default)]
pub struct StubRoutingAdapter {
    failure: Option<RoutingError>,
    calls: RefCell<Vec<Vec<Coordinate>>>,
}

impl StubRoutingAdapter {
    /// Adapter that always succeeds.
    pub fn straight_lines() -> Self {
        Self::default()
    }

    /// Adapter that always fails with `error`.
    pub fn failing(error: RoutingError) -> Self {
        Self {
            failure: Some(error),
            calls: RefCell::default(),
        }
    }

    /// Waypoint sequences received so far.
    pub fn calls(&self) -> Vec<Vec<Coordinate>> {
        self.calls.borrow().clone()
    }
}

/// Build the route [`StubRoutingAdapter`] returns for `waypoints`.
///
/// # Errors
/// Returns [`RoutingError::TooFewWaypoints`] for fewer than two waypoints.
pub fn straight_line_route(waypoints: &[Coordinate]) -> Result<RouteResult, RoutingError> {
    if waypoints.len() < 2 {
        return Err(RoutingError::TooFewWaypoints {
            count: waypoints.len(),
        });
    }
    let steps: Vec<RouteStep> = waypoints
        .windows(2)
        .enumerate()
        .map(|(leg, pair)| RouteStep {
            instruction: format!("Head to waypoint {}", leg + 1),
            distance_m: 1_000.0,
            duration_s: 600.0,
            geometry: Some(pair.iter().copied().map(Coord::<f64>::from).collect()),
        })
        .collect();
    let legs: Vec<RouteLeg> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| RouteLeg {
            steps: index..index + 1,
            distance_m: step.distance_m,
            duration_s: step.duration_s,
        })
        .collect();
    Ok(RouteResult {
        geometry: waypoints
            .iter()
            .copied()
            .map(Coord::<f64>::from)
            .collect::<LineString<f64>>(),
        total_distance_m: legs.iter().map(|leg| leg.distance_m).sum(),
        total_duration_s: legs.iter().map(|leg| leg.duration_s).sum(),
        steps,
        legs,
    })
}

#[async_trait(?Send)]
impl RoutingAdapter for StubRoutingAdapter {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RoutingError> {
        self.calls.borrow_mut().push(waypoints.to_vec());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => straight_line_route(waypoints),
        }
    }
}

/// `RecommendationGateway` replaying scripted responses in order.
///
/// Once the script is exhausted every request yields an empty set.
#[derive(Debug, Default)]
pub struct StubRecommendationGateway {
    responses: RefCell<VecDeque<Result<RecommendationSet, GatewayError>>>,
    queries: RefCell<Vec<RecommendationQuery>>,
}

impl StubRecommendationGateway {
    /// Gateway answering with the given responses.
    pub fn with_responses<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<RecommendationSet, GatewayError>>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            queries: RefCell::default(),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<RecommendationQuery> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl RecommendationGateway for StubRecommendationGateway {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationSet, GatewayError> {
        self.queries.borrow_mut().push(query.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(RecommendationSet::default()))
    }
}

/// `ProfileSource` serving a fixed map of user profiles.
///
/// Unknown users are rejected.
#[derive(Debug, Default)]
pub struct StubProfileSource {
    profiles: HashMap<String, UserInterestProfile>,
}

impl StubProfileSource {
    /// Serve `profile` for `user_id`.
    #[must_use]
    pub fn with_profile(mut self, user_id: &str, profile: UserInterestProfile) -> Self {
        self.profiles.insert(user_id.to_owned(), profile);
        self
    }
}

#[async_trait(?Send)]
impl ProfileSource for StubProfileSource {
    async fn fetch_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<UserInterestProfile>, ProfileError> {
        self.profiles
            .get(user_id)
            .cloned()
            .map(Some)
            .ok_or_else(|| ProfileError::Rejected {
                message: format!("unknown user {user_id}"),
            })
    }
}
