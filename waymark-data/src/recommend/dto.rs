//! Lenient decoding of recommendation service responses.
//!
//! The service has shipped more than one response shape. The list of
//! candidates is read from the first non-null of `recommended_pois` and
//! `recommendations`; anything else yields an empty set.

use serde_json::Value;
use waymark_core::{RecommendationProfile, RecommendationSet, RecommendedPoi};

const LIST_FIELDS: [&str; 2] = ["recommended_pois", "recommendations"];

/// Decode a response body into a [`RecommendationSet`].
///
/// Individual entries that fail to decode or carry an invalid position are
/// dropped. A `profile` object is kept when a candidate list was found.
pub(crate) fn decode_recommendations(body: &Value) -> RecommendationSet {
    let Some(object) = body.as_object() else {
        log::debug!("recommendation response is not an object; using an empty set");
        return RecommendationSet::default();
    };
    let list = LIST_FIELDS
        .iter()
        .find_map(|field| object.get(*field).filter(|value| !value.is_null()));
    let Some(Value::Array(entries)) = list else {
        log::debug!("recommendation response carries no candidate list");
        return RecommendationSet::default();
    };

    let pois = entries.iter().filter_map(decode_poi).collect();
    let profile = match object.get("profile") {
        Some(Value::Object(map)) => Some(RecommendationProfile(map.clone())),
        _ => None,
    };
    RecommendationSet { pois, profile }
}

fn decode_poi(entry: &Value) -> Option<RecommendedPoi> {
    let poi: RecommendedPoi = match serde_json::from_value(entry.clone()) {
        Ok(poi) => poi,
        Err(err) => {
            log::debug!("dropping malformed recommendation entry: {err}");
            return None;
        }
    };
    if let Err(err) = poi.coordinate() {
        log::debug!("dropping recommendation {:?}: {err}", poi.id);
        return None;
    }
    Some(poi)
}
