use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;
use crate::geo;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Routed,
    Fallback,
}

/// A computed route between two coordinates. Immutable once produced;
/// recomputed, never mutated, whenever origin or destination changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteQuote {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub waypoints: Vec<Coordinate>,
    pub distance_km: f64,
    pub source: QuoteSource,
}

impl RouteQuote {
    pub fn routed(
        origin: Coordinate,
        destination: Coordinate,
        waypoints: Vec<Coordinate>,
        distance_km: f64,
    ) -> Self {
        Self {
            origin,
            destination,
            waypoints,
            distance_km: geo::round_km(distance_km),
            source: QuoteSource::Routed,
        }
    }

    /// Straight-line estimate used when the routing provider is unusable.
    pub fn fallback(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            waypoints: vec![origin, destination],
            distance_km: geo::round_km(geo::distance_km(origin, destination)),
            source: QuoteSource::Fallback,
        }
    }
}
