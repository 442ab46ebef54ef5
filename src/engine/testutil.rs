use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::Engine;
use crate::api::TaxiAPI;
use crate::config::Config;
use crate::entities::{Availability, Coordinate, TaxiSnapshot, Vehicle};
use crate::error::{upstream_error, Error};
use crate::external::geocoding::{Geocoder, Place};
use crate::external::routing::{RouteLeg, RoutingProvider};
use crate::notify::testing::RecordingNotifier;
use crate::store::MemoryStore;
use uuid::Uuid;

/// Routing provider that is always down; quotes degrade to the
/// straight-line estimate.
pub(crate) struct FailingRouting;

#[async_trait]
impl RoutingProvider for FailingRouting {
    async fn route(&self, _: Coordinate, _: Coordinate) -> Result<RouteLeg, Error> {
        Err(upstream_error())
    }
}

/// Routing provider that returns the same leg for every request.
pub(crate) struct StaticRouting {
    pub waypoints: Vec<Coordinate>,
    pub distance_km: f64,
}

#[async_trait]
impl RoutingProvider for StaticRouting {
    async fn route(&self, _: Coordinate, _: Coordinate) -> Result<RouteLeg, Error> {
        Ok(RouteLeg {
            waypoints: self.waypoints.clone(),
            distance_km: self.distance_km,
        })
    }
}

/// Geocoder that never resolves; labels degrade to raw coordinates.
pub(crate) struct NoGeocoder;

#[async_trait]
impl Geocoder for NoGeocoder {
    async fn reverse(&self, _: Coordinate) -> Result<String, Error> {
        Err(upstream_error())
    }

    async fn search(&self, _: String, _: Coordinate) -> Result<Vec<Place>, Error> {
        Err(upstream_error())
    }
}

pub(crate) fn test_engine(
    store: Arc<MemoryStore>,
    routing: Arc<dyn RoutingProvider>,
    notifier: Arc<RecordingNotifier>,
) -> Engine {
    let config = Config {
        unit_rate: 5000.0,
        minimum_fare: 1000.0,
        report_interval: Duration::from_millis(20),
        discovery_interval: Duration::from_millis(20),
        default_radius_km: 2.0,
    };

    Engine::new(store, routing, Arc::new(NoGeocoder), notifier, config)
}

pub(crate) fn sample_vehicle() -> Vehicle {
    Vehicle {
        plate: "1234 TAA".into(),
        model: "Renault 4L".into(),
        color: "beige".into(),
    }
}

/// Registers a taxi at `location` and marks it disponible.
pub(crate) async fn disponible_taxi(engine: &Engine, location: Coordinate) -> TaxiSnapshot {
    let taxi = engine
        .register_taxi(
            Uuid::new_v4(),
            "Rakoto".into(),
            "+261 34 12 345 67".into(),
            sample_vehicle(),
            location,
        )
        .await
        .unwrap();

    engine
        .set_availability(taxi.id, Availability::Disponible)
        .await
        .unwrap()
}
