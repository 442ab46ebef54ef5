use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::entities::{Availability, Candidate, Coordinate, Ride, RouteQuote, TaxiSnapshot, Vehicle};
use crate::error::Error;
use crate::external::geocoding::Place;

/// Current device position for one session, provided by the UI/session
/// layer that owns the device. Denied location permission is a terminal
/// failure for the reporting loop that reads from it.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    /// Never fails on provider trouble; degrades to a straight-line quote.
    async fn quote_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteQuote, Error>;

    async fn search_places(&self, query: String, near: Coordinate) -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait TaxiAPI {
    async fn register_taxi(
        &self,
        driver_id: Uuid,
        driver_name: String,
        driver_phone: String,
        vehicle: Vehicle,
        location: Coordinate,
    ) -> Result<TaxiSnapshot, Error>;

    async fn find_taxi(&self, id: Uuid) -> Result<TaxiSnapshot, Error>;

    async fn push_position(&self, entity_id: Uuid, coordinate: Coordinate) -> Result<(), Error>;

    async fn set_availability(
        &self,
        taxi_id: Uuid,
        status: Availability,
    ) -> Result<TaxiSnapshot, Error>;
}

#[async_trait]
pub trait SupplyAPI {
    /// One-shot discovery: available taxis around `center`, nearest first.
    /// An empty list is a legitimate outcome, not an error.
    async fn refresh_supply(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Candidate>, Error>;

    /// Periodic discovery scoped to `session_id`; each tick fully replaces
    /// the published candidate list. Restarting a session replaces its loop.
    async fn start_supply_discovery(
        &self,
        session_id: Uuid,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<watch::Receiver<Vec<Candidate>>, Error>;

    async fn stop_supply_discovery(&self, session_id: Uuid);
}

#[async_trait]
pub trait ReporterAPI {
    /// Idempotent per entity id: starting a second loop over an existing
    /// one is a no-op.
    async fn start_location_reporting(
        &self,
        entity_id: Uuid,
        source: Arc<dyn PositionSource>,
    ) -> Result<(), Error>;

    async fn stop_location_reporting(&self, entity_id: Uuid);
}

#[async_trait]
pub trait RideAPI {
    async fn request_ride(
        &self,
        rider_id: Uuid,
        taxi_id: Uuid,
        quote: RouteQuote,
    ) -> Result<Ride, Error>;

    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error>;

    async fn respond_to_ride(&self, id: Uuid, accept: bool) -> Result<Ride, Error>;

    async fn complete_ride(&self, id: Uuid) -> Result<Ride, Error>;

    async fn cancel_ride(&self, id: Uuid) -> Result<Ride, Error>;

    async fn edit_route(
        &self,
        id: Uuid,
        new_origin: Option<Coordinate>,
        new_destination: Option<Coordinate>,
    ) -> Result<Ride, Error>;
}

pub trait API: QuoteAPI + TaxiAPI + SupplyAPI + ReporterAPI + RideAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
