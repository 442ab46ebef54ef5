use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::{Availability, Candidate, Coordinate, TaxiSnapshot, Vehicle};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    driver_id: Uuid,
    driver_name: String,
    driver_phone: String,
    vehicle: Vehicle,
    location: Coordinate,
}

#[derive(Serialize, Deserialize)]
pub struct NearbyParams {
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateLocationParams {
    location: Coordinate,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateAvailabilityParams {
    status: Availability,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<TaxiSnapshot>, Error> {
    let taxi = api
        .register_taxi(
            params.driver_id,
            params.driver_name,
            params.driver_phone,
            params.vehicle,
            params.location,
        )
        .await?;

    Ok(taxi.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaxiSnapshot>, Error> {
    let taxi = api.find_taxi(id).await?;

    Ok(taxi.into())
}

pub async fn nearby(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<Candidate>>, Error> {
    let center = Coordinate::new(params.latitude, params.longitude);
    let candidates = api.refresh_supply(center, params.radius_km).await?;

    Ok(candidates.into())
}

pub async fn update_location(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateLocationParams>,
) -> Result<Json<TaxiSnapshot>, Error> {
    api.push_position(id, params.location).await?;
    let taxi = api.find_taxi(id).await?;

    Ok(taxi.into())
}

pub async fn update_availability(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateAvailabilityParams>,
) -> Result<Json<TaxiSnapshot>, Error> {
    let taxi = api.set_availability(id, params.status).await?;

    Ok(taxi.into())
}
