use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::{Coordinate, Ride, RouteQuote};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    rider_id: Uuid,
    taxi_id: Uuid,
    quote: RouteQuote,
}

#[derive(Serialize, Deserialize)]
pub struct RespondParams {
    accept: bool,
}

#[derive(Serialize, Deserialize)]
pub struct EditRouteParams {
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api
        .request_ride(params.rider_id, params.taxi_id, params.quote)
        .await?;

    Ok(ride.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.find_ride(id).await?;

    Ok(ride.into())
}

pub async fn respond(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<RespondParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api.respond_to_ride(id, params.accept).await?;

    Ok(ride.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.complete_ride(id).await?;

    Ok(ride.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.cancel_ride(id).await?;

    Ok(ride.into())
}

pub async fn edit_route(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<EditRouteParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api
        .edit_route(id, params.origin, params.destination)
        .await?;

    Ok(ride.into())
}
