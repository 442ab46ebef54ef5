use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Coordinate, RouteQuote};
use crate::error::Error;
use crate::external::geocoding::Place;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    origin: Coordinate,
    destination: Coordinate,
}

#[derive(Serialize, Deserialize)]
pub struct SearchParams {
    query: String,
    latitude: f64,
    longitude: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<RouteQuote>, Error> {
    let quote = api.quote_route(params.origin, params.destination).await?;

    Ok(quote.into())
}

pub async fn search_places(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Place>>, Error> {
    let near = Coordinate::new(params.latitude, params.longitude);
    let places = api.search_places(params.query, near).await?;

    Ok(places.into())
}
