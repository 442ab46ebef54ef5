mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::server::handlers::{quotes, rides, taxis};

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/quotes", post(quotes::create))
        .route("/places/search", get(quotes::search_places))
        .route("/taxis", post(taxis::create))
        .route("/taxis/nearby", get(taxis::nearby))
        .route("/taxis/:id", get(taxis::find))
        .route("/taxis/:id/location", patch(taxis::update_location))
        .route("/taxis/:id/availability", patch(taxis::update_availability))
        .route("/rides", post(rides::create))
        .route("/rides/:id", get(rides::find))
        .route("/rides/:id/respond", patch(rides::respond))
        .route("/rides/:id/complete", patch(rides::complete))
        .route("/rides/:id/cancel", patch(rides::cancel))
        .route("/rides/:id/route", patch(rides::edit_route))
        .layer(Extension(api));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
