use super::Engine;

use async_trait::async_trait;

use crate::{
    api::QuoteAPI,
    entities::{Coordinate, RouteQuote},
    error::Error,
    external::geocoding::Place,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn quote_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteQuote, Error> {
        match self.routing.route(origin, destination).await {
            Ok(leg) => Ok(RouteQuote::routed(
                origin,
                destination,
                leg.waypoints,
                leg.distance_km,
            )),
            Err(err) => {
                // trip feasibility must not block on a third-party outage
                tracing::warn!(
                    code = err.code,
                    "routing provider failed, falling back to straight-line estimate"
                );

                Ok(RouteQuote::fallback(origin, destination))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn search_places(&self, query: String, near: Coordinate) -> Result<Vec<Place>, Error> {
        self.geocoder.search(query, near).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{test_engine, FailingRouting, StaticRouting};
    use crate::api::QuoteAPI;
    use crate::entities::{Coordinate, QuoteSource};
    use crate::geo;
    use crate::notify::testing::RecordingNotifier;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn unreachable_provider_degrades_to_fallback() {
        let engine = test_engine(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingRouting),
            Arc::new(RecordingNotifier::default()),
        );

        let origin = Coordinate::new(-18.8792, 47.5079);
        let destination = Coordinate::new(-18.9100, 47.5255);

        let quote = engine.quote_route(origin, destination).await.unwrap();

        assert_eq!(quote.source, QuoteSource::Fallback);
        assert_eq!(quote.waypoints, vec![origin, destination]);
        assert!((quote.distance_km - geo::distance_km(origin, destination)).abs() <= 0.01);
    }

    #[tokio::test]
    async fn provider_route_is_passed_through() {
        let origin = Coordinate::new(-18.8792, 47.5079);
        let destination = Coordinate::new(-18.9100, 47.5255);
        let via = Coordinate::new(-18.8950, 47.5160);

        let engine = test_engine(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticRouting {
                waypoints: vec![origin, via, destination],
                distance_km: 4.321,
            }),
            Arc::new(RecordingNotifier::default()),
        );

        let quote = engine.quote_route(origin, destination).await.unwrap();

        assert_eq!(quote.source, QuoteSource::Routed);
        assert_eq!(quote.waypoints.len(), 3);
        assert_eq!(quote.distance_km, 4.32);
    }
}
