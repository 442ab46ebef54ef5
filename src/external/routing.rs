use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

use crate::entities::Coordinate;
use crate::error::{invalid_input_error, upstream_error, Error};

/// A drivable path as reported by the routing provider.
#[derive(Clone, Debug)]
pub struct RouteLeg {
    pub waypoints: Vec<Coordinate>,
    pub distance_km: f64,
}

/// External routing dependency. Any failure here is a degraded result for
/// the caller, never a blocking error; the quote path falls back to a
/// straight-line estimate.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: Coordinate)
        -> Result<RouteLeg, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    code: String,
    routes: Option<Vec<ProviderRoute>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ProviderRoute {
    /// Metres.
    distance: f64,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    /// GeoJSON order: longitude first.
    coordinates: Vec<[f64; 2]>,
}

fn leg_from_route(route: &ProviderRoute) -> Result<RouteLeg, Error> {
    if route.geometry.coordinates.is_empty() {
        return Err(upstream_error());
    }

    let waypoints = route
        .geometry
        .coordinates
        .iter()
        .map(|pair| Coordinate::new(pair[1], pair[0]))
        .collect();

    Ok(RouteLeg {
        waypoints,
        distance_km: route.distance / 1000.0,
    })
}

/// OSRM-compatible HTTP routing service.
#[derive(Debug, Default)]
pub struct OsrmRouting;

#[async_trait]
impl RoutingProvider for OsrmRouting {
    #[tracing::instrument(skip(self))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteLeg, Error> {
        let api_base = env::var("ROUTING_API_BASE")?;
        let url = format!(
            "https://{}/route/v1/driving/{},{};{},{}",
            api_base,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        );

        let res = reqwest::Client::new()
            .get(url)
            .query(&[("overview", "full")])
            .query(&[("geometries", "geojson")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        if data.code != "Ok" {
            return Err(upstream_error());
        }

        let routes = data.routes.ok_or_else(|| upstream_error())?;
        let route = routes.first().ok_or_else(|| upstream_error())?;

        leg_from_route(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_response() {
        let raw = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 4321.0,
                "geometry": {
                    "coordinates": [[47.5079, -18.8792], [47.5200, -18.9000]]
                }
            }]
        }"#;

        let data: Response = serde_json::from_str(raw).unwrap();
        assert_eq!(data.code, "Ok");

        let routes = data.routes.unwrap();
        let leg = leg_from_route(&routes[0]).unwrap();

        assert_eq!(leg.distance_km, 4.321);
        assert_eq!(leg.waypoints.len(), 2);
        // GeoJSON pairs are longitude-first
        assert_eq!(leg.waypoints[0], Coordinate::new(-18.8792, 47.5079));
    }

    #[test]
    fn empty_geometry_is_an_upstream_error() {
        let route = ProviderRoute {
            distance: 0.0,
            geometry: Geometry {
                coordinates: vec![],
            },
        };

        assert_eq!(leg_from_route(&route).unwrap_err().code, 4);
    }
}
