use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

use crate::entities::Coordinate;
use crate::error::{invalid_input_error, upstream_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub location: Coordinate,
}

/// Display-label provider. Used only to name points for the rider and
/// driver; failures degrade to raw coordinates and never block reservation
/// logic.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String, Error>;

    async fn search(&self, query: String, near: Coordinate) -> Result<Vec<Place>, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ReverseResponse {
    display_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    display_name: String,
    lat: String,
    lon: String,
}

fn place_from_result(result: &SearchResult) -> Result<Place, Error> {
    let latitude: f64 = result.lat.parse().map_err(|_| upstream_error())?;
    let longitude: f64 = result.lon.parse().map_err(|_| upstream_error())?;

    Ok(Place {
        display_name: result.display_name.clone(),
        location: Coordinate::new(latitude, longitude),
    })
}

/// Nominatim-compatible HTTP geocoding service.
#[derive(Debug, Default)]
pub struct NominatimGeocoder;

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self))]
    async fn reverse(&self, coordinate: Coordinate) -> Result<String, Error> {
        let api_base = env::var("GEOCODING_API_BASE")?;
        let url = format!("https://{}/reverse", api_base);

        let res = reqwest::Client::new()
            .get(url)
            .query(&[("format", "jsonv2")])
            .query(&[("lat", coordinate.latitude)])
            .query(&[("lon", coordinate.longitude)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: ReverseResponse = res.json().await?;

        Ok(data.display_name)
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: String, near: Coordinate) -> Result<Vec<Place>, Error> {
        let api_base = env::var("GEOCODING_API_BASE")?;
        let url = format!("https://{}/search", api_base);

        let viewbox = format!(
            "{},{},{},{}",
            near.longitude - 0.25,
            near.latitude - 0.25,
            near.longitude + 0.25,
            near.latitude + 0.25
        );

        let res = reqwest::Client::new()
            .get(url)
            .query(&[("format", "jsonv2")])
            .query(&[("q", query)])
            .query(&[("viewbox", viewbox)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Vec<SearchResult> = res.json().await?;

        data.iter().map(place_from_result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_results() {
        let raw = r#"[
            {"display_name": "Analakely, Antananarivo", "lat": "-18.9100", "lon": "47.5255"}
        ]"#;

        let results: Vec<SearchResult> = serde_json::from_str(raw).unwrap();
        let place = place_from_result(&results[0]).unwrap();

        assert_eq!(place.display_name, "Analakely, Antananarivo");
        assert_eq!(place.location, Coordinate::new(-18.91, 47.5255));
    }

    #[test]
    fn unparsable_coordinates_are_an_upstream_error() {
        let result = SearchResult {
            display_name: "nowhere".into(),
            lat: "not-a-number".into(),
            lon: "47.5".into(),
        };

        assert_eq!(place_from_result(&result).unwrap_err().code, 4);
    }
}
