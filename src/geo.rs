use crate::entities::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres (Haversine).
///
/// Deterministic, full precision; use [`round_km`] at display boundaries.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to two decimal places for display consistency.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
