use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinate;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Disponible,
    Indisponible,
    HorsService,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: String,
    pub model: String,
    pub color: String,
}

/// Last-known state of one taxi, overwritten by each location push.
///
/// `updated_at` must increase monotonically per taxi id; the store discards
/// writes carrying an older timestamp than the stored value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaxiSnapshot {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub driver_phone: String,
    pub vehicle: Vehicle,
    pub status: Availability,
    pub location: Coordinate,
    pub updated_at: DateTime<Utc>,
}

impl TaxiSnapshot {
    pub fn new(
        driver_id: Uuid,
        driver_name: String,
        driver_phone: String,
        vehicle: Vehicle,
        location: Coordinate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver_id,
            driver_name,
            driver_phone,
            vehicle,
            status: Availability::HorsService,
            location,
            updated_at: Utc::now(),
        }
    }

    pub fn is_disponible(&self) -> bool {
        match self.status {
            Availability::Disponible => true,
            _ => false,
        }
    }
}

/// A taxi offered to the rider by supply discovery, ranked by distance
/// from the pickup point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub taxi: TaxiSnapshot,
    pub distance_km: f64,
}
