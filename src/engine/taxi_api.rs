use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::TaxiAPI,
    entities::{Availability, Coordinate, TaxiSnapshot, Vehicle},
    error::Error,
    store::PositionUpdate,
};

#[async_trait]
impl TaxiAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_taxi(
        &self,
        driver_id: Uuid,
        driver_name: String,
        driver_phone: String,
        vehicle: Vehicle,
        location: Coordinate,
    ) -> Result<TaxiSnapshot, Error> {
        let taxi = TaxiSnapshot::new(driver_id, driver_name, driver_phone, vehicle, location);

        self.store.register_taxi(taxi.clone()).await?;

        Ok(taxi)
    }

    #[tracing::instrument(skip(self))]
    async fn find_taxi(&self, id: Uuid) -> Result<TaxiSnapshot, Error> {
        self.store.find_taxi(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn push_position(&self, entity_id: Uuid, coordinate: Coordinate) -> Result<(), Error> {
        self.store
            .put_position(PositionUpdate {
                entity_id,
                coordinate,
                recorded_at: Utc::now(),
            })
            .await
    }

    /// Single source of truth for a driver's availability; discovery and
    /// ride assignment both read what is persisted here.
    #[tracing::instrument(skip(self))]
    async fn set_availability(
        &self,
        taxi_id: Uuid,
        status: Availability,
    ) -> Result<TaxiSnapshot, Error> {
        self.store.set_status(taxi_id, status, Utc::now()).await?;

        self.store.find_taxi(taxi_id).await
    }
}
