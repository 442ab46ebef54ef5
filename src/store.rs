use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{Availability, Coordinate, Ride, TaxiSnapshot};
use crate::error::{not_found_error, Error};
use crate::geo;

/// One location report from a taxi or rider session.
#[derive(Clone, Debug)]
pub struct PositionUpdate {
    pub entity_id: Uuid,
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

/// Shared taxi snapshot storage. Writes are last-writer-wins per entity id,
/// gated on `updated_at` monotonicity: a write carrying an older timestamp
/// than the stored value is discarded so out-of-order network deliveries
/// cannot corrupt the latest-known state.
#[async_trait]
pub trait TaxiStore {
    async fn register_taxi(&self, taxi: TaxiSnapshot) -> Result<(), Error>;

    async fn find_taxi(&self, id: Uuid) -> Result<TaxiSnapshot, Error>;

    async fn put_position(&self, update: PositionUpdate) -> Result<(), Error>;

    async fn set_status(
        &self,
        id: Uuid,
        status: Availability,
        at: DateTime<Utc>,
    ) -> Result<(), Error>;

    /// Taxis whose last-known location lies within `radius_km` of `center`,
    /// any status. Availability filtering is the caller's concern.
    async fn taxis_within(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<TaxiSnapshot>, Error>;
}

#[async_trait]
pub trait RideStore {
    async fn insert_ride(&self, ride: &Ride) -> Result<(), Error>;

    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error>;

    async fn update_ride(&self, ride: &Ride) -> Result<(), Error>;
}

pub trait Store: TaxiStore + RideStore + Send + Sync {}

/// In-process implementation of the persistence service, also the backing
/// for tests. A deployment talking to a remote store plugs in its own
/// [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    taxis: RwLock<HashMap<Uuid, TaxiSnapshot>>,
    positions: RwLock<HashMap<Uuid, PositionUpdate>>,
    rides: RwLock<HashMap<Uuid, Ride>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaxiStore for MemoryStore {
    async fn register_taxi(&self, taxi: TaxiSnapshot) -> Result<(), Error> {
        self.taxis.write().await.insert(taxi.id, taxi);

        Ok(())
    }

    async fn find_taxi(&self, id: Uuid) -> Result<TaxiSnapshot, Error> {
        self.taxis
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error())
    }

    async fn put_position(&self, update: PositionUpdate) -> Result<(), Error> {
        {
            let mut positions = self.positions.write().await;

            if let Some(stored) = positions.get(&update.entity_id) {
                if update.recorded_at < stored.recorded_at {
                    tracing::debug!(entity_id = %update.entity_id, "discarding stale position");
                    return Ok(());
                }
            }

            positions.insert(update.entity_id, update.clone());
        }

        // a taxi's snapshot tracks its latest reported position
        let mut taxis = self.taxis.write().await;
        if let Some(taxi) = taxis.get_mut(&update.entity_id) {
            if update.recorded_at >= taxi.updated_at {
                taxi.location = update.coordinate;
                taxi.updated_at = update.recorded_at;
            }
        }

        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: Availability,
        at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let mut taxis = self.taxis.write().await;
        let taxi = taxis.get_mut(&id).ok_or_else(|| not_found_error())?;

        if at < taxi.updated_at {
            tracing::debug!(taxi_id = %id, "discarding stale status toggle");
            return Ok(());
        }

        taxi.status = status;
        taxi.updated_at = at;

        Ok(())
    }

    async fn taxis_within(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<TaxiSnapshot>, Error> {
        let taxis = self.taxis.read().await;

        Ok(taxis
            .values()
            .filter(|taxi| geo::distance_km(center, taxi.location) <= radius_km)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RideStore for MemoryStore {
    async fn insert_ride(&self, ride: &Ride) -> Result<(), Error> {
        self.rides.write().await.insert(ride.id, ride.clone());

        Ok(())
    }

    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error> {
        self.rides
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error())
    }

    async fn update_ride(&self, ride: &Ride) -> Result<(), Error> {
        let mut rides = self.rides.write().await;

        if !rides.contains_key(&ride.id) {
            return Err(not_found_error());
        }

        rides.insert(ride.id, ride.clone());

        Ok(())
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Vehicle;
    use chrono::Duration;
    use tokio_test::block_on;

    fn sample_taxi(location: Coordinate) -> TaxiSnapshot {
        TaxiSnapshot::new(
            Uuid::new_v4(),
            "Hery".into(),
            "+261 34 00 000 00".into(),
            Vehicle {
                plate: "1234 TAA".into(),
                model: "Peugeot 404".into(),
                color: "beige".into(),
            },
            location,
        )
    }

    #[test]
    fn stale_position_is_discarded() {
        block_on(async {
            let store = MemoryStore::new();
            let taxi = sample_taxi(Coordinate::new(-18.8792, 47.5079));
            let id = taxi.id;
            store.register_taxi(taxi).await.unwrap();

            let t1 = Utc::now();
            let t2 = t1 + Duration::seconds(5);
            let newer = Coordinate::new(-18.9000, 47.5200);
            let older = Coordinate::new(-18.8000, 47.4000);

            store
                .put_position(PositionUpdate {
                    entity_id: id,
                    coordinate: newer,
                    recorded_at: t2,
                })
                .await
                .unwrap();

            store
                .put_position(PositionUpdate {
                    entity_id: id,
                    coordinate: older,
                    recorded_at: t1,
                })
                .await
                .unwrap();

            let stored = store.find_taxi(id).await.unwrap();
            assert_eq!(stored.location, newer);
            assert_eq!(stored.updated_at, t2);
        });
    }

    #[test]
    fn stale_status_toggle_is_discarded() {
        block_on(async {
            let store = MemoryStore::new();
            let taxi = sample_taxi(Coordinate::new(-18.8792, 47.5079));
            let id = taxi.id;
            store.register_taxi(taxi).await.unwrap();

            let now = Utc::now();
            store
                .set_status(id, Availability::Disponible, now + Duration::seconds(5))
                .await
                .unwrap();
            store
                .set_status(id, Availability::HorsService, now - Duration::seconds(5))
                .await
                .unwrap();

            let stored = store.find_taxi(id).await.unwrap();
            assert_eq!(stored.status, Availability::Disponible);
        });
    }

    #[test]
    fn radius_query_excludes_distant_taxis() {
        block_on(async {
            let store = MemoryStore::new();
            let center = Coordinate::new(-18.8792, 47.5079);

            let near = sample_taxi(Coordinate::new(-18.8800, 47.5085));
            let far = sample_taxi(Coordinate::new(-19.8625, 47.0302));
            let near_id = near.id;

            store.register_taxi(near).await.unwrap();
            store.register_taxi(far).await.unwrap();

            let found = store.taxis_within(center, 2.0).await.unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id, near_id);
        });
    }

    #[test]
    fn position_push_for_unknown_entity_is_kept() {
        block_on(async {
            // riders report positions too; nothing to reconcile with a taxi
            let store = MemoryStore::new();
            let rider_id = Uuid::new_v4();

            store
                .put_position(PositionUpdate {
                    entity_id: rider_id,
                    coordinate: Coordinate::new(-18.88, 47.51),
                    recorded_at: Utc::now(),
                })
                .await
                .unwrap();
        });
    }
}
