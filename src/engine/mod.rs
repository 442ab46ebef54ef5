mod quote_api;
mod reporter_api;
mod ride_api;
mod supply_api;
mod taxi_api;

#[cfg(test)]
pub(crate) mod testutil;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::API;
use crate::config::Config;
use crate::entities::Coordinate;
use crate::external::geocoding::Geocoder;
use crate::external::routing::RoutingProvider;
use crate::notify::{Notification, Notifier};
use crate::store::Store;
use crate::task::PeriodicTask;

pub struct Engine {
    store: Arc<dyn Store>,
    routing: Arc<dyn RoutingProvider>,
    geocoder: Arc<dyn Geocoder>,
    notifier: Arc<dyn Notifier>,
    config: Config,
    reporters: Mutex<HashMap<Uuid, PeriodicTask>>,
    discoveries: Mutex<HashMap<Uuid, PeriodicTask>>,
    // transition calls on one ride must be serialized; entries are tiny and
    // kept for the process lifetime
    ride_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(
        store: Arc<dyn Store>,
        routing: Arc<dyn RoutingProvider>,
        geocoder: Arc<dyn Geocoder>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            store,
            routing,
            geocoder,
            notifier,
            config,
            reporters: Mutex::new(HashMap::new()),
            discoveries: Mutex::new(HashMap::new()),
            ride_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Display label for a point; a geocoding failure degrades to the raw
    /// coordinate instead of blocking.
    pub(crate) async fn label_for(&self, coordinate: Coordinate) -> String {
        match self.geocoder.reverse(coordinate).await {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!(code = err.code, "reverse geocode failed, using raw coordinate");
                coordinate.to_string()
            }
        }
    }

    pub(crate) fn price_for(&self, distance_km: f64) -> f64 {
        (distance_km * self.config.unit_rate).max(self.config.minimum_fare)
    }

    pub(crate) async fn ride_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.ride_locks
            .lock()
            .await
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Post-commit notification dispatch: delivery failure is logged, never
    /// retried, and never rolls back the transition it follows.
    pub(crate) async fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification).await {
            tracing::warn!(code = err.code, "notification delivery failed");
        }
    }
}

impl API for Engine {}
