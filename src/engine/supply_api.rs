use super::Engine;

use async_trait::async_trait;
use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    api::SupplyAPI,
    entities::{Candidate, Coordinate},
    error::Error,
    geo,
    store::Store,
    task::PeriodicTask,
};

/// One discovery pass: available taxis within the radius, nearest first.
/// Unavailable or off-duty taxis are never offered, even if physically
/// nearest; ties are broken by taxi id for determinism.
async fn refresh(
    store: &dyn Store,
    center: Coordinate,
    radius_km: f64,
) -> Result<Vec<Candidate>, Error> {
    let taxis = store.taxis_within(center, radius_km).await?;

    let mut candidates: Vec<Candidate> = taxis
        .into_iter()
        .filter(|taxi| taxi.is_disponible())
        .map(|taxi| {
            let distance_km = geo::distance_km(center, taxi.location);
            Candidate { taxi, distance_km }
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.taxi.id.cmp(&b.taxi.id))
    });

    for candidate in candidates.iter_mut() {
        candidate.distance_km = geo::round_km(candidate.distance_km);
    }

    Ok(candidates)
}

#[async_trait]
impl SupplyAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn refresh_supply(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Candidate>, Error> {
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);

        refresh(self.store.as_ref(), center, radius_km).await
    }

    #[tracing::instrument(skip(self))]
    async fn start_supply_discovery(
        &self,
        session_id: Uuid,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<watch::Receiver<Vec<Candidate>>, Error> {
        let (tx, rx) = watch::channel(Vec::new());
        let tx = Arc::new(tx);
        let store = self.store.clone();

        let task = PeriodicTask::spawn(self.config.discovery_interval, move |token| {
            let store = store.clone();
            let tx = tx.clone();

            async move {
                match refresh(store.as_ref(), center, radius_km).await {
                    Ok(candidates) => {
                        // a result arriving after cancellation is discarded
                        if token.is_cancelled() {
                            return ControlFlow::Break(());
                        }

                        if tx.send(candidates).is_err() {
                            // nobody is listening any more
                            return ControlFlow::Break(());
                        }

                        ControlFlow::Continue(())
                    }
                    Err(err) => {
                        tracing::warn!(code = err.code, "supply refresh failed, skipping tick");
                        ControlFlow::Continue(())
                    }
                }
            }
        });

        let mut discoveries = self.discoveries.lock().await;

        if let Some(previous) = discoveries.insert(session_id, task) {
            tracing::debug!(%session_id, "replacing existing discovery loop");
            previous.cancel();
        }

        Ok(rx)
    }

    #[tracing::instrument(skip(self))]
    async fn stop_supply_discovery(&self, session_id: Uuid) {
        if let Some(task) = self.discoveries.lock().await.remove(&session_id) {
            task.cancel();
        }
    }
}
