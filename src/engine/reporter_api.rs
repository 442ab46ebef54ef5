use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use std::ops::ControlFlow;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::{PositionSource, ReporterAPI},
    error::Error,
    store::PositionUpdate,
    task::PeriodicTask,
};

#[async_trait]
impl ReporterAPI for Engine {
    #[tracing::instrument(skip(self, source))]
    async fn start_location_reporting(
        &self,
        entity_id: Uuid,
        source: Arc<dyn PositionSource>,
    ) -> Result<(), Error> {
        let mut reporters = self.reporters.lock().await;

        if reporters.contains_key(&entity_id) {
            tracing::debug!(%entity_id, "reporting loop already active, start is a no-op");
            return Ok(());
        }

        // probe the source before spawning anything: reporting from a denied
        // source would misrepresent availability to riders, so that failure
        // belongs to the caller
        if let Err(err) = source.current_position().await {
            if err.code == 104 {
                return Err(err);
            }

            tracing::warn!(code = err.code, %entity_id, "initial position read failed");
        }

        let store = self.store.clone();

        let task = PeriodicTask::spawn(self.config.report_interval, move |token| {
            let store = store.clone();
            let source = source.clone();

            async move {
                match source.current_position().await {
                    Ok(coordinate) => {
                        if token.is_cancelled() {
                            return ControlFlow::Break(());
                        }

                        let update = PositionUpdate {
                            entity_id,
                            coordinate,
                            recorded_at: Utc::now(),
                        };

                        // staleness self-heals on the next successful tick
                        if let Err(err) = store.put_position(update).await {
                            tracing::warn!(
                                code = err.code,
                                %entity_id,
                                "position push failed, retrying next tick"
                            );
                        }

                        ControlFlow::Continue(())
                    }
                    Err(err) if err.code == 104 => {
                        tracing::error!(%entity_id, "location permission denied, halting reporter");
                        ControlFlow::Break(())
                    }
                    Err(err) => {
                        tracing::warn!(
                            code = err.code,
                            %entity_id,
                            "position read failed, retrying next tick"
                        );
                        ControlFlow::Continue(())
                    }
                }
            }
        });

        reporters.insert(entity_id, task);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn stop_location_reporting(&self, entity_id: Uuid) {
        if let Some(task) = self.reporters.lock().await.remove(&entity_id) {
            task.cancel();
        }
    }
}
