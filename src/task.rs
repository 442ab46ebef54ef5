use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Observed by a tick body before it emits anything. Flips synchronously
/// when the owning [`PeriodicTask`] is cancelled, so an in-flight tick can
/// discard its result instead of publishing after cancellation.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// A timer-driven polling loop scoped to the session that owns it.
///
/// The first tick fires immediately, then once per `period`. Ticks run one
/// at a time; missed ticks are skipped, never queued, so a slow tick is not
/// followed by a burst. A tick returns `ControlFlow::Break` to halt the
/// loop from inside (terminal conditions such as permission denial).
pub struct PeriodicTask {
    stop: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut(CancelToken) -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let (stop, rx) = watch::channel(false);
        let mut stop_rx = rx.clone();

        let join = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        let token = CancelToken { rx: rx.clone() };

                        if let ControlFlow::Break(()) = tick(token).await {
                            break;
                        }

                        if *rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { stop, join }
    }

    /// Signal the loop to stop. Returns without waiting for the task; the
    /// token is already flipped when this returns, so no further emissions
    /// can be observed.
    pub fn cancel(&self) {
        let _ = self.stop.send(true);
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
        self.join.abort();
    }
}
