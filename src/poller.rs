use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use kubevis_types::PollInterval;

use crate::InternalAction;

/// Periodic refresh timer for the dashboard.
///
/// Each tick asks the event loop for a refresh. Restarting or stopping only
/// affects future ticks; fetches already running finish normally.
#[derive(Default)]
pub struct Poller {
    cancel: Option<CancellationToken>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start ticking at `interval`. `Off` leaves the poller stopped.
    pub fn start(&mut self, interval: PollInterval, sender: UnboundedSender<InternalAction>) {
        self.stop();

        let Some(period) = interval.period() else {
            tracing::info!("auto refresh off");
            return;
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // The first fetch is issued by the caller, so skip the immediate tick
        let first = Instant::now() + period;

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(first, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        if sender.send(InternalAction::Refresh).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        tracing::info!(every = interval.label(), "auto refresh on");
        self.cancel = Some(cancel);
    }

    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
