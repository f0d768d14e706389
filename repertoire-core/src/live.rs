use std::{fmt::Display, future::Future, time::Duration};

use repertoire_state::Row;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::session::fingerprint;

/// Periodically refetches the rows and sends them on when they change.
///
/// At most one poller runs at a time; starting a running poller, or stopping
/// a stopped one, does nothing.
#[derive(Debug)]
pub struct LiveUpdates {
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}
impl Default for LiveUpdates {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
impl LiveUpdates {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    pub fn new(interval: Duration) -> Self {
        Self {
            handle: None,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start polling with `fetch`. The first fetch happens immediately.
    ///
    /// Rows are sent on `tx` whenever their fingerprint differs from the last
    /// one seen, starting from `last_fingerprint`. Failed fetches are logged
    /// and retried at the next tick. The poller ends by itself once `tx` is closed.
    ///
    /// Must be called from within a tokio runtime. Returns `false` if a poller
    /// was already running.
    pub fn start<F, Fut, E>(
        &mut self,
        fetch: F,
        last_fingerprint: Option<String>,
        tx: UnboundedSender<Vec<Row>>,
    ) -> bool
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Row>, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if self.is_running() {
            return false;
        }

        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let mut last_fingerprint = last_fingerprint;
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let rows = match fetch().await {
                    Ok(rows) => rows,
                    Err(e) => {
                        tracing::warn!("live update failed: {e}");
                        continue;
                    }
                };

                let current = fingerprint(&rows);
                if last_fingerprint.as_deref() == Some(current.as_str()) {
                    continue;
                }
                last_fingerprint = Some(current);
                tracing::debug!("live update: {} rows", rows.len());
                if tx.send(rows).is_err() {
                    break;
                }
            }
        }));
        true
    }

    /// Stop polling. Returns `false` if no poller was running.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }
}
impl Drop for LiveUpdates {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
