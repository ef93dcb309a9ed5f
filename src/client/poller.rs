//! # Status Poller
//!
//! While a tenant waits for an administrator to grant an unlock, nothing
//! pushes the decision to the client. The poller re-reads the primary at a
//! fixed interval and hands the first record whose status has moved off
//! `unlock_requested` to the store.
//!
//! ## Lifecycle
//!
//! - [`StatusPoller::start`] spawns the background task, replacing any
//!   task already running
//! - the task ends on its own once it observes a terminal status
//! - [`StatusPoller::stop`] (or dropping the poller) aborts it
//!
//! Ticks are serialized: the next sleep starts only after the previous
//! fetch has finished, so fetches never overlap. Fetch failures are logged
//! and the next tick retries.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::client::api::BackendApi;
use crate::client::store::CustomizationStore;
use crate::shared::config::DEFAULT_POLL_INTERVAL;
use crate::shared::customization::{CompanyId, CustomizationRecord};
use crate::shared::error::BrandingError;
use crate::shared::lock::LockStatus;

/// Background watcher for a pending unlock request
pub struct StatusPoller {
    primary: Arc<dyn BackendApi>,
    store: Arc<CustomizationStore>,
    interval: Duration,
    task: Option<JoinHandle<LockStatus>>,
}

impl StatusPoller {
    pub fn new(primary: Arc<dyn BackendApi>, store: Arc<CustomizationStore>) -> Self {
        Self {
            primary,
            store,
            interval: DEFAULT_POLL_INTERVAL,
            task: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True while a task exists and has not finished
    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Start polling for `company_id`. A task that is already running is
    /// aborted first, so at most one poller exists per session.
    pub fn start(&mut self, company_id: CompanyId) {
        self.stop();

        let primary = Arc::clone(&self.primary);
        let store = Arc::clone(&self.store);
        let interval = self.interval;

        tracing::info!(
            "Polling unlock status for company {} every {:?}",
            company_id,
            interval
        );
        self.task = Some(tokio::spawn(async move {
            poll_loop(primary, store, company_id, interval).await
        }));
    }

    /// Abort the background task, if any
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::debug!("Stopping unlock status poller");
            }
            task.abort();
        }
    }

    /// Wait for the running task to finish on its own and return the status
    /// it observed. `None` when nothing was running or the task was aborted.
    pub async fn wait(&mut self) -> Option<LockStatus> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

async fn poll_loop(
    primary: Arc<dyn BackendApi>,
    store: Arc<CustomizationStore>,
    company_id: CompanyId,
    interval: Duration,
) -> LockStatus {
    loop {
        tokio::time::sleep(interval).await;

        let data = match primary.get_customization(company_id).await {
            Ok(data) => data,
            Err(e) => {
                let error = BrandingError::poll_fetch(e.to_string());
                tracing::warn!("Status poll for company {} failed: {}", company_id, error);
                continue;
            }
        };

        let record = CustomizationRecord::from_wire(company_id, data);
        let observed = record.status();
        if observed == LockStatus::UnlockRequested {
            tracing::trace!("Company {} still waiting for unlock", company_id);
            continue;
        }

        if store.company_id().await != Some(company_id) {
            tracing::debug!(
                "Store moved off company {}, dropping polled record",
                company_id
            );
            return observed;
        }

        match LockStatus::classify(LockStatus::UnlockRequested, observed) {
            Some(transition) => tracing::info!(
                "Company {} unlock request resolved: {} -> {} ({})",
                company_id,
                LockStatus::UnlockRequested,
                observed,
                transition
            ),
            None => tracing::info!("Company {} status is now {}", company_id, observed),
        }
        store.replace_confirmed(record).await;
        return observed;
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
