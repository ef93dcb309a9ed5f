//! # Lock State Machine
//!
//! Drives a tenant's edit lock: `locked` → `unlock_requested` → `unlocked`
//! → `locked`. Tenant actions are written through the backends here; the
//! administrator's grant and force-lock are only ever observed, either by
//! the [`StatusPoller`] or by a refresh.
//!
//! The poller is level-triggered: after every operation
//! [`LockStateMachine::sync_poller`] runs it exactly while the store says
//! `unlock_requested`.

use std::sync::Arc;
use std::time::Duration;

use crate::client::api::BackendApi;
use crate::client::poller::StatusPoller;
use crate::client::store::CustomizationStore;
use crate::client::writer::{ReplicatedWriter, WriteOp, WriteOutcome};
use crate::shared::customization::{CompanyId, CustomizationRecord};
use crate::shared::error::BrandingError;
use crate::shared::lock::{LockStatus, LockTransition};

pub struct LockStateMachine {
    store: Arc<CustomizationStore>,
    writer: Arc<ReplicatedWriter>,
    poller: StatusPoller,
}

impl LockStateMachine {
    pub fn new(
        primary: Arc<dyn BackendApi>,
        store: Arc<CustomizationStore>,
        writer: Arc<ReplicatedWriter>,
        poll_interval: Duration,
    ) -> Self {
        let poller = StatusPoller::new(primary, Arc::clone(&store)).with_interval(poll_interval);
        Self {
            store,
            writer,
            poller,
        }
    }

    pub async fn status(&self) -> LockStatus {
        self.store.status().await
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Load a tenant and resume polling if an unlock request is pending
    pub async fn load(
        &mut self,
        company_id: Option<CompanyId>,
    ) -> Result<CustomizationRecord, BrandingError> {
        self.poller.stop();
        let record = self.store.fetch(company_id).await?;
        self.sync_poller().await;
        Ok(record)
    }

    /// Refetch the whole record, picking up any external status change
    pub async fn refresh(&mut self) -> Result<CustomizationRecord, BrandingError> {
        let before = self.store.status().await;
        let record = self.store.refresh().await?;
        if let Some(transition) = LockStatus::classify(before, record.status()) {
            tracing::info!(
                "Refresh observed {}: {} -> {}",
                transition,
                before,
                record.status()
            );
        }
        self.sync_poller().await;
        Ok(record)
    }

    /// Ask an administrator to unlock editing. Allowed only from `locked`.
    pub async fn request_unlock(&mut self) -> Result<WriteOutcome, BrandingError> {
        let status = self.store.status().await;
        status.transition(LockTransition::RequestUnlock)?;
        let company_id = self.company_id().await?;

        let outcome = self
            .writer
            .write(company_id, &WriteOp::RequestUnlock)
            .await
            .into_result()?;
        let next = self
            .store
            .commit_transition(LockTransition::RequestUnlock)
            .await?;
        tracing::info!("Company {} is now {}", company_id, next);

        self.sync_poller().await;
        Ok(outcome)
    }

    /// Persist pending edits, then lock. Allowed only from `unlocked`.
    ///
    /// Either step failing rolls the fields back to the backend's state and
    /// leaves the status unchanged; the lock is not retried.
    pub async fn save_and_lock(&mut self) -> Result<WriteOutcome, BrandingError> {
        let status = self.store.status().await;
        status.transition(LockTransition::SaveAndLock)?;
        let company_id = self.company_id().await?;

        let record = self.store.snapshot().await;
        let saved = self.writer.update(company_id, &record).await;
        if !saved.success {
            self.store.rollback().await;
            return saved.into_result();
        }
        self.store.mark_confirmed().await;

        let mut locked = self.writer.write(company_id, &WriteOp::Lock).await;
        if !locked.success {
            tracing::error!(
                "Saved fields for company {} but lock failed; not retrying",
                company_id
            );
            self.store.rollback().await;
            self.sync_poller().await;
            return locked.into_result();
        }
        self.store
            .commit_transition(LockTransition::SaveAndLock)
            .await?;
        tracing::info!("Company {} saved and locked", company_id);

        if saved.is_partial() && !locked.is_partial() {
            locked.message = saved.message;
            locked.mirror = saved.mirror;
        }
        self.sync_poller().await;
        Ok(locked)
    }

    /// Lock without saving. Idempotent: when already `locked` nothing is
    /// sent. From `unlock_requested` this cancels the request.
    pub async fn lock(&mut self) -> Result<WriteOutcome, BrandingError> {
        let status = self.store.status().await;
        if status == LockStatus::Locked {
            tracing::debug!("Lock requested while already locked");
            return Ok(WriteOutcome::unchanged("Customization already locked"));
        }
        let company_id = self.company_id().await?;

        let outcome = self
            .writer
            .write(company_id, &WriteOp::Lock)
            .await
            .into_result()?;
        self.store
            .commit_transition(LockTransition::ForceLock)
            .await?;
        tracing::info!("Company {} locked from {}", company_id, status);

        self.sync_poller().await;
        Ok(outcome)
    }

    /// Run the poller exactly while the store is `unlock_requested`
    pub async fn sync_poller(&mut self) {
        let status = self.store.status().await;
        match (status, self.store.company_id().await) {
            (LockStatus::UnlockRequested, Some(company_id)) => {
                if !self.poller.is_running() {
                    self.poller.start(company_id);
                }
            }
            _ => self.poller.stop(),
        }
    }

    /// Wait for the running poller to observe a decision
    pub async fn wait_for_decision(&mut self) -> Option<LockStatus> {
        let status = self.poller.wait().await;
        self.sync_poller().await;
        status
    }

    pub fn shutdown(&mut self) {
        self.poller.stop();
    }

    async fn company_id(&self) -> Result<CompanyId, BrandingError> {
        self.store
            .company_id()
            .await
            .ok_or(BrandingError::MissingCompany)
    }
}

impl std::fmt::Debug for LockStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockStateMachine")
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}
