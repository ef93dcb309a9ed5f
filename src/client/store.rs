//! # Customization Store
//!
//! Holds one tenant's customization record in memory and is the only place
//! the client mutates it.
//!
//! ## State
//!
//! - **current**: what the UI renders, including optimistic edits
//! - **confirmed**: the last record a backend confirmed (fetched or written)
//!
//! ## Mutation API
//!
//! - [`CustomizationStore::fetch`] loads a tenant from the primary backend
//! - [`CustomizationStore::apply_optimistic`] replaces the branding before
//!   any network confirmation, only while editing is allowed
//! - [`CustomizationStore::rollback`] discards optimistic edits and refetches
//!
//! The lock is never held across a network call.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::api::BackendApi;
use crate::shared::customization::{Branding, CompanyId, CustomizationRecord};
use crate::shared::error::BrandingError;
use crate::shared::lock::{LockStatus, LockTransition};

/// In-memory customization state for one tenant
pub struct CustomizationStore {
    primary: Arc<dyn BackendApi>,
    state: RwLock<StoreState>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    company_id: Option<CompanyId>,
    current: CustomizationRecord,
    confirmed: CustomizationRecord,
}

impl CustomizationStore {
    /// Create a store holding the default record
    pub fn new(primary: Arc<dyn BackendApi>) -> Self {
        Self {
            primary,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub async fn company_id(&self) -> Option<CompanyId> {
        self.state.read().await.company_id
    }

    /// The record the UI renders
    pub async fn snapshot(&self) -> CustomizationRecord {
        self.state.read().await.current.clone()
    }

    /// The last backend-confirmed record
    pub async fn confirmed(&self) -> CustomizationRecord {
        self.state.read().await.confirmed.clone()
    }

    pub async fn status(&self) -> LockStatus {
        self.state.read().await.current.status()
    }

    /// Load a tenant from the primary backend and replace the whole state.
    ///
    /// Returns the default record (`locked`) without any network call when no
    /// tenant is known, and when the backend has no row. Transport failures
    /// are returned as [`BrandingError::FetchError`] and leave the state as
    /// it was.
    pub async fn fetch(
        &self,
        company_id: Option<CompanyId>,
    ) -> Result<CustomizationRecord, BrandingError> {
        let record = match company_id {
            None => CustomizationRecord::default_for(None),
            Some(id) => {
                let data = self
                    .primary
                    .get_customization(id)
                    .await
                    .map_err(|e| BrandingError::fetch(e.to_string()))?;
                CustomizationRecord::from_wire(id, data)
            }
        };

        let mut state = self.state.write().await;
        state.company_id = company_id;
        state.current = record.clone();
        state.confirmed = record.clone();
        Ok(record)
    }

    /// Refetch the current tenant
    pub async fn refresh(&self) -> Result<CustomizationRecord, BrandingError> {
        let company_id = self.company_id().await;
        self.fetch(company_id).await
    }

    /// Replace the branding before the network confirms it.
    ///
    /// Rejected with [`BrandingError::EditingLocked`] unless the status is
    /// `unlocked`; a rejected call changes nothing.
    pub async fn apply_optimistic(
        &self,
        next: Branding,
    ) -> Result<CustomizationRecord, BrandingError> {
        let mut state = self.state.write().await;
        let status = state.current.status();
        if !status.allows_editing() {
            return Err(BrandingError::EditingLocked { status });
        }
        state.current.branding = next;
        Ok(state.current.clone())
    }

    /// Discard optimistic edits after a confirmed write failure.
    ///
    /// The state first falls back to the last confirmed record, then the
    /// primary is refetched. If the refetch fails the confirmed record stays,
    /// so the result is never the optimistic value.
    pub async fn rollback(&self) -> CustomizationRecord {
        let company_id = {
            let mut state = self.state.write().await;
            state.current = state.confirmed.clone();
            state.company_id
        };

        match self.fetch(company_id).await {
            Ok(record) => {
                tracing::info!("Rolled back customization for company {:?}", company_id);
                record
            }
            Err(e) => {
                tracing::warn!(
                    "Rollback refetch failed for company {:?}, keeping last confirmed record: {}",
                    company_id,
                    e
                );
                self.snapshot().await
            }
        }
    }

    /// Put the logo back to the last confirmed URL, leaving other fields
    pub async fn revert_logo(&self) -> CustomizationRecord {
        let mut state = self.state.write().await;
        let persisted = state.confirmed.branding.assets.logo_url.clone();
        state.current.branding.assets.logo_url = persisted;
        state.current.clone()
    }

    /// Record that the backend accepted the current record
    pub async fn mark_confirmed(&self) {
        let mut state = self.state.write().await;
        state.confirmed = state.current.clone();
    }

    /// Replace the whole state with a record observed on the backend
    pub async fn replace_confirmed(&self, record: CustomizationRecord) {
        let mut state = self.state.write().await;
        if record.company_id.is_some() {
            state.company_id = record.company_id;
        }
        state.current = record.clone();
        state.confirmed = record;
    }

    /// Apply a transition the backend has confirmed
    pub(crate) async fn commit_transition(
        &self,
        transition: LockTransition,
    ) -> Result<LockStatus, BrandingError> {
        let mut state = self.state.write().await;
        let status = state.current.apply_transition(transition)?;
        let confirmed = std::mem::take(&mut state.confirmed);
        state.confirmed =
            CustomizationRecord::new(confirmed.company_id, confirmed.branding, status);
        Ok(status)
    }
}

impl std::fmt::Debug for CustomizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomizationStore")
            .field("primary", &self.primary.label())
            .finish_non_exhaustive()
    }
}
