//! # Branding Session
//!
//! One tenant's customization screen: the store, the lock state machine, the
//! replicated writer and the logo pipeline wired to the same backends.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tenant_branding::client::{BrandingSession, Config};
//! use tenant_branding::shared::{ColorSlot, CompanyId};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let mut session = BrandingSession::from_config(&config)?;
//! session.open(Some(CompanyId(7))).await?;
//!
//! session.request_unlock().await?;
//! // ... an administrator grants the request ...
//! session.set_color(ColorSlot::Button, "#ff6600").await?;
//! session.save_and_lock().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every edit is checked against the lock first; while editing is not
//! allowed it fails with [`BrandingError::EditingLocked`] before anything is
//! sent or changed. Accepted edits are applied optimistically, written
//! through the [`ReplicatedWriter`] and rolled back if the primary refuses
//! them.

use std::sync::Arc;
use std::time::Duration;

use crate::client::api::{ApiError, BackendApi, HttpBackend};
use crate::client::config::Config;
use crate::client::lock::LockStateMachine;
use crate::client::store::CustomizationStore;
use crate::client::upload::{LogoFile, LogoUploadPipeline};
use crate::client::writer::{ReplicatedWriter, WriteOutcome};
use crate::shared::customization::{Branding, ColorSlot, CompanyId, CustomizationRecord, FontSlot};
use crate::shared::error::BrandingError;
use crate::shared::lock::LockStatus;

pub struct BrandingSession {
    store: Arc<CustomizationStore>,
    writer: Arc<ReplicatedWriter>,
    lock: LockStateMachine,
    uploads: LogoUploadPipeline,
}

impl BrandingSession {
    /// Build a session talking HTTP to the configured backends
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let primary: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(
            "primary",
            config.primary().clone(),
            config.request_timeout(),
        )?);
        let mirror = match config.mirror() {
            Some(endpoint) => Some(Arc::new(HttpBackend::new(
                "mirror",
                endpoint.clone(),
                config.request_timeout(),
            )?) as Arc<dyn BackendApi>),
            None => None,
        };
        Ok(Self::with_backends(
            primary,
            mirror,
            config.poll_interval(),
            config.max_logo_bytes(),
        ))
    }

    /// Build a session over any backend implementations
    pub fn with_backends(
        primary: Arc<dyn BackendApi>,
        mirror: Option<Arc<dyn BackendApi>>,
        poll_interval: Duration,
        max_logo_bytes: usize,
    ) -> Self {
        let store = Arc::new(CustomizationStore::new(Arc::clone(&primary)));
        let writer = Arc::new(ReplicatedWriter::new(Arc::clone(&primary), mirror));
        let lock = LockStateMachine::new(
            Arc::clone(&primary),
            Arc::clone(&store),
            Arc::clone(&writer),
            poll_interval,
        );
        let uploads = LogoUploadPipeline::new(primary, Arc::clone(&store), Arc::clone(&writer))
            .with_max_bytes(max_logo_bytes);
        Self {
            store,
            writer,
            lock,
            uploads,
        }
    }

    /// Load a tenant. `None` shows the default branding, locked.
    pub async fn open(
        &mut self,
        company_id: Option<CompanyId>,
    ) -> Result<CustomizationRecord, BrandingError> {
        self.lock.load(company_id).await
    }

    pub async fn record(&self) -> CustomizationRecord {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> LockStatus {
        self.store.status().await
    }

    pub fn is_polling(&self) -> bool {
        self.lock.is_polling()
    }

    pub fn store(&self) -> &Arc<CustomizationStore> {
        &self.store
    }

    pub async fn set_color(
        &self,
        slot: ColorSlot,
        value: &str,
    ) -> Result<WriteOutcome, BrandingError> {
        self.edit(|branding| branding.theme.set(slot, value)).await
    }

    pub async fn set_font(&self, slot: FontSlot, name: &str) -> Result<WriteOutcome, BrandingError> {
        self.edit(|branding| branding.typography.set_font(slot, name))
            .await
    }

    pub async fn set_font_size(&self, size: &str) -> Result<WriteOutcome, BrandingError> {
        self.edit(|branding| branding.typography.set_base_font_size(size))
            .await
    }

    pub async fn set_description(&self, text: &str) -> Result<WriteOutcome, BrandingError> {
        self.edit(|branding| {
            branding.assets.description = text.to_string();
            Ok(())
        })
        .await
    }

    pub async fn upload_logo(&self, file: LogoFile) -> Result<WriteOutcome, BrandingError> {
        self.uploads.upload(file).await
    }

    pub async fn request_unlock(&mut self) -> Result<WriteOutcome, BrandingError> {
        self.lock.request_unlock().await
    }

    pub async fn save_and_lock(&mut self) -> Result<WriteOutcome, BrandingError> {
        self.lock.save_and_lock().await
    }

    pub async fn lock(&mut self) -> Result<WriteOutcome, BrandingError> {
        self.lock.lock().await
    }

    pub async fn refresh(&mut self) -> Result<CustomizationRecord, BrandingError> {
        self.lock.refresh().await
    }

    /// Wait until the pending unlock request is decided
    pub async fn wait_for_decision(&mut self) -> Option<LockStatus> {
        self.lock.wait_for_decision().await
    }

    /// Stop background work. Dropping the session does the same.
    pub fn close(&mut self) {
        self.lock.shutdown();
    }

    async fn edit<F>(&self, change: F) -> Result<WriteOutcome, BrandingError>
    where
        F: FnOnce(&mut Branding) -> Result<(), BrandingError>,
    {
        let status = self.store.status().await;
        if !status.allows_editing() {
            return Err(BrandingError::EditingLocked { status });
        }
        let company_id = self
            .store
            .company_id()
            .await
            .ok_or(BrandingError::MissingCompany)?;

        let mut branding = self.store.snapshot().await.branding;
        change(&mut branding)?;
        let record = self.store.apply_optimistic(branding).await?;

        let outcome = self.writer.update(company_id, &record).await;
        if !outcome.success {
            self.store.rollback().await;
            return outcome.into_result();
        }
        if let Some(error) = outcome.mirror_error() {
            tracing::warn!("Edit for company {} not replicated: {}", company_id, error);
        }
        self.store.mark_confirmed().await;
        Ok(outcome)
    }
}

impl std::fmt::Debug for BrandingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandingSession")
            .field("store", &self.store)
            .field("writer", &self.writer)
            .field("lock", &self.lock)
            .finish()
    }
}
