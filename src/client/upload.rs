//! # Logo Upload Pipeline
//!
//! 1. Validate the file locally (size, type). Rejections never reach the
//!    network.
//! 2. Show a `data:` URL preview right away.
//! 3. Upload to the primary backend and receive a persisted URL.
//! 4. Write the new `logo_url` through the [`ReplicatedWriter`].
//! 5. On upload failure, put the logo back to the last persisted URL.
//!
//! The record never ends up pointing at a local-only preview.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use std::sync::Arc;

use crate::client::api::BackendApi;
use crate::client::store::CustomizationStore;
use crate::client::writer::{ReplicatedWriter, WriteOutcome};
use crate::shared::config::DEFAULT_MAX_LOGO_BYTES;
use crate::shared::error::BrandingError;

/// An image picked by the tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LogoFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Inline preview that needs no network round-trip
    pub fn preview_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64.encode(&self.bytes)
        )
    }
}

/// Check a logo file before anything touches the network
pub fn validate_logo(file: &LogoFile, max_bytes: usize) -> Result<(), BrandingError> {
    if file.is_empty() {
        return Err(BrandingError::validation("logo", "File is empty"));
    }
    if file.len() > max_bytes {
        return Err(BrandingError::validation(
            "logo",
            format!(
                "File is {} bytes, the limit is {} bytes",
                file.len(),
                max_bytes
            ),
        ));
    }
    if !file.content_type.starts_with("image/") {
        return Err(BrandingError::validation(
            "logo",
            format!("'{}' is not an image type", file.content_type),
        ));
    }
    Ok(())
}

/// Validates, previews, uploads and replicates a new logo
pub struct LogoUploadPipeline {
    primary: Arc<dyn BackendApi>,
    store: Arc<CustomizationStore>,
    writer: Arc<ReplicatedWriter>,
    max_bytes: usize,
}

impl LogoUploadPipeline {
    pub fn new(
        primary: Arc<dyn BackendApi>,
        store: Arc<CustomizationStore>,
        writer: Arc<ReplicatedWriter>,
    ) -> Self {
        Self {
            primary,
            store,
            writer,
            max_bytes: DEFAULT_MAX_LOGO_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Run the pipeline for one file
    pub async fn upload(&self, file: LogoFile) -> Result<WriteOutcome, BrandingError> {
        let status = self.store.status().await;
        if !status.allows_editing() {
            return Err(BrandingError::EditingLocked { status });
        }
        validate_logo(&file, self.max_bytes)?;
        let company_id = self
            .store
            .company_id()
            .await
            .ok_or(BrandingError::MissingCompany)?;

        let mut branding = self.store.snapshot().await.branding;
        branding.assets.logo_url = file.preview_url();
        self.store.apply_optimistic(branding).await?;

        let url = match self.primary.upload_logo(&file).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Logo upload failed for company {}: {}", company_id, e);
                self.store.revert_logo().await;
                return Err(BrandingError::primary_write(format!(
                    "logo upload failed: {}",
                    e
                )));
            }
        };
        tracing::info!("Uploaded logo for company {} to {}", company_id, url);

        let mut branding = self.store.snapshot().await.branding;
        branding.assets.logo_url = url;
        let record = self.store.apply_optimistic(branding).await?;

        let outcome = self.writer.update(company_id, &record).await;
        if !outcome.success {
            self.store.rollback().await;
            return outcome.into_result();
        }
        if let Some(error) = outcome.mirror_error() {
            tracing::warn!("Logo for company {} not replicated: {}", company_id, error);
        }
        self.store.mark_confirmed().await;
        Ok(outcome)
    }
}

impl std::fmt::Debug for LogoUploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoUploadPipeline")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
