//! # Replicated Writer
//!
//! Persists customization writes to two independently addressed backends
//! without a distributed transaction.
//!
//! ## Protocol
//!
//! 1. Write to the primary, with fields mapped to the primary's names. A
//!    failure here aborts the whole write (`success: false`).
//! 2. Read the tenant's routing domain from the primary, then resolve the
//!    mirror's own tenant id for that domain.
//! 3. Write the same fields to the mirror under the resolved id.
//! 4. Report `success: true` whenever step 1 succeeded. Failures in steps 2
//!    and 3 only add a warning to the message.
//!
//! The primary is authoritative for the tenant's UI; the mirror is a
//! best-effort copy. Steps run strictly in order because the mirror lookup
//! depends on data read from the primary.

use std::sync::Arc;

use crate::client::api::{ApiError, BackendApi};
use crate::shared::customization::{CompanyId, CustomizationData, CustomizationRecord};
use crate::shared::error::{BrandingError, MirrorStage};

/// A write to replicate
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Upsert every field of the record, status included
    Upsert(CustomizationRecord),
    /// Set `status = locked`
    Lock,
    /// Set `status = unlock_requested`. Primary only.
    RequestUnlock,
}

impl WriteOp {
    fn name(&self) -> &'static str {
        match self {
            Self::Upsert(_) => "upsert",
            Self::Lock => "lock",
            Self::RequestUnlock => "request_unlock",
        }
    }

    fn replicates(&self) -> bool {
        !matches!(self, Self::RequestUnlock)
    }
}

/// What happened on the mirror side of a write
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorOutcome {
    /// The mirror accepted the write under its own tenant id
    Replicated { mirror_id: CompanyId },
    /// No mirror is configured
    NotConfigured,
    /// The operation is primary-only, or the primary write failed
    Skipped,
    /// The primary succeeded but the mirror hop failed
    Failed(BrandingError),
}

/// Composite result of a replicated write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// True whenever the primary write succeeded
    pub success: bool,
    /// Human-readable summary, including any replication warning
    pub message: String,
    /// Why the primary write failed
    pub primary_error: Option<BrandingError>,
    pub mirror: MirrorOutcome,
}

impl WriteOutcome {
    /// Outcome of an operation that needed no write at all
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            primary_error: None,
            mirror: MirrorOutcome::Skipped,
        }
    }

    /// Primary succeeded but the mirror did not receive the write
    pub fn is_partial(&self) -> bool {
        self.success && matches!(self.mirror, MirrorOutcome::Failed(_))
    }

    /// The mirror failure, if any
    pub fn mirror_error(&self) -> Option<&BrandingError> {
        match &self.mirror {
            MirrorOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// `Err` with the primary failure when the write did not succeed
    pub fn into_result(self) -> Result<WriteOutcome, BrandingError> {
        if self.success {
            return Ok(self);
        }
        Err(self
            .primary_error
            .unwrap_or_else(|| BrandingError::primary_write(self.message)))
    }
}

/// Best-effort dual-backend writer
pub struct ReplicatedWriter {
    primary: Arc<dyn BackendApi>,
    mirror: Option<Arc<dyn BackendApi>>,
}

impl ReplicatedWriter {
    pub fn new(primary: Arc<dyn BackendApi>, mirror: Option<Arc<dyn BackendApi>>) -> Self {
        Self { primary, mirror }
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// Upsert a full record
    pub async fn update(&self, company_id: CompanyId, record: &CustomizationRecord) -> WriteOutcome {
        self.write(company_id, &WriteOp::Upsert(record.clone())).await
    }

    /// Run the replication protocol for one operation
    pub async fn write(&self, company_id: CompanyId, op: &WriteOp) -> WriteOutcome {
        if let Err(e) = apply(self.primary.as_ref(), company_id, op).await {
            let error = BrandingError::primary_write(format!("{}: {}", self.primary.label(), e));
            tracing::error!(
                "Primary {} failed for company {}: {}",
                op.name(),
                company_id,
                error
            );
            return WriteOutcome {
                success: false,
                message: format!("Failed to save customization: {}", error),
                primary_error: Some(error),
                mirror: MirrorOutcome::Skipped,
            };
        }
        tracing::info!("Primary {} succeeded for company {}", op.name(), company_id);

        if !op.replicates() {
            return WriteOutcome {
                success: true,
                message: "Customization saved to primary".to_string(),
                primary_error: None,
                mirror: MirrorOutcome::Skipped,
            };
        }

        let Some(mirror) = &self.mirror else {
            return WriteOutcome {
                success: true,
                message: "Customization saved to primary (no mirror configured)".to_string(),
                primary_error: None,
                mirror: MirrorOutcome::NotConfigured,
            };
        };

        match self.replicate(mirror.as_ref(), company_id, op).await {
            Ok(mirror_id) => {
                tracing::info!(
                    "Mirror {} succeeded for company {} (mirror id {})",
                    op.name(),
                    company_id,
                    mirror_id
                );
                WriteOutcome {
                    success: true,
                    message: "Customization saved to primary and mirror".to_string(),
                    primary_error: None,
                    mirror: MirrorOutcome::Replicated { mirror_id },
                }
            }
            Err(error) => {
                tracing::warn!(
                    "Mirror {} failed for company {}: {}",
                    op.name(),
                    company_id,
                    error
                );
                WriteOutcome {
                    success: true,
                    message: format!("Customization saved to primary; mirror not updated ({})", error),
                    primary_error: None,
                    mirror: MirrorOutcome::Failed(error),
                }
            }
        }
    }

    /// Domain lookup on the primary, id resolution and write on the mirror
    async fn replicate(
        &self,
        mirror: &dyn BackendApi,
        company_id: CompanyId,
        op: &WriteOp,
    ) -> Result<CompanyId, BrandingError> {
        let domain = self
            .primary
            .company_domain(company_id)
            .await
            .map_err(|e| BrandingError::mirror(MirrorStage::DomainLookup, e.to_string()))?;

        let mirror_id = mirror
            .resolve_domain(&domain)
            .await
            .map_err(|e| BrandingError::mirror(MirrorStage::IdResolution, e.to_string()))?;
        tracing::debug!(
            "Resolved company {} to mirror id {} via {}",
            company_id,
            mirror_id,
            domain
        );

        apply(mirror, mirror_id, op)
            .await
            .map_err(|e| BrandingError::mirror(MirrorStage::MirrorWrite, e.to_string()))?;
        Ok(mirror_id)
    }
}

/// Send one operation to one backend, mapping fields to its names
async fn apply(
    backend: &dyn BackendApi,
    company_id: CompanyId,
    op: &WriteOp,
) -> Result<String, ApiError> {
    match op {
        WriteOp::Upsert(record) => {
            let data = CustomizationData::from_record(record, backend.description_field());
            backend.put_customization(company_id, &data).await
        }
        WriteOp::Lock => backend.lock(company_id).await,
        WriteOp::RequestUnlock => backend.request_unlock(company_id).await,
    }
}

impl std::fmt::Debug for ReplicatedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicatedWriter")
            .field("primary", &self.primary.label())
            .field("mirror", &self.mirror.as_ref().map(|m| m.label().to_string()))
            .finish()
    }
}
