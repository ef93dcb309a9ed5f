//! Best-effort replication from the primary to the mirror

use std::sync::Arc;

use assert_matches::assert_matches;
use tenant_branding::client::{
    ApiError, CallKind, InMemoryBackend, MirrorOutcome, ReplicatedWriter, WriteOp,
};
use tenant_branding::shared::{
    BrandingError, ColorSlot, CustomizationRecord, DescriptionField, LockStatus, MirrorStage,
};

use crate::common::*;

fn writer(backends: &Backends) -> ReplicatedWriter {
    ReplicatedWriter::new(backends.primary.clone(), Some(backends.mirror.clone()))
}

#[tokio::test]
async fn test_mirror_write_failure_is_a_warning() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;
    backends
        .mirror
        .fail(CallKind::PutCustomization, ApiError::network("mirror down"))
        .await;

    let outcome = assert_ok!(session.set_color(ColorSlot::Card, "#eeeeee").await);
    assert!(outcome.success);
    assert!(outcome.is_partial());
    assert_contains!(outcome.message, "mirror not updated");
    assert_matches!(
        outcome.mirror_error(),
        Some(BrandingError::MirrorReplicationError {
            stage: MirrorStage::MirrorWrite,
            ..
        })
    );

    // no rollback: the primary keeps the edit and so does the store
    let stored = backends.primary.record(TENANT).await.unwrap();
    assert_eq!(stored.card_color.as_deref(), Some("#eeeeee"));
    assert_eq!(session.record().await.branding.theme.card, "#eeeeee");
}

#[tokio::test]
async fn test_failures_are_classified_by_stage() {
    let record = CustomizationRecord::default_for(Some(TENANT));

    let backends = Backends::new().await;
    backends
        .primary
        .fail(CallKind::CompanyDomain, ApiError::not_found("company 7"))
        .await;
    let outcome = writer(&backends).update(TENANT, &record).await;
    assert!(outcome.success);
    assert_matches!(
        outcome.mirror_error(),
        Some(BrandingError::MirrorReplicationError {
            stage: MirrorStage::DomainLookup,
            ..
        })
    );
    assert_eq!(backends.mirror.total_calls().await, 0);

    let backends = Backends::new().await;
    backends
        .mirror
        .fail(CallKind::ResolveDomain, ApiError::network("timeout"))
        .await;
    let outcome = writer(&backends).update(TENANT, &record).await;
    assert_matches!(
        outcome.mirror_error(),
        Some(BrandingError::MirrorReplicationError {
            stage: MirrorStage::IdResolution,
            ..
        })
    );
    assert_eq!(backends.mirror.call_count(CallKind::PutCustomization).await, 0);
}

#[tokio::test]
async fn test_primary_failure_skips_mirror() {
    let backends = Backends::new().await;
    backends
        .primary
        .fail(CallKind::Lock, ApiError::rejected("maintenance"))
        .await;

    let outcome = writer(&backends).write(TENANT, &WriteOp::Lock).await;
    assert!(!outcome.success);
    assert_eq!(outcome.mirror, MirrorOutcome::Skipped);
    assert_matches!(
        outcome.primary_error,
        Some(BrandingError::PrimaryWriteError { .. })
    );
    assert_eq!(backends.mirror.total_calls().await, 0);
}

#[tokio::test]
async fn test_mirror_is_written_under_resolved_id() {
    let backends = Backends::new().await;
    let record = CustomizationRecord::default_for(Some(TENANT));

    let outcome = writer(&backends).update(TENANT, &record).await;
    assert_eq!(
        outcome.mirror,
        MirrorOutcome::Replicated {
            mirror_id: MIRROR_TENANT
        }
    );
    assert!(backends.mirror.record(MIRROR_TENANT).await.is_some());
    assert!(backends.mirror.record(TENANT).await.is_none());
}

#[tokio::test]
async fn test_without_mirror() {
    let primary = Arc::new(InMemoryBackend::new("primary", DescriptionField::BannerImage));
    let writer = ReplicatedWriter::new(primary.clone(), None);
    let record = CustomizationRecord::default_for(Some(TENANT));

    let outcome = writer.update(TENANT, &record).await;
    assert!(outcome.success);
    assert!(!outcome.is_partial());
    assert_eq!(outcome.mirror, MirrorOutcome::NotConfigured);
    assert_eq!(primary.call_count(CallKind::CompanyDomain).await, 0);
}
