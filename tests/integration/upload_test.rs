//! Logo upload pipeline

use assert_matches::assert_matches;
use tenant_branding::client::{ApiError, CallKind, LogoFile};
use tenant_branding::shared::{BrandingError, LockStatus, MirrorStage};

use crate::common::*;

#[tokio::test]
async fn test_oversized_logo_never_reaches_network() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;
    let record = session.record().await;
    let calls = backends.primary.total_calls().await;

    assert_err!(
        session.upload_logo(png(3 * MIB)).await,
        BrandingError::ValidationError { .. }
    );
    assert_no_new_calls!(backends.primary, calls);
    assert_eq!(backends.mirror.total_calls().await, 0);
    assert_eq!(session.record().await, record);
}

#[tokio::test]
async fn test_logo_url_lands_on_both_backends() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    backends.primary.set_upload_url("https://x/y.png").await;
    let session = backends.session().await;

    let outcome = assert_ok!(session.upload_logo(png(MIB)).await);
    assert!(outcome.success);
    assert!(outcome.mirror_error().is_none());
    assert_eq!(backends.primary.call_count(CallKind::UploadLogo).await, 1);

    assert_eq!(session.record().await.branding.assets.logo_url, "https://x/y.png");
    assert_eq!(
        backends.primary.record(TENANT).await.unwrap().logo_url.as_deref(),
        Some("https://x/y.png")
    );
    assert_eq!(
        backends.mirror.record(MIRROR_TENANT).await.unwrap().logo_url.as_deref(),
        Some("https://x/y.png")
    );
}

#[tokio::test]
async fn test_failed_upload_restores_persisted_logo() {
    let backends = Backends::new().await;
    let mut data = record_data(LockStatus::Unlocked);
    data.logo_url = Some("https://cdn.example/old.png".to_string());
    backends.seed(data).await;
    let session = backends.session().await;

    backends
        .primary
        .fail(CallKind::UploadLogo, ApiError::network("reset"))
        .await;
    assert_err!(
        session.upload_logo(png(2048)).await,
        BrandingError::PrimaryWriteError { .. }
    );

    let logo = session.record().await.branding.assets.logo_url;
    assert_eq!(logo, "https://cdn.example/old.png");
    assert_eq!(backends.primary.call_count(CallKind::PutCustomization).await, 0);
}

#[tokio::test]
async fn test_rejected_url_write_rolls_back_logo() {
    let backends = Backends::new().await;
    let mut data = record_data(LockStatus::Unlocked);
    data.logo_url = Some("https://cdn.example/old.png".to_string());
    backends.seed(data).await;
    backends.primary.set_upload_url("https://x/new.png").await;
    let session = backends.session().await;

    backends
        .primary
        .fail(CallKind::PutCustomization, ApiError::Status {
            status: 500,
            body: "db down".to_string(),
        })
        .await;
    assert_err!(
        session.upload_logo(png(MIB)).await,
        BrandingError::PrimaryWriteError { .. }
    );
    assert_eq!(backends.primary.call_count(CallKind::UploadLogo).await, 1);

    let record = session.record().await;
    assert_eq!(record.branding.assets.logo_url, "https://cdn.example/old.png");
    assert_eq!(session.store().confirmed().await, record);
    assert_eq!(
        backends.primary.record(TENANT).await.unwrap().logo_url.as_deref(),
        Some("https://cdn.example/old.png")
    );
    assert_eq!(backends.mirror.total_calls().await, 0);
}

#[tokio::test]
async fn test_mirror_failure_keeps_uploaded_logo() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    backends.primary.set_upload_url("https://x/y.png").await;
    let session = backends.session().await;

    backends
        .mirror
        .fail(CallKind::PutCustomization, ApiError::network("connection refused"))
        .await;
    let outcome = assert_ok!(session.upload_logo(png(MIB)).await);
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

    let record = session.record().await;
    assert_eq!(record.branding.assets.logo_url, "https://x/y.png");
    assert_eq!(session.store().confirmed().await, record);
    assert_eq!(
        backends.primary.record(TENANT).await.unwrap().logo_url.as_deref(),
        Some("https://x/y.png")
    );
    assert_eq!(
        backends
            .mirror
            .record(MIRROR_TENANT)
            .await
            .and_then(|data| data.logo_url),
        None
    );
}

#[tokio::test]
async fn test_non_image_rejected_locally() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;

    let file = LogoFile::new("notes.txt", "text/plain", b"hello".to_vec());
    assert_err!(
        session.upload_logo(file).await,
        BrandingError::ValidationError { .. }
    );
    assert_eq!(backends.primary.call_count(CallKind::UploadLogo).await, 0);
}
