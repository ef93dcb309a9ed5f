//! A failed primary write never leaves the optimistic value behind

use pretty_assertions::assert_eq;
use tenant_branding::client::{ApiError, CallKind};
use tenant_branding::shared::{BrandingError, ColorSlot, FontSlot, LockStatus};

use crate::common::*;

#[tokio::test]
async fn test_primary_failure_restores_fetched_state() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;
    let fetched = session.record().await;

    backends
        .primary
        .fail(CallKind::PutCustomization, ApiError::network("connection refused"))
        .await;

    assert_err!(
        session.set_color(ColorSlot::Background, "#abcdef").await,
        BrandingError::PrimaryWriteError { .. }
    );
    assert_eq!(session.record().await, fetched);
    assert_eq!(backends.mirror.total_calls().await, 0);
}

#[tokio::test]
async fn test_rollback_survives_failed_refetch() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;
    let fetched = session.record().await;

    backends
        .primary
        .fail(CallKind::PutCustomization, ApiError::network("connection refused"))
        .await;
    backends
        .primary
        .fail(CallKind::GetCustomization, ApiError::network("connection refused"))
        .await;

    assert_err!(
        session.set_font(FontSlot::Heading, "Playfair Display").await,
        BrandingError::PrimaryWriteError { .. }
    );
    assert_eq!(session.record().await, fetched);
}

#[tokio::test]
async fn test_rollback_keeps_earlier_confirmed_edits() {
    let backends = Backends::new().await;
    backends.seed(record_data(LockStatus::Unlocked)).await;
    let session = backends.session().await;

    assert_ok!(session.set_color(ColorSlot::Text, "#333333").await);
    backends
        .primary
        .fail(CallKind::PutCustomization, ApiError::rejected("quota"))
        .await;
    assert_err!(session.set_color(ColorSlot::Text, "#444444").await);

    assert_eq!(session.record().await.branding.theme.text, "#333333");
}
