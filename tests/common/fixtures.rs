//! Test fixtures
//!
//! The standard setup is tenant 7 on the primary and tenant 700 on the
//! mirror, both routed by `salon.example`.

use std::sync::Arc;
use std::time::Duration;

use tenant_branding::client::{BrandingSession, InMemoryBackend, LogoFile};
use tenant_branding::shared::{CompanyId, CustomizationData, DescriptionField, LockStatus};

pub const TENANT: CompanyId = CompanyId(7);
pub const MIRROR_TENANT: CompanyId = CompanyId(700);
pub const TENANT_DOMAIN: &str = "salon.example";
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;
pub const MIB: usize = 1024 * 1024;

/// An in-memory primary and mirror
pub struct Backends {
    pub primary: Arc<InMemoryBackend>,
    pub mirror: Arc<InMemoryBackend>,
}

impl Backends {
    pub async fn new() -> Self {
        let primary = Arc::new(InMemoryBackend::new("primary", DescriptionField::BannerImage));
        let mirror = Arc::new(InMemoryBackend::new("mirror", DescriptionField::Description));
        primary.set_domain(TENANT, TENANT_DOMAIN).await;
        mirror.set_domain(MIRROR_TENANT, TENANT_DOMAIN).await;
        Self { primary, mirror }
    }

    /// Seed the primary with a record in `status`
    pub async fn seed(&self, data: CustomizationData) {
        self.primary.seed_record(TENANT, data).await;
    }

    /// A session over both backends, opened on the tenant
    pub async fn session(&self) -> BrandingSession {
        let mut session = BrandingSession::with_backends(
            self.primary.clone(),
            Some(self.mirror.clone()),
            POLL_INTERVAL,
            MAX_LOGO_BYTES,
        );
        session
            .open(Some(TENANT))
            .await
            .expect("opening the tenant should succeed");
        session
    }
}

/// A record with only a status and a background color
pub fn record_data(status: LockStatus) -> CustomizationData {
    CustomizationData {
        bg_color: Some("#112233".to_string()),
        status: Some(status),
        ..Default::default()
    }
}

/// A PNG-typed logo file of `len` bytes
pub fn png(len: usize) -> LogoFile {
    LogoFile::new("logo.png", "image/png", vec![0x89u8; len])
}
