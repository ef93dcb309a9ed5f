//! In-memory backend
//!
//! A [`BackendApi`] that keeps records in a map instead of talking HTTP.
//! It records every call and can be told to fail specific operations, which
//! makes it the backend of choice for offline demos and tests of the
//! replication and polling logic.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::client::api::{ApiError, BackendApi};
use crate::client::upload::LogoFile;
use crate::shared::customization::{CompanyId, CustomizationData, DescriptionField};
use crate::shared::lock::LockStatus;

/// Operation kinds of [`BackendApi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    GetCustomization,
    PutCustomization,
    RequestUnlock,
    Lock,
    UploadLogo,
    CompanyDomain,
    ResolveDomain,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCall {
    pub kind: CallKind,
    pub company_id: Option<CompanyId>,
    /// Domain for lookups, file name for uploads
    pub detail: Option<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<CompanyId, CustomizationData>,
    domains: HashMap<CompanyId, String>,
    calls: Vec<BackendCall>,
    failures: HashMap<CallKind, ApiError>,
    queued_gets: VecDeque<Result<Option<CustomizationData>, ApiError>>,
    upload_url: Option<String>,
    uploads: usize,
}

/// Map-backed implementation of [`BackendApi`]
#[derive(Debug)]
pub struct InMemoryBackend {
    label: String,
    description_field: DescriptionField,
    state: RwLock<MemoryState>,
}

impl InMemoryBackend {
    pub fn new(label: impl Into<String>, description_field: DescriptionField) -> Self {
        Self {
            label: label.into(),
            description_field,
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Store a record as if it had been written earlier
    pub async fn seed_record(&self, company_id: CompanyId, data: CustomizationData) {
        self.state.write().await.records.insert(company_id, data);
    }

    /// Register a tenant's routing domain
    pub async fn set_domain(&self, company_id: CompanyId, domain: impl Into<String>) {
        self.state
            .write()
            .await
            .domains
            .insert(company_id, domain.into());
    }

    /// Change a status out of band, the way an administrator would
    pub async fn set_status(&self, company_id: CompanyId, status: LockStatus) {
        let mut state = self.state.write().await;
        state.records.entry(company_id).or_default().status = Some(status);
    }

    pub async fn record(&self, company_id: CompanyId) -> Option<CustomizationData> {
        self.state.read().await.records.get(&company_id).cloned()
    }

    /// Make every call of `kind` fail with `error`
    pub async fn fail(&self, kind: CallKind, error: ApiError) {
        self.state.write().await.failures.insert(kind, error);
    }

    pub async fn clear_failure(&self, kind: CallKind) {
        self.state.write().await.failures.remove(&kind);
    }

    /// Queue a response for the next `get_customization` call. Queued
    /// responses are used in order before the stored records.
    pub async fn queue_get(&self, response: Result<Option<CustomizationData>, ApiError>) {
        self.state.write().await.queued_gets.push_back(response);
    }

    /// Fix the URL returned by `upload_logo`
    pub async fn set_upload_url(&self, url: impl Into<String>) {
        self.state.write().await.upload_url = Some(url.into());
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn call_count(&self, kind: CallKind) -> usize {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|call| call.kind == kind)
            .count()
    }

    pub async fn total_calls(&self) -> usize {
        self.state.read().await.calls.len()
    }

    /// Record the call and return the injected failure, if any
    async fn begin(
        &self,
        kind: CallKind,
        company_id: Option<CompanyId>,
        detail: Option<String>,
    ) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        state.calls.push(BackendCall {
            kind,
            company_id,
            detail,
        });
        match state.failures.get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn set_stored_status(&self, company_id: CompanyId, status: LockStatus) {
        let mut state = self.state.write().await;
        state.records.entry(company_id).or_default().status = Some(status);
    }
}

#[async_trait]
impl BackendApi for InMemoryBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn description_field(&self) -> DescriptionField {
        self.description_field
    }

    async fn get_customization(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<CustomizationData>, ApiError> {
        self.begin(CallKind::GetCustomization, Some(company_id), None)
            .await?;
        let mut state = self.state.write().await;
        if let Some(queued) = state.queued_gets.pop_front() {
            return queued;
        }
        Ok(state.records.get(&company_id).cloned())
    }

    async fn put_customization(
        &self,
        company_id: CompanyId,
        data: &CustomizationData,
    ) -> Result<String, ApiError> {
        self.begin(CallKind::PutCustomization, Some(company_id), None)
            .await?;
        let mut state = self.state.write().await;
        let stored = state.records.get(&company_id).map(|d| d.status);
        let mut data = data.clone();
        data.status = Some(stored.flatten().unwrap_or_default());
        state.records.insert(company_id, data);
        Ok(if stored.is_some() {
            "Customization updated".to_string()
        } else {
            "Customization created".to_string()
        })
    }

    async fn request_unlock(&self, company_id: CompanyId) -> Result<String, ApiError> {
        self.begin(CallKind::RequestUnlock, Some(company_id), None)
            .await?;
        self.set_stored_status(company_id, LockStatus::UnlockRequested)
            .await;
        Ok("Unlock requested".to_string())
    }

    async fn lock(&self, company_id: CompanyId) -> Result<String, ApiError> {
        self.begin(CallKind::Lock, Some(company_id), None).await?;
        self.set_stored_status(company_id, LockStatus::Locked).await;
        Ok("Customization locked".to_string())
    }

    async fn upload_logo(&self, file: &LogoFile) -> Result<String, ApiError> {
        self.begin(CallKind::UploadLogo, None, Some(file.file_name.clone()))
            .await?;
        let mut state = self.state.write().await;
        state.uploads += 1;
        Ok(match &state.upload_url {
            Some(url) => url.clone(),
            None => format!(
                "memory://{}/uploads/{}-{}",
                self.label, state.uploads, file.file_name
            ),
        })
    }

    async fn company_domain(&self, company_id: CompanyId) -> Result<String, ApiError> {
        self.begin(CallKind::CompanyDomain, Some(company_id), None)
            .await?;
        self.state
            .read()
            .await
            .domains
            .get(&company_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("company {}", company_id)))
    }

    async fn resolve_domain(&self, domain: &str) -> Result<CompanyId, ApiError> {
        self.begin(CallKind::ResolveDomain, None, Some(domain.to_string()))
            .await?;
        self.state
            .read()
            .await
            .domains
            .iter()
            .find(|(_, d)| d.as_str() == domain)
            .map(|(id, _)| *id)
            .ok_or_else(|| ApiError::not_found(format!("company for domain {}", domain)))
    }
}
