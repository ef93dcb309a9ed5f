/**
 * Customization Registry
 *
 * Server-side storage of the reference backend: one customization row per
 * company, the routing domain of each company, and uploaded logo files.
 * Everything lives in memory behind `Arc<RwLock<_>>` in `AppState`.
 *
 * Status changes go through the shared lock transition table, so the
 * backend refuses the same illegal moves the client does.
 */

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::color::parse_hex_color;
use crate::shared::customization::{parse_font_size, CompanyId, CustomizationData};
use crate::shared::lock::{LockStatus, LockTransition};

/// A logo file kept by the backend
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub content_type: String,
    pub bytes: Bytes,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredUpload {
    /// `Last-Modified` header value
    pub fn last_modified(&self) -> String {
        self.uploaded_at
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

#[derive(Debug, Default)]
pub struct CustomizationRegistry {
    records: HashMap<CompanyId, CustomizationData>,
    companies: HashMap<CompanyId, String>,
    uploads: HashMap<String, StoredUpload>,
}

impl CustomizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, company_id: CompanyId) -> Option<&CustomizationData> {
        self.records.get(&company_id)
    }

    pub fn status(&self, company_id: CompanyId) -> LockStatus {
        self.records
            .get(&company_id)
            .and_then(|data| data.status)
            .unwrap_or_default()
    }

    /// Insert or replace a row. Colors and font size are validated and
    /// colors normalized. Any `status` in the body is ignored; the stored
    /// one is kept (`locked` for a new row).
    pub fn upsert(
        &mut self,
        company_id: CompanyId,
        mut data: CustomizationData,
    ) -> Result<Upsert, BackendError> {
        normalize(&mut data)?;
        let existing = self.records.get(&company_id);
        if let Some(requested) = data.status {
            tracing::debug!(
                "Ignoring status {} in upsert for company {}",
                requested,
                company_id
            );
        }
        data.status = Some(existing.and_then(|d| d.status).unwrap_or_default());
        let created = existing.is_none();
        self.records.insert(company_id, data);
        Ok(if created {
            Upsert::Created
        } else {
            Upsert::Updated
        })
    }

    /// Apply a lock transition to a company's row, creating the row if needed.
    ///
    /// A repeated `request_unlock` while already `unlock_requested` is
    /// accepted without change.
    pub fn transition(
        &mut self,
        company_id: CompanyId,
        action: LockTransition,
    ) -> Result<LockStatus, BackendError> {
        let current = self.status(company_id);
        let next = match (current, action) {
            (LockStatus::UnlockRequested, LockTransition::RequestUnlock) => current,
            _ => current
                .transition(action)
                .map_err(|_| BackendError::conflict(current, action))?,
        };
        self.records.entry(company_id).or_default().status = Some(next);
        tracing::info!(
            "Company {} {}: {} -> {}",
            company_id,
            action,
            current,
            next
        );
        Ok(next)
    }

    pub fn register_company(&mut self, company_id: CompanyId, domain: &str) -> Result<(), BackendError> {
        let domain = domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
            return Err(BackendError::bad_request("Domain must not be empty"));
        }
        if let Some(owner) = self.company_for_domain(&domain) {
            if owner != company_id {
                return Err(BackendError::handler(
                    axum::http::StatusCode::CONFLICT,
                    format!("Domain {} already belongs to company {}", domain, owner),
                ));
            }
        }
        self.companies.insert(company_id, domain);
        Ok(())
    }

    pub fn domain_of(&self, company_id: CompanyId) -> Option<&str> {
        self.companies.get(&company_id).map(String::as_str)
    }

    pub fn company_for_domain(&self, domain: &str) -> Option<CompanyId> {
        let domain = domain.trim().to_ascii_lowercase();
        self.companies
            .iter()
            .find(|(_, d)| **d == domain)
            .map(|(id, _)| *id)
    }

    /// Keep an uploaded file and return the name it is served under
    pub fn store_upload(&mut self, file_name: &str, content_type: &str, bytes: Bytes) -> String {
        let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_file_name(file_name));
        self.uploads.insert(
            name.clone(),
            StoredUpload {
                content_type: content_type.to_string(),
                bytes,
                uploaded_at: Utc::now(),
            },
        );
        name
    }

    pub fn upload(&self, name: &str) -> Option<&StoredUpload> {
        self.uploads.get(name)
    }
}

fn normalize(data: &mut CustomizationData) -> Result<(), BackendError> {
    let colors = [
        ("bg_color", &mut data.bg_color),
        ("text_color", &mut data.text_color),
        ("btn_color", &mut data.btn_color),
        ("card_color", &mut data.card_color),
        ("sidebar_bg_color", &mut data.sidebar_bg_color),
        ("sidebar_text_color", &mut data.sidebar_text_color),
        ("header_bg_color", &mut data.header_bg_color),
        ("header_text_color", &mut data.header_text_color),
    ];
    for (field, value) in colors {
        if let Some(color) = value.as_mut() {
            *color = parse_hex_color(field, color)?;
        }
    }
    if let Some(size) = data.font_size_base.as_mut() {
        *size = parse_font_size(size)?;
    }
    Ok(())
}

/// Keep only characters that are safe in a URL path segment
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "logo".to_string()
    } else {
        cleaned
    }
}
