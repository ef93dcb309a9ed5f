//! Customization Record
//!
//! One tenant's branding (theme colors, typography, assets) plus its lock
//! status, and the mapping between that record and the field names each
//! backend uses on the wire.
//!
//! # Wire Mapping
//!
//! Both backends share the color, font, logo and status field names. They
//! differ in the name of the free-text/asset field: one calls it
//! `banner_image`, the other `description`. [`DescriptionField`] selects the
//! name when encoding, and decoding accepts either.
//!
//! # Status
//!
//! The status of a [`CustomizationRecord`] is private. It is set when a record
//! is built from a backend observation, and afterwards changes only through
//! [`CustomizationRecord::apply_transition`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::color::{color_or_default, palette, parse_hex_color};
use crate::shared::error::BrandingError;
use crate::shared::lock::{LockStatus, LockTransition};

/// Default body and heading font
pub const DEFAULT_FONT: &str = "Inter";

/// Default base font size
pub const DEFAULT_FONT_SIZE: &str = "16px";

/// Opaque tenant key, unique within one backend system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub u64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CompanyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Wire name of the free-text/asset field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionField {
    /// `banner_image`
    #[default]
    BannerImage,
    /// `description`
    Description,
}

impl DescriptionField {
    /// Field name on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::BannerImage => "banner_image",
            Self::Description => "description",
        }
    }
}

/// The eight theme colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Background,
    Text,
    Button,
    Card,
    SidebarBackground,
    SidebarText,
    HeaderBackground,
    HeaderText,
}

impl ColorSlot {
    /// All slots in wire order
    pub const ALL: [ColorSlot; 8] = [
        ColorSlot::Background,
        ColorSlot::Text,
        ColorSlot::Button,
        ColorSlot::Card,
        ColorSlot::SidebarBackground,
        ColorSlot::SidebarText,
        ColorSlot::HeaderBackground,
        ColorSlot::HeaderText,
    ];

    /// Field name on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Background => "bg_color",
            Self::Text => "text_color",
            Self::Button => "btn_color",
            Self::Card => "card_color",
            Self::SidebarBackground => "sidebar_bg_color",
            Self::SidebarText => "sidebar_text_color",
            Self::HeaderBackground => "header_bg_color",
            Self::HeaderText => "header_text_color",
        }
    }

    /// Palette fallback for this slot
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Background => palette::BACKGROUND,
            Self::Text => palette::TEXT,
            Self::Button => palette::BUTTON,
            Self::Card => palette::CARD,
            Self::SidebarBackground => palette::SIDEBAR_BACKGROUND,
            Self::SidebarText => palette::SIDEBAR_TEXT,
            Self::HeaderBackground => palette::HEADER_BACKGROUND,
            Self::HeaderText => palette::HEADER_TEXT,
        }
    }
}

/// Font selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSlot {
    Body,
    Heading,
}

/// Theme colors, always valid hex strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub button: String,
    pub card: String,
    pub sidebar_background: String,
    pub sidebar_text: String,
    pub header_background: String,
    pub header_text: String,
}

impl Theme {
    pub fn get(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::Background => &self.background,
            ColorSlot::Text => &self.text,
            ColorSlot::Button => &self.button,
            ColorSlot::Card => &self.card,
            ColorSlot::SidebarBackground => &self.sidebar_background,
            ColorSlot::SidebarText => &self.sidebar_text,
            ColorSlot::HeaderBackground => &self.header_background,
            ColorSlot::HeaderText => &self.header_text,
        }
    }

    /// Set a color after validating it
    pub fn set(&mut self, slot: ColorSlot, value: &str) -> Result<(), BrandingError> {
        let value = parse_hex_color(slot.wire_name(), value)?;
        let target = match slot {
            ColorSlot::Background => &mut self.background,
            ColorSlot::Text => &mut self.text,
            ColorSlot::Button => &mut self.button,
            ColorSlot::Card => &mut self.card,
            ColorSlot::SidebarBackground => &mut self.sidebar_background,
            ColorSlot::SidebarText => &mut self.sidebar_text,
            ColorSlot::HeaderBackground => &mut self.header_background,
            ColorSlot::HeaderText => &mut self.header_text,
        };
        *target = value;
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: palette::BACKGROUND.to_string(),
            text: palette::TEXT.to_string(),
            button: palette::BUTTON.to_string(),
            card: palette::CARD.to_string(),
            sidebar_background: palette::SIDEBAR_BACKGROUND.to_string(),
            sidebar_text: palette::SIDEBAR_TEXT.to_string(),
            header_background: palette::HEADER_BACKGROUND.to_string(),
            header_text: palette::HEADER_TEXT.to_string(),
        }
    }
}

/// Fonts and base size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typography {
    pub body_font: String,
    pub heading_font: String,
    pub base_font_size: String,
}

impl Typography {
    pub fn set_font(&mut self, slot: FontSlot, name: &str) -> Result<(), BrandingError> {
        let name = name.trim();
        if name.is_empty() {
            let field = match slot {
                FontSlot::Body => "font_family",
                FontSlot::Heading => "font_heading",
            };
            return Err(BrandingError::validation(field, "Font name cannot be empty"));
        }
        match slot {
            FontSlot::Body => self.body_font = name.to_string(),
            FontSlot::Heading => self.heading_font = name.to_string(),
        }
        Ok(())
    }

    pub fn set_base_font_size(&mut self, size: &str) -> Result<(), BrandingError> {
        self.base_font_size = parse_font_size(size)?;
        Ok(())
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            body_font: DEFAULT_FONT.to_string(),
            heading_font: DEFAULT_FONT.to_string(),
            base_font_size: DEFAULT_FONT_SIZE.to_string(),
        }
    }
}

/// Validate a CSS size such as `16px`, `1.25rem` or `1em`
pub fn parse_font_size(value: &str) -> Result<String, BrandingError> {
    let value = value.trim();
    let number = ["px", "rem", "em"]
        .iter()
        .find_map(|unit| value.strip_suffix(unit));

    match number.and_then(|n| n.parse::<f32>().ok()) {
        Some(n) if n > 0.0 && n.is_finite() => Ok(value.to_string()),
        _ => Err(BrandingError::validation(
            "font_size_base",
            format!("'{}' is not a positive px, rem or em size", value),
        )),
    }
}

/// Logo and free-text/asset field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    /// Persisted URL, or a `data:` URL while an upload is unconfirmed
    pub logo_url: String,
    /// Free text or asset URL (`banner_image` / `description` on the wire)
    pub description: String,
}

impl Assets {
    /// Whether the logo is a local preview that no backend has seen
    pub fn has_local_preview(&self) -> bool {
        self.logo_url.starts_with("data:")
    }
}

/// Everything a tenant can edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub theme: Theme,
    pub typography: Typography,
    pub assets: Assets,
}

/// One tenant's branding and lock status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomizationRecord {
    /// Tenant key; `None` until a tenant is known
    pub company_id: Option<CompanyId>,
    /// Editable fields
    pub branding: Branding,
    status: LockStatus,
}

impl CustomizationRecord {
    /// Build a record as observed from a backend
    pub fn new(company_id: Option<CompanyId>, branding: Branding, status: LockStatus) -> Self {
        Self {
            company_id,
            branding,
            status,
        }
    }

    /// Default record (default palette and fonts, `locked`)
    pub fn default_for(company_id: Option<CompanyId>) -> Self {
        Self {
            company_id,
            ..Self::default()
        }
    }

    /// Decode a backend response. A missing row yields the default record.
    pub fn from_wire(company_id: CompanyId, data: Option<CustomizationData>) -> Self {
        match data {
            Some(data) => data.into_record(company_id),
            None => Self::default_for(Some(company_id)),
        }
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }

    /// Move the status through the lock state machine
    pub fn apply_transition(&mut self, transition: LockTransition) -> Result<LockStatus, BrandingError> {
        self.status = self.status.transition(transition)?;
        Ok(self.status)
    }
}

/// Customization fields as they travel on the wire
///
/// Every field is optional when decoding; missing colors fall back to the
/// default palette and missing fonts to the default typography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btn_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LockStatus>,
}

impl CustomizationData {
    /// Encode a record using the given name for the free-text field.
    /// `status` is left out; it only moves through the lock endpoints.
    pub fn from_record(record: &CustomizationRecord, field: DescriptionField) -> Self {
        let theme = &record.branding.theme;
        let typography = &record.branding.typography;
        let assets = &record.branding.assets;
        let text = Some(assets.description.clone());

        Self {
            bg_color: Some(theme.background.clone()),
            text_color: Some(theme.text.clone()),
            btn_color: Some(theme.button.clone()),
            card_color: Some(theme.card.clone()),
            sidebar_bg_color: Some(theme.sidebar_background.clone()),
            sidebar_text_color: Some(theme.sidebar_text.clone()),
            header_bg_color: Some(theme.header_background.clone()),
            header_text_color: Some(theme.header_text.clone()),
            logo_url: Some(assets.logo_url.clone()),
            banner_image: match field {
                DescriptionField::BannerImage => text.clone(),
                DescriptionField::Description => None,
            },
            description: match field {
                DescriptionField::Description => text,
                DescriptionField::BannerImage => None,
            },
            font_family: Some(typography.body_font.clone()),
            font_size_base: Some(typography.base_font_size.clone()),
            font_heading: Some(typography.heading_font.clone()),
            status: None,
        }
    }

    /// Decode into a record, applying palette and typography fallbacks
    pub fn into_record(self, company_id: CompanyId) -> CustomizationRecord {
        let color = |value: &Option<String>, slot: ColorSlot| {
            color_or_default(value.as_deref(), slot.default_color())
        };
        let text_or = |value: Option<String>, default: &str| match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => default.to_string(),
        };

        let theme = Theme {
            background: color(&self.bg_color, ColorSlot::Background),
            text: color(&self.text_color, ColorSlot::Text),
            button: color(&self.btn_color, ColorSlot::Button),
            card: color(&self.card_color, ColorSlot::Card),
            sidebar_background: color(&self.sidebar_bg_color, ColorSlot::SidebarBackground),
            sidebar_text: color(&self.sidebar_text_color, ColorSlot::SidebarText),
            header_background: color(&self.header_bg_color, ColorSlot::HeaderBackground),
            header_text: color(&self.header_text_color, ColorSlot::HeaderText),
        };
        let typography = Typography {
            body_font: text_or(self.font_family, DEFAULT_FONT),
            heading_font: text_or(self.font_heading, DEFAULT_FONT),
            base_font_size: text_or(self.font_size_base, DEFAULT_FONT_SIZE),
        };
        let assets = Assets {
            logo_url: self.logo_url.unwrap_or_default(),
            description: self.banner_image.or(self.description).unwrap_or_default(),
        };

        CustomizationRecord::new(
            Some(company_id),
            Branding {
                theme,
                typography,
                assets,
            },
            self.status.unwrap_or_default(),
        )
    }
}
