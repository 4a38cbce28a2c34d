//! DocumentType enum and the per-type intake checklist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The legal documents the intake flow can produce.
///
/// Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    PrivacyPolicy,
    TermsOfService,
    CookieConsent,
}

/// A business-profile field the conversation should try to collect.
///
/// Keys are documented, not enforced: the structured field map stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    /// Key the oracle is asked to use in `extractedFields`.
    pub key: &'static str,
    /// Human-readable checklist line.
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> RequiredField {
    RequiredField { key, label }
}

const PRIVACY_POLICY_FIELDS: &[RequiredField] = &[
    field("businessName", "Business name"),
    field("website", "Website"),
    field("contactEmail", "Contact email"),
    field("dataTypes", "Types of personal data collected"),
    field("usesCookies", "Whether you use cookies"),
    field("usesAnalytics", "Whether you use analytics"),
    field("sharesDataWithThirdParties", "If you share data with third parties"),
    field("jurisdiction", "Your business location/jurisdiction"),
];

const TERMS_OF_SERVICE_FIELDS: &[RequiredField] = &[
    field("businessName", "Business name"),
    field("website", "Website"),
    field("contactEmail", "Contact email"),
    field("productType", "Description of your services/products"),
    field("hasUserAccounts", "Whether users create accounts"),
    field("paymentMethod", "Payment policy"),
    field("refundPolicy", "Refund policy"),
    field("jurisdiction", "Your business location/jurisdiction"),
];

const COOKIE_CONSENT_FIELDS: &[RequiredField] = &[
    field("businessName", "Business name"),
    field("website", "Website"),
    field("cookieTypes", "Types of cookies used (essential, analytics, marketing)"),
    field("usesAnalytics", "Analytics tools used (Google Analytics, etc.)"),
    field("usesAdvertising", "Whether you use advertising cookies"),
    field("jurisdiction", "Your business location/jurisdiction"),
];

impl DocumentType {
    /// Returns all document types.
    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::PrivacyPolicy,
            DocumentType::TermsOfService,
            DocumentType::CookieConsent,
        ]
    }

    /// Wire tag, e.g. `privacy-policy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PrivacyPolicy => "privacy-policy",
            DocumentType::TermsOfService => "terms-of-service",
            DocumentType::CookieConsent => "cookie-consent",
        }
    }

    /// Conversational name: the tag with its first hyphen replaced by a space.
    ///
    /// `terms-of-service` becomes `terms of-service`, matching the phrasing
    /// users have always seen in the greeting.
    pub fn display_name(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }

    /// Title prefix used for generated documents.
    pub fn title_prefix(&self) -> &'static str {
        match self {
            DocumentType::PrivacyPolicy => "Privacy Policy",
            DocumentType::TermsOfService => "Terms of Service",
            DocumentType::CookieConsent => "Cookie Policy",
        }
    }

    /// Fields the conversation should collect for this document type.
    pub fn required_fields(&self) -> &'static [RequiredField] {
        match self {
            DocumentType::PrivacyPolicy => PRIVACY_POLICY_FIELDS,
            DocumentType::TermsOfService => TERMS_OF_SERVICE_FIELDS,
            DocumentType::CookieConsent => COOKIE_CONSENT_FIELDS,
        }
    }

    /// Deterministic opening assistant turn for a new session.
    pub fn greeting(&self) -> String {
        format!(
            "Hi! I'm here to help you create a professional {} for your business. \
             To get started, could you tell me about your business? Business name, \
             what your role is in the company (eg. founder/owner, manager etc), and \
             your businesses website url, if you have one.",
            self.display_name()
        )
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("documentType"));
        }
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == trimmed)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "documentType",
                    format!("unsupported document type '{}'", trimmed),
                )
            })
    }
}
