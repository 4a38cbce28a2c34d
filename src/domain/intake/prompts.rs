//! Prompt builders for the extraction and synthesis oracle calls.
//!
//! Both builders are pure: the same session state always yields the same
//! prompt text.

use std::fmt::Write;

use super::{DocumentType, StructuredFields, Turn};

/// Placeholder used when the business name was never collected.
pub const DEFAULT_BUSINESS_NAME: &str = "Your Business";
pub const DEFAULT_WEBSITE: &str = "your-website.com";
pub const DEFAULT_CONTACT_EMAIL: &str = "contact@your-business.com";
pub const DEFAULT_JURISDICTION: &str = "United States";

/// Builds the conversational extraction prompt.
///
/// `history` is the conversation before the latest user message.
pub fn extraction_prompt(
    document_type: DocumentType,
    history: &[Turn],
    latest_user_message: &str,
    current_fields: &StructuredFields,
) -> String {
    let display = document_type.display_name();
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a helpful AI assistant helping create {} documents. Be conversational and friendly.",
        display
    );
    prompt.push('\n');

    prompt.push_str("Current conversation:");
    if !history.is_empty() {
        prompt.push_str("\nConversation history:");
        for turn in history {
            let _ = write!(prompt, "\n{}: {}", turn.role.as_str(), turn.content);
        }
    }
    prompt.push('\n');

    prompt.push_str("Business info collected so far:");
    if !current_fields.is_empty() {
        prompt.push_str("\nCurrent business information collected:");
        for (key, value) in current_fields.iter() {
            let rendered = current_fields
                .display_value(key)
                .unwrap_or_else(|| value.to_string());
            let _ = write!(prompt, "\n- {}: {}", key, rendered);
        }
    }
    prompt.push_str("\n\n");

    let _ = writeln!(prompt, "User just said: \"{}\"", latest_user_message);
    prompt.push('\n');

    let _ = writeln!(
        prompt,
        "Respond naturally and helpfully. If they gave you business information, acknowledge it. \
         If you need more details for the {}, ask friendly questions.",
        display
    );
    prompt.push('\n');

    let _ = writeln!(prompt, "For {}, you typically need:", display);
    for field in document_type.required_fields() {
        let _ = writeln!(prompt, "- {} ({})", field.label, field.key);
    }
    prompt.push('\n');

    prompt.push_str(
        "Reply with a single JSON object and nothing else, using exactly these keys:\n\
         {\"replyText\": string, \"extractedFields\": object, \"isCompleted\": boolean}\n\
         - replyText: your message to the user.\n\
         - extractedFields: only business details newly stated in the user's latest message, \
         keyed by the field names in parentheses above.\n\
         - isCompleted: true only when every field listed above has been collected.",
    );

    prompt
}

/// Deterministic document title, e.g. `Privacy Policy - Acme Corp`.
pub fn document_title(document_type: DocumentType, fields: &StructuredFields) -> String {
    let name = fields
        .display_value("businessName")
        .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());
    format!("{} - {}", document_type.title_prefix(), name)
}

/// Sections every generated document of this type must contain.
pub fn required_sections(document_type: DocumentType) -> &'static [&'static str] {
    match document_type {
        DocumentType::PrivacyPolicy => &[
            "Include all standard privacy policy sections",
            "Make it GDPR compliant with proper legal basis for processing",
            "Include CCPA compliance where applicable",
            "Add clear data subject rights section",
            "Include cookie policy information",
            "Add a third-party data sharing section",
            "Include data retention and security measures",
            "Add contact information for privacy inquiries",
            "Add a notice describing how policy updates are communicated",
            "Use professional legal language but keep it understandable",
            "Include effective date as today's date",
            "Add proper legal disclaimers",
        ],
        DocumentType::TermsOfService => &[
            "Include acceptance of terms section",
            "Add description of services",
            "Include user account and registration terms",
            "Add payment and billing terms",
            "Include refund and cancellation policy",
            "Add prohibited uses section",
            "Include intellectual property rights",
            "Add limitation of liability",
            "Include termination clause",
            "Add dispute resolution and governing law",
            "Include modification of terms",
            "Add contact information",
            "Use professional legal language",
        ],
        DocumentType::CookieConsent => &[
            "Generate a complete cookie policy document",
            "Include cookie categories and purposes",
            "Add information about specific cookies used",
            "Include user rights regarding cookies",
            "Add contact information",
            "Create cookie banner text for website",
            "Include granular consent options if requested",
            "Ensure GDPR Article 7 compliance",
            "Add instructions for managing cookie preferences",
            "Include legal basis for cookie processing",
        ],
    }
}

/// One labelled line of the synthesis prompt with its fallback literal.
struct PromptLine {
    label: &'static str,
    key: &'static str,
    default: &'static str,
}

const fn line(label: &'static str, key: &'static str, default: &'static str) -> PromptLine {
    PromptLine { label, key, default }
}

const PRIVACY_DATA_LINES: &[PromptLine] = &[
    line("Collects Personal Data", "collectsPersonalData", "Yes"),
    line(
        "Data Types Collected",
        "dataTypes",
        "Email addresses, names, contact information",
    ),
    line("Uses Analytics", "usesAnalytics", "Yes"),
    line("Uses Cookies", "usesCookies", "Yes"),
    line("Shares Data with Third Parties", "sharesDataWithThirdParties", "No"),
];

const TERMS_SERVICE_LINES: &[PromptLine] = &[
    line("Has User Accounts", "hasUserAccounts", "Yes"),
    line("Product Type", "productType", "Digital services"),
    line("Payment Method", "paymentMethod", "Credit card"),
    line("Refund Policy", "refundPolicy", "Standard refund policy applies"),
    line("User Rules", "userRules", "Standard acceptable use policy"),
];

const COOKIE_USAGE_LINES: &[PromptLine] = &[
    line("Cookie Types", "cookieTypes", "Essential, Analytics, Marketing"),
    line("Uses Analytics", "usesAnalytics", "Yes"),
    line("Uses Advertising", "usesAdvertising", "No"),
    line("Uses Social Media", "usesSocialMedia", "No"),
    line("Consent Type", "consentType", "Granular consent options"),
];

/// Builds the document synthesis prompt, substituting literal placeholders
/// for every field that was never collected.
pub fn synthesis_prompt(document_type: DocumentType, fields: &StructuredFields) -> String {
    let value = |key: &str, default: &str| -> String {
        fields
            .display_value(key)
            .unwrap_or_else(|| default.to_string())
    };

    let business_name = value("businessName", DEFAULT_BUSINESS_NAME);
    let website = value("website", DEFAULT_WEBSITE);
    let contact_email = value("contactEmail", DEFAULT_CONTACT_EMAIL);
    let jurisdiction = value("jurisdiction", DEFAULT_JURISDICTION);
    let business_type = value("businessType", "General business");

    let mut prompt = String::new();

    let (opening, detail_heading, detail_lines, closing) = match document_type {
        DocumentType::PrivacyPolicy => (
            format!(
                "Generate a comprehensive Privacy Policy for {}. Use the following business information:",
                business_name
            ),
            "DATA COLLECTION",
            PRIVACY_DATA_LINES,
            "Generate a complete, professional privacy policy document that covers all these requirements.",
        ),
        DocumentType::TermsOfService => (
            format!(
                "Generate comprehensive Terms of Service for {}. Use the following business information:",
                business_name
            ),
            "SERVICE DETAILS",
            TERMS_SERVICE_LINES,
            "Generate a complete, professional terms of service document.",
        ),
        DocumentType::CookieConsent => (
            format!(
                "Generate a Cookie Policy and consent banner configuration for {}. Use the following information:",
                business_name
            ),
            "COOKIE USAGE",
            COOKIE_USAGE_LINES,
            "Generate both a detailed cookie policy document AND suggested cookie banner implementation text.",
        ),
    };

    let _ = writeln!(prompt, "{}\n", opening);
    prompt.push_str("BUSINESS DETAILS:\n");
    let _ = writeln!(prompt, "- Business Name: {}", business_name);
    let _ = writeln!(prompt, "- Website: {}", website);
    if document_type != DocumentType::CookieConsent {
        let _ = writeln!(prompt, "- Business Type: {}", business_type);
        let _ = writeln!(prompt, "- Contact Email: {}", contact_email);
    }
    let _ = writeln!(prompt, "- Jurisdiction: {}\n", jurisdiction);

    let _ = writeln!(prompt, "{}:", detail_heading);
    for l in detail_lines {
        let _ = writeln!(prompt, "- {}: {}", l.label, value(l.key, l.default));
    }
    prompt.push('\n');

    let known: Vec<&String> = fields
        .keys()
        .filter(|k| !is_prompted_key(document_type, k))
        .collect();
    if !known.is_empty() {
        prompt.push_str("ADDITIONAL DETAILS:\n");
        for key in known {
            if let Some(rendered) = fields.display_value(key) {
                let _ = writeln!(prompt, "- {}: {}", key, rendered);
            }
        }
        prompt.push('\n');
    }

    prompt.push_str("REQUIREMENTS:\n");
    let sections = required_sections(document_type);
    for (i, section) in sections.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, section);
    }
    let _ = writeln!(
        prompt,
        "{}. Ensure compliance with {} laws\n",
        sections.len() + 1,
        jurisdiction
    );

    prompt.push_str(closing);
    prompt
}

fn is_prompted_key(document_type: DocumentType, key: &str) -> bool {
    const COMMON: &[&str] = &[
        "businessName",
        "website",
        "contactEmail",
        "jurisdiction",
        "businessType",
    ];
    let detail_lines = match document_type {
        DocumentType::PrivacyPolicy => PRIVACY_DATA_LINES,
        DocumentType::TermsOfService => TERMS_SERVICE_LINES,
        DocumentType::CookieConsent => COOKIE_USAGE_LINES,
    };
    COMMON.contains(&key) || detail_lines.iter().any(|l| l.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::TurnRole;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> StructuredFields {
        StructuredFields::from_value(value)
    }

    #[test]
    fn extraction_prompt_embeds_history_fields_message_and_checklist() {
        let history = vec![Turn::at(TurnRole::Assistant, "Hi there", 1)];
        let current = fields(json!({"businessName": "Acme Corp"}));

        let prompt = extraction_prompt(
            DocumentType::PrivacyPolicy,
            &history,
            "our site is acme.com",
            &current,
        );

        assert!(prompt.contains("privacy policy documents"));
        assert!(prompt.contains("assistant: Hi there"));
        assert!(prompt.contains("- businessName: Acme Corp"));
        assert!(prompt.contains("User just said: \"our site is acme.com\""));
        assert!(prompt.contains("Contact email (contactEmail)"));
        assert!(prompt.contains("\"replyText\""));
    }

    #[test]
    fn extraction_prompt_is_deterministic() {
        let current = fields(json!({"website": "acme.com"}));
        let a = extraction_prompt(DocumentType::CookieConsent, &[], "hi", &current);
        let b = extraction_prompt(DocumentType::CookieConsent, &[], "hi", &current);
        assert_eq!(a, b);
    }

    #[test]
    fn title_uses_business_name_or_placeholder() {
        assert_eq!(
            document_title(
                DocumentType::TermsOfService,
                &fields(json!({"businessName": "Acme Corp"}))
            ),
            "Terms of Service - Acme Corp"
        );
        assert_eq!(
            document_title(DocumentType::CookieConsent, &StructuredFields::new()),
            "Cookie Policy - Your Business"
        );
    }

    #[test]
    fn synthesis_prompt_fills_placeholders_for_empty_profile() {
        let prompt = synthesis_prompt(DocumentType::PrivacyPolicy, &StructuredFields::new());
        assert!(prompt.contains("Privacy Policy for Your Business"));
        assert!(prompt.contains("- Website: your-website.com"));
        assert!(prompt.contains("- Contact Email: contact@your-business.com"));
        assert!(prompt.contains("- Jurisdiction: United States"));
        assert!(prompt.contains("Ensure compliance with United States laws"));
    }

    #[test]
    fn synthesis_prompt_uses_collected_values_and_lists_extra_keys() {
        let profile = fields(json!({
            "businessName": "Acme Corp",
            "jurisdiction": "Germany",
            "usesCookies": false,
            "industry": "Retail"
        }));
        let prompt = synthesis_prompt(DocumentType::PrivacyPolicy, &profile);
        assert!(prompt.contains("- Business Name: Acme Corp"));
        assert!(prompt.contains("- Uses Cookies: No"));
        assert!(prompt.contains("- industry: Retail"));
        assert!(prompt.contains("Ensure compliance with Germany laws"));
    }

    #[test]
    fn each_type_has_its_own_section_checklist() {
        let privacy = synthesis_prompt(DocumentType::PrivacyPolicy, &StructuredFields::new());
        assert!(privacy.contains("third-party data sharing"));
        assert!(privacy.contains("data retention and security"));
        assert!(privacy.contains("policy updates are communicated"));
        assert!(privacy.contains("cookie policy information"));

        let terms = synthesis_prompt(DocumentType::TermsOfService, &StructuredFields::new());
        assert!(terms.contains("Include termination clause"));

        let cookie = synthesis_prompt(DocumentType::CookieConsent, &StructuredFields::new());
        assert!(cookie.contains("Create cookie banner text for website"));
        assert!(!cookie.contains("Contact Email"));
    }
}
