//! Parsing of extraction oracle output, structured or not.
//!
//! The oracle is asked for a JSON object but may answer in prose. Parsing
//! yields a tagged [`OracleReply`]: a strict decode, or a prose fallback that
//! can never declare completion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::StructuredFields;

/// Upper bound on fields the prose heuristics may populate.
const MAX_HEURISTIC_FIELDS: usize = 2;

static BUSINESS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)business name[: \t]*([\w \t]+)").expect("valid businessName pattern")
});

static WEBSITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)website[:\s]*(\S+)").expect("valid website pattern"));

static CONTACT_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)contact email[:\s]*(\S+@\S+)").expect("valid contactEmail pattern")
});

/// Where a conversational reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Oracle output decoded as the structured payload.
    Structured,
    /// Oracle answered in prose; heuristics applied, completion forced false.
    Malformed,
    /// Oracle call failed; fixed fallback reply.
    Unavailable,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Structured => "structured",
            ReplySource::Malformed => "malformed",
            ReplySource::Unavailable => "unavailable",
        }
    }
}

/// Result of parsing one raw oracle response.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleReply {
    Structured {
        reply_text: String,
        extracted_fields: StructuredFields,
        is_completed: bool,
    },
    Prose {
        reply_text: String,
        extracted_fields: StructuredFields,
    },
}

impl OracleReply {
    /// Strict decode first, prose fallback second. Never fails.
    pub fn parse(raw: &str) -> Self {
        match decode_structured(raw) {
            Some(payload) => OracleReply::Structured {
                reply_text: payload.reply_text.unwrap_or_default(),
                extracted_fields: payload
                    .extracted_fields
                    .map(StructuredFields::from_value)
                    .unwrap_or_default(),
                is_completed: matches!(payload.is_completed, Some(Value::Bool(true))),
            },
            None => OracleReply::Prose {
                reply_text: raw.to_string(),
                extracted_fields: scan_labelled_fields(raw),
            },
        }
    }

    pub fn source(&self) -> ReplySource {
        match self {
            OracleReply::Structured { .. } => ReplySource::Structured,
            OracleReply::Prose { .. } => ReplySource::Malformed,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            OracleReply::Structured { is_completed, .. } => *is_completed,
            OracleReply::Prose { .. } => false,
        }
    }

    /// Splits into `(reply_text, extracted_fields, is_completed)`.
    pub fn into_parts(self) -> (String, StructuredFields, bool) {
        match self {
            OracleReply::Structured {
                reply_text,
                extracted_fields,
                is_completed,
            } => (reply_text, extracted_fields, is_completed),
            OracleReply::Prose {
                reply_text,
                extracted_fields,
            } => (reply_text, extracted_fields, false),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyPayload {
    #[serde(rename = "replyText", alias = "response")]
    reply_text: Option<String>,
    #[serde(rename = "extractedFields", alias = "extractedInfo")]
    extracted_fields: Option<Value>,
    #[serde(rename = "isCompleted")]
    is_completed: Option<Value>,
}

fn decode_structured(raw: &str) -> Option<ReplyPayload> {
    let body = strip_single_fence(raw.trim());
    serde_json::from_str::<ReplyPayload>(body).ok()
}

/// Unwraps a response that is exactly one fenced code block.
fn strip_single_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    if inner.contains("```") {
        return text;
    }
    // Drop the info string (`json`) on the opening line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

fn scan_labelled_fields(text: &str) -> StructuredFields {
    let patterns: [(&str, &Lazy<Regex>); 3] = [
        ("businessName", &BUSINESS_NAME),
        ("website", &WEBSITE),
        ("contactEmail", &CONTACT_EMAIL),
    ];

    let mut fields = StructuredFields::new();
    for (key, pattern) in patterns {
        if fields.len() >= MAX_HEURISTIC_FIELDS {
            break;
        }
        let captured = pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| clean_capture(m.as_str()));
        if let Some(value) = captured.filter(|v| !v.is_empty()) {
            fields.insert(key, value);
        }
    }
    fields
}

fn clean_capture(value: &str) -> String {
    value
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')' | '!' | '?'))
        .to_string()
}
