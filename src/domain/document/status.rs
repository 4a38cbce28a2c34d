//! Document status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a generated legal document.
///
/// Progression is strictly forward:
/// `Draft -> Generated -> Downloaded -> Purchased`, with `Generated` also
/// able to jump straight to `Purchased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Not produced by this service. Accepted when loading rows written by
    /// other tools so that the stored tag set stays closed.
    Draft,

    /// Synthesis succeeded. Every stored document starts here.
    Generated,

    /// The client fetched the document for download.
    Downloaded,

    /// Payment captured by the external checkout flow.
    Purchased,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Generated => "generated",
            DocumentStatus::Downloaded => "downloaded",
            DocumentStatus::Purchased => "purchased",
        }
    }

    /// Parses the stored tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "draft" => Some(DocumentStatus::Draft),
            "generated" => Some(DocumentStatus::Generated),
            "downloaded" => Some(DocumentStatus::Downloaded),
            "purchased" => Some(DocumentStatus::Purchased),
            _ => None,
        }
    }

    /// True once the document has been delivered in some form.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DocumentStatus::Downloaded | DocumentStatus::Purchased)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for DocumentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, target),
            (Draft, Generated)
                | (Generated, Downloaded)
                | (Generated, Purchased)
                | (Downloaded, Purchased)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DocumentStatus::*;
        match self {
            Draft => vec![Generated],
            Generated => vec![Downloaded, Purchased],
            Downloaded => vec![Purchased],
            Purchased => vec![],
        }
    }
}
