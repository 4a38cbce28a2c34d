//! UUID-backed identifiers.
//!
//! Both serialize as the bare hyphenated UUID string and parse back from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random (v4) id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// An intake conversation.
    SessionId
);

uuid_id!(
    /// A generated legal document.
    DocumentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(SessionId::new(), SessionId::new());
        assert_ne!(DocumentId::new(), DocumentId::new());
    }

    #[test]
    fn display_output_parses_back() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
    }

    #[test]
    fn non_uuid_text_is_rejected() {
        assert!("not-a-uuid".parse::<SessionId>().is_err());
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn serializes_as_bare_string() {
        let uuid = Uuid::new_v4();
        let id = DocumentId::from_uuid(uuid);

        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(uuid.to_string()));
        assert_eq!(id.as_uuid(), &uuid);
    }
}
