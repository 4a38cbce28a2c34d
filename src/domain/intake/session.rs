//! IntakeSession aggregate - one document-intake conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, StateMachine, Timestamp};

use super::{DocumentType, StructuredFields, Turn, TurnRole};

/// Conversation phase derived from the completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakePhase {
    /// Accepting user messages.
    Collecting,
    /// Oracle declared the profile complete; only synthesis remains.
    Completed,
}

impl StateMachine for IntakePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use IntakePhase::*;
        matches!((self, target), (Collecting, Collecting) | (Collecting, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use IntakePhase::*;
        match self {
            Collecting => vec![Collecting, Completed],
            Completed => vec![],
        }
    }
}

/// Partial update applied by a store's `merge`.
///
/// `messages` replaces the whole sequence, `structured_fields` is unioned
/// into the existing map, and `is_completed` can only raise the flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub messages: Option<Vec<Turn>>,
    pub structured_fields: Option<StructuredFields>,
    pub is_completed: Option<bool>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(mut self, messages: Vec<Turn>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn with_structured_fields(mut self, fields: StructuredFields) -> Self {
        self.structured_fields = Some(fields);
        self
    }

    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = Some(is_completed);
        self
    }
}

/// One intake conversation and the business profile extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSession {
    pub id: SessionId,
    pub document_type: DocumentType,
    pub messages: Vec<Turn>,
    pub structured_fields: StructuredFields,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IntakeSession {
    /// Creates a fresh session seeded with the greeting for `document_type`.
    pub fn start(document_type: DocumentType) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            document_type,
            messages: vec![Turn::at(
                TurnRole::Assistant,
                document_type.greeting(),
                now.as_unix_millis(),
            )],
            structured_fields: StructuredFields::new(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a session from persisted parts.
    pub fn reconstitute(
        id: SessionId,
        document_type: DocumentType,
        messages: Vec<Turn>,
        structured_fields: StructuredFields,
        is_completed: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            document_type,
            messages,
            structured_fields,
            is_completed,
            created_at,
            updated_at,
        }
    }

    pub fn phase(&self) -> IntakePhase {
        if self.is_completed {
            IntakePhase::Completed
        } else {
            IntakePhase::Collecting
        }
    }

    /// Fails with `AlreadyCompleted` once the oracle has declared completion.
    pub fn ensure_collecting(&self) -> Result<(), DomainError> {
        match self.phase() {
            IntakePhase::Collecting => Ok(()),
            IntakePhase::Completed => Err(DomainError::new(
                ErrorCode::AlreadyCompleted,
                "Conversation is already complete; generate the document instead",
            )
            .with_detail("session_id", self.id.to_string())),
        }
    }

    /// Timestamp for the next turn: now, but never earlier than the last turn.
    pub fn next_turn_millis(&self) -> i64 {
        let now = Timestamp::now().as_unix_millis();
        self.messages
            .last()
            .map_or(now, |last| now.max(last.timestamp))
    }

    /// Builds the patch for one completed user/assistant exchange.
    ///
    /// The returned messages are the current history followed by the user
    /// turn and the assistant reply.
    pub fn exchange(
        &self,
        user_message: &str,
        reply_text: &str,
        extracted_fields: StructuredFields,
        is_completed: bool,
    ) -> SessionPatch {
        let at = self.next_turn_millis();
        let mut messages = self.messages.clone();
        messages.push(Turn::at(TurnRole::User, user_message, at));
        messages.push(Turn::at(TurnRole::Assistant, reply_text, at));

        SessionPatch::new()
            .with_messages(messages)
            .with_structured_fields(extracted_fields)
            .with_completed(is_completed)
    }

    /// Applies a patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
        if let Some(fields) = patch.structured_fields {
            self.structured_fields.merge(&fields);
        }
        if patch.is_completed == Some(true) {
            self.is_completed = true;
        }
        self.touch();
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        if self.updated_at.is_before(&now) {
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> StructuredFields {
        StructuredFields::from_value(value)
    }

    #[test]
    fn start_seeds_exactly_one_greeting() {
        let session = IntakeSession::start(DocumentType::PrivacyPolicy);
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, TurnRole::Assistant);
        assert_eq!(
            session.messages[0].content,
            DocumentType::PrivacyPolicy.greeting()
        );
        assert!(session.structured_fields.is_empty());
        assert!(!session.is_completed);
        assert_eq!(session.phase(), IntakePhase::Collecting);
    }

    #[test]
    fn apply_replaces_messages_and_unions_fields() {
        let mut session = IntakeSession::start(DocumentType::CookieConsent);
        session.structured_fields = fields(json!({"a": 1, "b": 2}));

        let patch = session.exchange("hi", "hello", fields(json!({"b": 3, "c": 4})), false);
        session.apply(patch);

        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.structured_fields, fields(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[test]
    fn completion_never_reverts() {
        let mut session = IntakeSession::start(DocumentType::TermsOfService);
        session.apply(SessionPatch::new().with_completed(true));
        assert!(session.is_completed);

        session.apply(SessionPatch::new().with_completed(false));
        assert!(session.is_completed);
    }

    #[test]
    fn ensure_collecting_rejects_completed_session() {
        let mut session = IntakeSession::start(DocumentType::PrivacyPolicy);
        assert!(session.ensure_collecting().is_ok());

        session.is_completed = true;
        let err = session.ensure_collecting().unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyCompleted);
    }

    #[test]
    fn phase_transitions_are_forward_only() {
        assert!(IntakePhase::Collecting.can_transition_to(&IntakePhase::Completed));
        assert!(!IntakePhase::Completed.can_transition_to(&IntakePhase::Collecting));
        assert!(IntakePhase::Completed.is_terminal());
    }

    #[test]
    fn turn_timestamps_do_not_go_backwards() {
        let mut session = IntakeSession::start(DocumentType::PrivacyPolicy);
        let future = Timestamp::now().as_unix_millis() + 60_000;
        session.messages[0].timestamp = future;

        let patch = session.exchange("hi", "hello", StructuredFields::new(), false);
        let messages = patch.messages.unwrap();
        assert!(messages.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    proptest! {
        #[test]
        fn exchanges_keep_one_plus_two_n_alternating_turns(
            replies in proptest::collection::vec(".{0,20}", 0..12)
        ) {
            let mut session = IntakeSession::start(DocumentType::PrivacyPolicy);
            for (i, reply) in replies.iter().enumerate() {
                let patch = session.exchange(&format!("message {}", i), reply, StructuredFields::new(), false);
                session.apply(patch);
            }

            prop_assert_eq!(session.messages.len(), 1 + 2 * replies.len());
            for (i, turn) in session.messages.iter().enumerate() {
                let expected = if i % 2 == 0 { TurnRole::Assistant } else { TurnRole::User };
                prop_assert_eq!(turn.role, expected);
            }
        }
    }
}
