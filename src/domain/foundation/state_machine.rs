//! State machine trait for lifecycle enums.
//!
//! Session completion and document status both move strictly forward; this
//! trait gives them a single validated transition entry point.

use super::ValidationError;

/// Lifecycle enum with an explicit forward-only transition table.
///
/// ```ignore
/// let next = DocumentStatus::Generated.transition_to(DocumentStatus::Downloaded)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// All states reachable in one step from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Validated transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// No outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
