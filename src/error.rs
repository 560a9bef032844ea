//! Typed planner errors.
//!
//! Every failure the planner can surface is a [`PlanError`] variant: bad
//! input, an empty (but meaningful) result, or an interrupted search. The
//! layout builder has no error type at all — conflicting placements are
//! data, not failures.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors surfaced by the planner.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The catalog or the selection violates a model invariant.
    #[error("input failed validation: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A selected subject exists but offers no classes, so no combination
    /// can include it. The request fails rather than silently dropping the
    /// subject.
    #[error("subject '{subject}' under '{major}' has no classes in the catalog")]
    NoCandidates {
        /// Major code of the empty subject.
        major: String,
        /// Subject name.
        subject: String,
    },

    /// Every full combination exceeded the overlap budget.
    #[error("no combination stays within the overlap budget")]
    NoFeasibleCombination,

    /// The node budget ran out before any complete combination was found.
    #[error("search budget exhausted after {visited} candidate evaluations")]
    BudgetExhausted {
        /// Candidate evaluations performed before stopping.
        visited: u64,
    },

    /// The cancellation token fired before any complete combination was
    /// found.
    #[error("search cancelled before any complete combination was found")]
    Cancelled,
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
