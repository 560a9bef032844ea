//! Combination search over one-class-per-subject choices.
//!
//! Enumerates the Cartesian product of candidate classes with depth-first
//! backtracking, pruning any branch whose accumulated weighted overlap
//! exceeds a global budget, then ranks the surviving combinations and lets
//! the caller cycle through alternatives by index.
//!
//! # Determinism
//!
//! For identical inputs the search returns identical plans: candidates are
//! enumerated in catalog order and ranking uses a stable sort, so ties keep
//! that order.
//!
//! # Bounds
//!
//! The search is pure, synchronous and CPU-bound. Two mechanisms keep a
//! pathological catalog from blocking its worker forever: a node budget
//! ([`SearchOptions::with_node_budget`]) and a cooperative [`CancelToken`],
//! both observed inside the backtracking loop. Callers running searches on
//! background workers must serialize them or tag each request with a
//! monotonically increasing id and keep only the latest response.
//!
//! # Reference
//!
//! - Knuth (2015), "The Art of Computer Programming", Vol. 4, Fasc. 5:
//!   backtrack programming

mod search;

pub use search::{search_best_combination, Pick, Plan};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::Shift;

/// Default weighted-overlap budget, in session-weeks.
pub const DEFAULT_OVERLAP_BUDGET: u64 = 12;

/// Default node budget, in candidate evaluations.
pub const DEFAULT_NODE_BUDGET: u64 = 2_000_000;

/// What the caller wants minimized or preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preference {
    /// Minimize overlap only.
    #[default]
    NonOverlap,
    /// Minimize overlap, prefer morning sessions among ties.
    Morning,
    /// Minimize overlap, prefer afternoon sessions among ties.
    Afternoon,
    /// Minimize overlap, prefer evening sessions among ties.
    Evening,
}

impl Preference {
    /// The preferred shift band, if any.
    pub fn shift(self) -> Option<Shift> {
        match self {
            Preference::NonOverlap => None,
            Preference::Morning => Some(Shift::Morning),
            Preference::Afternoon => Some(Shift::Afternoon),
            Preference::Evening => Some(Shift::Evening),
        }
    }
}

/// Cooperative cancellation handle.
///
/// Clone it, hand one clone to the worker running the search, keep the
/// other; [`cancel`](CancelToken::cancel) makes the search stop at the next
/// loop iteration and return best-so-far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Search tuning knobs.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum accumulated weighted overlap a combination may carry.
    /// Branches exceeding it are pruned.
    pub overlap_budget: u64,
    /// Maximum candidate evaluations before the search stops with
    /// best-so-far.
    pub node_budget: u64,
    /// Cooperative cancellation handle.
    pub cancel: CancelToken,
}

impl SearchOptions {
    /// Creates options with the default budgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the overlap budget.
    pub fn with_overlap_budget(mut self, budget: u64) -> Self {
        self.overlap_budget = budget;
        self
    }

    /// Sets the node budget.
    pub fn with_node_budget(mut self, budget: u64) -> Self {
        self.node_budget = budget;
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            overlap_budget: DEFAULT_OVERLAP_BUDGET,
            node_budget: DEFAULT_NODE_BUDGET,
            cancel: CancelToken::new(),
        }
    }
}
