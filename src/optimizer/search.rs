//! Pruned depth-first combination search.
//!
//! # Algorithm
//!
//! 1. For each selected subject, list its candidate classes in catalog
//!    order and precompute each class's time grid and shift total.
//! 2. Walk the subjects depth-first, trying every candidate at the current
//!    depth. The incremental overlap of a candidate is its score against
//!    every class already on the path; a branch whose running total exceeds
//!    the overlap budget is pruned, so the budget is global, not per-pair.
//! 3. Record every full-depth combination, then stable-sort by
//!    `(total overlap ascending, shift score descending)` and return the
//!    combination at `auto_th % count` — incrementing `auto_th` cycles
//!    through alternatives and wraps back to the best one.
//!
//! The recursion carries an explicit path buffer; completed combinations go
//! to a separate accumulator. Node budget and cancellation are checked at
//! every candidate, and a truncated search still returns best-so-far.
//!
//! # Complexity
//! O(Π candidates) worst case, bounded in practice by pruning and the node
//! budget. Each node pays O(depth) overlap evaluations.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{Preference, SearchOptions};
use crate::error::PlanError;
use crate::grid::{build_time_grid, overlap_score, shift_sessions, TimeGridEntry};
use crate::models::Calendar;
use crate::validation::{validate_calendar, validate_selected};

/// One chosen class within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Major code.
    pub major: String,
    /// Subject name.
    pub subject: String,
    /// Chosen class code.
    pub class_code: String,
}

/// A ranked one-class-per-subject assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// One pick per selected subject, in selection order.
    pub picks: Vec<Pick>,
    /// Weighted overlap of the combination, in session-weeks.
    pub conflicted_sessions: u64,
    /// Weighted sessions inside the preferred shift (0 without a shift
    /// preference).
    pub shift_score: u64,
    /// Number of feasible combinations the search recorded; `auto_th`
    /// cycles modulo this.
    pub alternatives: usize,
    /// Whether the search stopped early (node budget or cancellation) and
    /// ranked only what it had found so far.
    pub truncated: bool,
}

/// A candidate class with its precomputed grid.
struct Candidate {
    class_code: String,
    grid: Vec<TimeGridEntry>,
    shift_total: u64,
}

/// All candidates of one selected subject, in catalog order.
struct SubjectCandidates {
    major: String,
    subject: String,
    classes: Vec<Candidate>,
}

/// A completed combination: one candidate index per subject.
struct Combination {
    choices: Vec<usize>,
    overlap: u64,
    shift_score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Budget,
    Cancelled,
}

struct Search<'a> {
    subjects: &'a [SubjectCandidates],
    options: &'a SearchOptions,
    visited: u64,
    stop: Option<Stop>,
    path: Vec<usize>,
    found: Vec<Combination>,
}

impl<'a> Search<'a> {
    fn descend(&mut self, depth: usize, overlap: u64) {
        let subjects: &'a [SubjectCandidates] = self.subjects;

        if depth == subjects.len() {
            let shift_score = self
                .path
                .iter()
                .enumerate()
                .map(|(d, &choice)| subjects[d].classes[choice].shift_total)
                .sum();
            trace!(
                "combination {:?} overlap={overlap} shift={shift_score}",
                self.path
            );
            self.found.push(Combination {
                choices: self.path.clone(),
                overlap,
                shift_score,
            });
            return;
        }

        for (idx, candidate) in subjects[depth].classes.iter().enumerate() {
            if self.stop.is_some() {
                return;
            }
            if self.options.cancel.is_cancelled() {
                self.stop = Some(Stop::Cancelled);
                return;
            }
            if self.visited >= self.options.node_budget {
                self.stop = Some(Stop::Budget);
                return;
            }
            self.visited += 1;

            let mut total = overlap;
            for (d, &chosen) in self.path.iter().enumerate() {
                total += overlap_score(&subjects[d].classes[chosen].grid, &candidate.grid);
            }
            if total > self.options.overlap_budget {
                continue;
            }

            self.path.push(idx);
            self.descend(depth + 1, total);
            self.path.pop();
        }
    }
}

/// Searches for the best one-class-per-subject combination.
///
/// Returns the combination ranked at `auto_th % alternatives`; passing
/// `auto_th + 1` on the next call retrieves the next alternative, wrapping
/// around after the last one. An empty `selected` list yields the empty
/// plan. Pure and deterministic for identical inputs.
///
/// # Errors
/// - [`PlanError::InvalidInput`] — catalog or selection fails validation.
/// - [`PlanError::NoCandidates`] — a selected subject offers no classes.
/// - [`PlanError::NoFeasibleCombination`] — every combination exceeded the
///   overlap budget.
/// - [`PlanError::BudgetExhausted`] / [`PlanError::Cancelled`] — the search
///   stopped early before completing any combination. If at least one was
///   completed, the plan is returned with `truncated` set instead.
///
/// # Example
///
/// ```
/// use section_planner::models::{Calendar, ClassData, ScheduleEntry};
/// use section_planner::optimizer::{search_best_combination, Preference, SearchOptions};
///
/// let calendar = Calendar::new("2024-1", 240902, 241229)
///     .with_class("SE", "Algorithms", "ALG01",
///         ClassData::new("Dr. Chen")
///             .with_schedule(ScheduleEntry::new(240902, 241110, 1, 1, 3)));
/// let selected = vec![("SE".to_string(), "Algorithms".to_string())];
///
/// let plan = search_best_combination(
///     &calendar, &selected, Preference::NonOverlap, 0, &SearchOptions::default(),
/// ).unwrap();
/// assert_eq!(plan.picks[0].class_code, "ALG01");
/// assert_eq!(plan.alternatives, 1);
/// ```
pub fn search_best_combination(
    calendar: &Calendar,
    selected: &[(String, String)],
    preference: Preference,
    auto_th: usize,
    options: &SearchOptions,
) -> Result<Plan, PlanError> {
    if selected.is_empty() {
        return Ok(Plan::default());
    }

    validate_calendar(calendar).map_err(PlanError::InvalidInput)?;
    validate_selected(calendar, selected).map_err(PlanError::InvalidInput)?;

    let shift = preference.shift();
    let mut subjects = Vec::with_capacity(selected.len());
    for (major, subject) in selected {
        // The lookup itself cannot miss (selection validated above), but an
        // existing subject may still offer zero classes.
        let classes = calendar
            .classes(major, subject)
            .filter(|classes| !classes.is_empty())
            .ok_or_else(|| PlanError::NoCandidates {
                major: major.clone(),
                subject: subject.clone(),
            })?;
        let candidates = classes
            .iter()
            .map(|(code, class)| {
                let grid = build_time_grid(&class.schedules);
                let shift_total = shift.map_or(0, |s| shift_sessions(&grid, s));
                Candidate {
                    class_code: code.clone(),
                    grid,
                    shift_total,
                }
            })
            .collect();
        subjects.push(SubjectCandidates {
            major: major.clone(),
            subject: subject.clone(),
            classes: candidates,
        });
    }

    debug!(
        "searching {} subjects, {} candidate classes, overlap budget {}",
        subjects.len(),
        subjects.iter().map(|s| s.classes.len()).sum::<usize>(),
        options.overlap_budget
    );

    let mut search = Search {
        subjects: &subjects,
        options,
        visited: 0,
        stop: None,
        path: Vec::with_capacity(subjects.len()),
        found: Vec::new(),
    };
    search.descend(0, 0);

    let Search {
        visited,
        stop,
        mut found,
        ..
    } = search;

    debug!(
        "search visited {visited} nodes, found {} combinations{}",
        found.len(),
        if stop.is_some() { " (truncated)" } else { "" }
    );

    if found.is_empty() {
        return Err(match stop {
            Some(Stop::Budget) => PlanError::BudgetExhausted { visited },
            Some(Stop::Cancelled) => PlanError::Cancelled,
            None => PlanError::NoFeasibleCombination,
        });
    }

    // Stable sort keeps catalog enumeration order among full ties.
    found.sort_by(|a, b| {
        a.overlap
            .cmp(&b.overlap)
            .then(b.shift_score.cmp(&a.shift_score))
    });

    let combination = &found[auto_th % found.len()];
    let picks = combination
        .choices
        .iter()
        .zip(&subjects)
        .map(|(&choice, subject)| Pick {
            major: subject.major.clone(),
            subject: subject.subject.clone(),
            class_code: subject.classes[choice].class_code.clone(),
        })
        .collect();

    Ok(Plan {
        picks,
        conflicted_sessions: combination.overlap,
        shift_score: combination.shift_score,
        alternatives: found.len(),
        truncated: stop.is_some(),
    })
}
