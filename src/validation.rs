//! Input validation for the planner boundary.
//!
//! Ingestion is contractually required to produce a catalog satisfying the
//! model invariants; the planner still checks them defensively before
//! searching, because malformed input would otherwise yield undefined
//! results rather than a reportable failure. Detects:
//! - Malformed compact dates
//! - Inverted date ranges and entries outside `[min_date, max_date]`
//! - Inverted or out-of-range session ranges
//! - Out-of-range weekdays
//! - Selected subjects that do not exist in the catalog

use crate::models::{to_naive_date, Calendar, ScheduleEntry, SESSIONS_PER_DAY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A compact date's digits do not form a real calendar date.
    MalformedDate,
    /// An entry's `start_date` is after its `end_date`, or the calendar's
    /// `min_date` is after its `max_date`.
    InvertedDateRange,
    /// An entry's dates fall outside `[min_date, max_date]`.
    DateOutOfBounds,
    /// `start_session > end_session`, or a session outside the daily range.
    InvalidSessionRange,
    /// Weekday outside 0..=6.
    InvalidWeekday,
    /// A selected major does not exist in the catalog.
    UnknownMajor,
    /// A selected subject does not exist under its major.
    UnknownSubject,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the catalog against the data-model invariants.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_calendar(calendar: &Calendar) -> ValidationResult {
    let mut errors = Vec::new();

    if to_naive_date(calendar.min_date).is_none() || to_naive_date(calendar.max_date).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MalformedDate,
            format!(
                "Calendar bounds {}..{} are not valid dates",
                calendar.min_date, calendar.max_date
            ),
        ));
    } else if calendar.min_date > calendar.max_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedDateRange,
            format!(
                "Calendar min_date {} is after max_date {}",
                calendar.min_date, calendar.max_date
            ),
        ));
    }

    for (major, subjects) in &calendar.majors {
        for (subject, classes) in subjects {
            for (code, class) in classes {
                let context = format!("{major}/{subject}/{code}");
                for entry in class
                    .schedules
                    .iter()
                    .chain(class.practice_schedules.values().flatten())
                {
                    check_entry(calendar, entry, &context, &mut errors);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that every selected (major, subject) pair exists in the catalog.
pub fn validate_selected(calendar: &Calendar, selected: &[(String, String)]) -> ValidationResult {
    let mut errors = Vec::new();

    for (major, subject) in selected {
        match calendar.majors.get(major) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownMajor,
                format!("Selected major '{major}' is not in the catalog"),
            )),
            Some(subjects) => {
                if !subjects.contains_key(subject) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownSubject,
                        format!("Selected subject '{subject}' is not offered under '{major}'"),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_entry(
    calendar: &Calendar,
    entry: &ScheduleEntry,
    context: &str,
    errors: &mut Vec<ValidationError>,
) {
    if to_naive_date(entry.start_date).is_none() || to_naive_date(entry.end_date).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MalformedDate,
            format!(
                "Class {context} has entry dates {}..{} that are not valid dates",
                entry.start_date, entry.end_date
            ),
        ));
        return;
    }

    if entry.start_date > entry.end_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedDateRange,
            format!(
                "Class {context} has start_date {} after end_date {}",
                entry.start_date, entry.end_date
            ),
        ));
    }

    if entry.start_date < calendar.min_date || entry.end_date > calendar.max_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::DateOutOfBounds,
            format!(
                "Class {context} has entry {}..{} outside the term {}..{}",
                entry.start_date, entry.end_date, calendar.min_date, calendar.max_date
            ),
        ));
    }

    if entry.start_session == 0
        || entry.end_session > SESSIONS_PER_DAY
        || entry.start_session > entry.end_session
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidSessionRange,
            format!(
                "Class {context} has session range {}..{} outside 1..={SESSIONS_PER_DAY}",
                entry.start_session, entry.end_session
            ),
        ));
    }

    if entry.day_of_week > 6 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeekday,
            format!("Class {context} has weekday {}", entry.day_of_week),
        ));
    }
}
