//! Planner domain models.
//!
//! Provides the core data types for the course-section planner: the
//! read-only catalog ([`Calendar`]), the caller-owned selection state
//! ([`SelectionState`]), and the placed-timetable output ([`Timetable`]).
//!
//! # Ownership
//!
//! | Type | Produced by | Mutated by |
//! |------|-------------|-----------|
//! | `Calendar` | Ingestion, once | Nobody (read-only) |
//! | `SelectionState` | Caller | Caller, between runs |
//! | `Timetable` | Layout builder | Nobody (per-invocation result) |

mod calendar;
mod selection;
mod timetable;

pub use calendar::{
    from_naive_date, to_naive_date, Calendar, ClassData, ClassMap, ScheduleEntry, Shift,
    SubjectMap, SESSIONS_PER_DAY,
};
pub use selection::{SelectionState, SubjectChoice};
pub use timetable::{Timetable, TimetableDay, TimetableItem};
