//! University course-section planner.
//!
//! Given a term catalog of subjects, each offered as several class sections
//! with fixed weekly session blocks, this crate picks one class per selected
//! subject so that time overlap is minimized — optionally biased toward a
//! morning, afternoon or evening shift — and lets the caller cycle through
//! ranked alternatives on demand.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Calendar`, `ClassData`, `ScheduleEntry`,
//!   `SelectionState`, `Timetable`
//! - **`grid`**: Session bit sets, time-grid encoding, weighted overlap
//!   scoring
//! - **`optimizer`**: Pruned backtracking combination search with node
//!   budget and cancellation
//! - **`layout`**: Greedy day-by-day timetable placement and realized
//!   conflict counting
//! - **`validation`**: Input integrity checks at the ingestion boundary
//! - **`error`**: Typed planner errors
//!
//! # Architecture
//!
//! The crate is a pure computation module: it owns no I/O, no persistence
//! and no rendering. Ingestion produces the read-only [`models::Calendar`];
//! the UI owns a [`models::SelectionState`] and renders the
//! [`models::Timetable`] the layout builder returns.
//!
//! # Concurrency
//!
//! Every entry point is synchronous and CPU-bound. Callers typically
//! offload a search to a background worker; nothing here serializes
//! overlapping invocations, so either run one at a time or tag each request
//! with a monotonically increasing id and drop stale responses. A running
//! search can be stopped through [`optimizer::CancelToken`].

pub mod error;
pub mod grid;
pub mod layout;
pub mod models;
pub mod optimizer;
pub mod validation;
