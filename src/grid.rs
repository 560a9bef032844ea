//! Time-grid encoding and weighted overlap scoring.
//!
//! Converts weekly schedule entries into comparable tuples of
//! (date span in epoch milliseconds, weekday, session bit set) and scores
//! the overlap between two classes as *weighted session-weeks*: sessions
//! shared per week × number of overlapping weeks. A pair that collides for
//! two weeks scores lower than one colliding all term, which is what lets
//! the optimizer prefer briefly-overlapping combinations when a clean one
//! does not exist.
//!
//! # Session bit mapping
//! Session `s` (1-based) maps to bit `s - 1` of a [`SessionMask`]. The
//! mapping lives in exactly one place ([`SessionMask::bit`]) so that
//! AND-then-popcount stays consistent everywhere.

use serde::{Deserialize, Serialize};

use crate::models::{to_naive_date, ScheduleEntry, Shift};

/// Milliseconds in a day.
pub const DAY_MS: i64 = 86_400_000;

/// Milliseconds in a week.
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Fixed-width bit set over the daily sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMask(u32);

impl SessionMask {
    /// The empty set.
    pub const EMPTY: SessionMask = SessionMask(0);

    /// Bit position for a 1-based session number.
    #[inline]
    fn bit(session: u8) -> u32 {
        1 << (session - 1)
    }

    /// Mask with bits `start..=end` set (1-based, inclusive).
    ///
    /// Sessions outside the representable 1..=32 window are ignored;
    /// validation reports them at the boundary.
    pub fn span(start: u8, end: u8) -> Self {
        let mut mask = 0u32;
        for session in start.max(1)..=end.min(32) {
            mask |= Self::bit(session);
        }
        SessionMask(mask)
    }

    /// Set intersection.
    #[inline]
    pub fn and(self, other: Self) -> Self {
        SessionMask(self.0 & other.0)
    }

    /// Number of sessions in the set (popcount).
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a session is in the set.
    #[inline]
    pub fn contains(self, session: u8) -> bool {
        self.0 & Self::bit(session) != 0
    }
}

impl From<Shift> for SessionMask {
    fn from(shift: Shift) -> Self {
        let range = shift.sessions();
        SessionMask::span(*range.start(), *range.end())
    }
}

/// One schedule entry in comparable form.
///
/// Ephemeral: recomputed per invocation, never stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGridEntry {
    /// Midnight of the first active date (epoch ms).
    pub start_ms: i64,
    /// Last millisecond of the last active date (epoch ms).
    pub end_ms: i64,
    /// Weekday the block recurs on: 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Occupied sessions.
    pub sessions: SessionMask,
}

/// Number of active weeks in an inclusive millisecond span.
///
/// The span covers `end_ms - start_ms + 1` milliseconds; a full-week span of
/// `n * 7` days yields exactly `n`.
#[inline]
pub fn week_span(start_ms: i64, end_ms: i64) -> i64 {
    if end_ms < start_ms {
        0
    } else {
        (end_ms - start_ms + 1) / WEEK_MS
    }
}

/// Encodes schedule entries into time-grid form.
///
/// Entries whose compact dates do not form valid calendar dates are skipped;
/// [`validate_calendar`](crate::validation::validate_calendar) reports them
/// at the boundary.
pub fn build_time_grid(schedules: &[ScheduleEntry]) -> Vec<TimeGridEntry> {
    schedules
        .iter()
        .filter_map(|entry| {
            let start = to_naive_date(entry.start_date)?;
            let end = to_naive_date(entry.end_date)?;
            let start_ms = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis();
            let end_ms =
                end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() + DAY_MS - 1;
            Some(TimeGridEntry {
                start_ms,
                end_ms,
                day_of_week: entry.day_of_week,
                sessions: SessionMask::span(entry.start_session, entry.end_session),
            })
        })
        .collect()
}

/// Weighted overlap between two classes' time grids, in session-weeks.
///
/// For every entry pair sharing a weekday and an intersecting date span,
/// adds `popcount(sessions_a & sessions_b) × overlapping-week-count`.
/// Symmetric; `overlap_score(a, a)` is `a`'s full weighted session count.
pub fn overlap_score(a: &[TimeGridEntry], b: &[TimeGridEntry]) -> u64 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Fast reject on the overall date spans.
    let (a_start, a_end) = span_of(a);
    let (b_start, b_end) = span_of(b);
    if a_start > b_end || b_start > a_end {
        return 0;
    }

    let mut total = 0u64;
    for ea in a {
        for eb in b {
            if ea.day_of_week != eb.day_of_week {
                continue;
            }
            let start = ea.start_ms.max(eb.start_ms);
            let end = ea.end_ms.min(eb.end_ms);
            if end < start {
                continue;
            }
            let shared = ea.sessions.and(eb.sessions);
            if shared.is_empty() {
                continue;
            }
            total += shared.count() as u64 * week_span(start, end) as u64;
        }
    }
    total
}

/// Weighted session count a class spends inside a shift band.
///
/// Per entry: sessions falling in the band × active weeks. Used as the
/// ranking tie-breaker when the caller prefers a shift.
pub fn shift_sessions(grid: &[TimeGridEntry], shift: Shift) -> u64 {
    let band = SessionMask::from(shift);
    grid.iter()
        .map(|entry| {
            entry.sessions.and(band).count() as u64 * week_span(entry.start_ms, entry.end_ms) as u64
        })
        .sum()
}

fn span_of(grid: &[TimeGridEntry]) -> (i64, i64) {
    let start = grid.iter().map(|e| e.start_ms).min().unwrap_or(0);
    let end = grid.iter().map(|e| e.end_ms).max().unwrap_or(0);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 240902 is a Monday; 241110 is a Sunday, 70 days later = 10 weeks.
    fn weekly(day_of_week: u8, start_session: u8, end_session: u8) -> ScheduleEntry {
        ScheduleEntry::new(240902, 241110, day_of_week, start_session, end_session)
    }

    #[test]
    fn test_session_mask_span_and_count() {
        let mask = SessionMask::span(1, 3);
        assert_eq!(mask.count(), 3);
        assert!(mask.contains(1));
        assert!(mask.contains(3));
        assert!(!mask.contains(4));
        assert_eq!(SessionMask::span(7, 7).count(), 1);
    }

    #[test]
    fn test_session_mask_and() {
        let a = SessionMask::span(1, 4);
        let b = SessionMask::span(3, 6);
        assert_eq!(a.and(b).count(), 2); // Sessions 3 and 4
        assert!(a.and(SessionMask::span(5, 6)).is_empty());
    }

    #[test]
    fn test_shift_masks() {
        assert_eq!(SessionMask::from(crate::models::Shift::Morning).count(), 6);
        assert_eq!(SessionMask::from(crate::models::Shift::Afternoon).count(), 6);
        assert_eq!(SessionMask::from(crate::models::Shift::Evening).count(), 4);
    }

    #[test]
    fn test_build_time_grid() {
        let grid = build_time_grid(&[weekly(1, 1, 3)]);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].day_of_week, 1);
        assert_eq!(grid[0].sessions.count(), 3);
        // 70-day inclusive span.
        assert_eq!(grid[0].end_ms - grid[0].start_ms + 1, 70 * DAY_MS);
        assert_eq!(week_span(grid[0].start_ms, grid[0].end_ms), 10);
    }

    #[test]
    fn test_build_time_grid_skips_malformed_dates() {
        let bad = ScheduleEntry::new(240230, 241110, 1, 1, 3); // Feb 30
        assert!(build_time_grid(&[bad]).is_empty());
    }

    #[test]
    fn test_overlap_requires_same_weekday() {
        let a = build_time_grid(&[weekly(1, 1, 3)]);
        let b = build_time_grid(&[weekly(2, 1, 3)]);
        assert_eq!(overlap_score(&a, &b), 0);
    }

    #[test]
    fn test_overlap_weighted_by_weeks() {
        // Sessions 2..3 shared (2 per week) over the full 10 weeks.
        let a = build_time_grid(&[weekly(1, 1, 3)]);
        let b = build_time_grid(&[weekly(1, 2, 5)]);
        assert_eq!(overlap_score(&a, &b), 20);
    }

    #[test]
    fn test_overlap_partial_term() {
        // Same sessions, but b only runs the first 5 weeks (240902..241006).
        let a = build_time_grid(&[weekly(1, 1, 3)]);
        let b = build_time_grid(&[ScheduleEntry::new(240902, 241006, 1, 1, 3)]);
        assert_eq!(overlap_score(&a, &b), 15); // 3 sessions × 5 weeks
    }

    #[test]
    fn test_overlap_disjoint_terms_fast_reject() {
        let a = build_time_grid(&[ScheduleEntry::new(240902, 241006, 1, 1, 3)]);
        let b = build_time_grid(&[ScheduleEntry::new(250106, 250309, 1, 1, 3)]);
        assert_eq!(overlap_score(&a, &b), 0);
    }

    #[test]
    fn test_overlap_symmetry() {
        let a = build_time_grid(&[weekly(1, 1, 3), weekly(3, 7, 9)]);
        let b = build_time_grid(&[weekly(1, 3, 6), weekly(3, 9, 12)]);
        assert_eq!(overlap_score(&a, &b), overlap_score(&b, &a));
    }

    #[test]
    fn test_self_overlap_identity() {
        // 3 + 2 sessions per week × 10 weeks.
        let a = build_time_grid(&[weekly(1, 1, 3), weekly(3, 7, 8)]);
        assert_eq!(overlap_score(&a, &a), 50);
    }

    #[test]
    fn test_shift_sessions() {
        // 3 morning sessions and 1 afternoon session per week, 10 weeks.
        let grid = build_time_grid(&[weekly(1, 4, 7)]);
        assert_eq!(shift_sessions(&grid, crate::models::Shift::Morning), 30);
        assert_eq!(shift_sessions(&grid, crate::models::Shift::Afternoon), 10);
        assert_eq!(shift_sessions(&grid, crate::models::Shift::Evening), 0);
    }

    #[test]
    fn test_week_span_empty() {
        assert_eq!(week_span(10, 5), 0);
    }
}
