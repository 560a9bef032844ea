//! Placed-timetable (layout output) model.
//!
//! The layout builder lays every requested block into day-indexed rows.
//! Blocks that conflict still get placed — on an extra row — and the
//! realized overlap is accumulated in [`Timetable::conflicted_sessions`].
//! Conflicts are data here, never errors.

use serde::{Deserialize, Serialize};

/// One placed block: a class occupying a session range on some day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableItem {
    /// First occupied session (1-based).
    pub start_session: u8,
    /// Last occupied session (1-based), inclusive.
    pub end_session: u8,
    /// Subject name.
    pub subject: String,
    /// Class code.
    pub class_code: String,
}

/// All rows of one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableDay {
    /// The day (compact `YYMMDD`).
    pub date: u32,
    /// Rows of mutually non-overlapping items. Row 1+ exist only when
    /// conflicting blocks had to be stacked.
    pub rows: Vec<Vec<TimetableItem>>,
}

/// A fully laid-out term timetable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// One entry per day in `[min_date, max_date]`, in order.
    pub days: Vec<TimetableDay>,
    /// Total session overlap realized across all placements.
    pub conflicted_sessions: u64,
}

impl TimetableItem {
    /// Creates a placed block.
    pub fn new(
        start_session: u8,
        end_session: u8,
        subject: impl Into<String>,
        class_code: impl Into<String>,
    ) -> Self {
        Self {
            start_session,
            end_session,
            subject: subject.into(),
            class_code: class_code.into(),
        }
    }

    /// Whether two items share at least one session.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_session <= other.end_session && other.start_session <= self.end_session
    }

    /// Number of sessions shared with `other`.
    pub fn overlap_sessions(&self, other: &Self) -> u64 {
        let start = self.start_session.max(other.start_session);
        let end = self.end_session.min(other.end_session);
        if end >= start {
            (end - start + 1) as u64
        } else {
            0
        }
    }
}

impl Timetable {
    /// Whether no placement realized any conflict.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicted_sessions == 0
    }

    /// Total number of placed blocks.
    pub fn item_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|day| day.rows.iter())
            .map(|row| row.len())
            .sum()
    }

    /// Iterates every placed block with its day.
    pub fn items(&self) -> impl Iterator<Item = (u32, &TimetableItem)> {
        self.days.iter().flat_map(|day| {
            day.rows
                .iter()
                .flat_map(move |row| row.iter().map(move |item| (day.date, item)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_overlap() {
        let a = TimetableItem::new(1, 3, "Algorithms", "ALG01");
        let b = TimetableItem::new(3, 5, "Databases", "DB01");
        let c = TimetableItem::new(4, 6, "Networks", "NW01");

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.overlap_sessions(&b), 1);
        assert_eq!(b.overlap_sessions(&c), 2);
        assert_eq!(a.overlap_sessions(&c), 0);
    }

    #[test]
    fn test_item_count_and_iteration() {
        let table = Timetable {
            days: vec![
                TimetableDay {
                    date: 240902,
                    rows: vec![
                        vec![TimetableItem::new(1, 3, "Algorithms", "ALG01")],
                        vec![TimetableItem::new(2, 4, "Databases", "DB01")],
                    ],
                },
                TimetableDay {
                    date: 240903,
                    rows: vec![],
                },
            ],
            conflicted_sessions: 2,
        };

        assert_eq!(table.item_count(), 2);
        assert!(!table.is_conflict_free());
        let dates: Vec<u32> = table.items().map(|(date, _)| date).collect();
        assert_eq!(dates, [240902, 240902]);
    }
}
