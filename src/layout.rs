//! Greedy timetable layout.
//!
//! Lays an arbitrary selection out into day-indexed rows, independent of the
//! optimizer: it is used both to visualize the optimizer's pick and to
//! re-score a hand-made selection, so it must accept any input.
//!
//! # Algorithm
//!
//! 1. Enumerate every day in `[min_date, max_date]`.
//! 2. For each shown subject with a chosen class, step week-by-week through
//!    each schedule entry on its weekday.
//! 3. Place each block into the first existing row of that day whose items
//!    it does not session-overlap, else open a new row. Before placing,
//!    the exact session intersection against everything already on the day
//!    is added to the conflict total — the block itself is never dropped.
//!
//! The builder never fails: unknown class codes are skipped (the selection
//! is caller-owned UI state and may lag the catalog), malformed dates yield
//! an empty table, and conflicts are counted, not raised.

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::models::{
    from_naive_date, to_naive_date, Calendar, ScheduleEntry, SelectionState, Timetable,
    TimetableDay, TimetableItem,
};

/// Lays out every chosen class of `selection` over the term.
pub fn build_timetable(calendar: &Calendar, selection: &SelectionState) -> Timetable {
    let (Some(first), Some(last)) = (
        to_naive_date(calendar.min_date),
        to_naive_date(calendar.max_date),
    ) else {
        return Timetable::default();
    };
    if last < first {
        return Timetable::default();
    }

    let mut table = Timetable {
        days: first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| TimetableDay {
                date: from_naive_date(day),
                rows: Vec::new(),
            })
            .collect(),
        conflicted_sessions: 0,
    };

    for (major, subject, choice) in selection.shown() {
        let Some(code) = choice.class_code.as_deref() else {
            continue;
        };
        let Some(class) = calendar.class(major, subject, code) else {
            debug!("selection references unknown class {major}/{subject}/{code}, skipping");
            continue;
        };
        for entry in &class.schedules {
            place_entry(&mut table, first, last, entry, subject, code);
        }
    }

    debug!(
        "laid out {} blocks, {} conflicted sessions",
        table.item_count(),
        table.conflicted_sessions
    );
    table
}

/// Places every weekly occurrence of one schedule entry.
fn place_entry(
    table: &mut Timetable,
    term_first: NaiveDate,
    term_last: NaiveDate,
    entry: &ScheduleEntry,
    subject: &str,
    code: &str,
) {
    let (Some(entry_start), Some(entry_end)) = (
        to_naive_date(entry.start_date),
        to_naive_date(entry.end_date),
    ) else {
        return;
    };
    let start = entry_start.max(term_first);
    let end = entry_end.min(term_last);

    let Some(mut day) = first_on_weekday(start, entry.day_of_week) else {
        return;
    };
    while day <= end {
        let index = day.signed_duration_since(term_first).num_days() as usize;
        if let Some(cell) = table.days.get_mut(index) {
            let item = TimetableItem::new(entry.start_session, entry.end_session, subject, code);
            table.conflicted_sessions += place_item(cell, item);
        }
        match day.checked_add_days(chrono::Days::new(7)) {
            Some(next) => day = next,
            None => break,
        }
    }
}

/// Places one block into a day, returning the realized session overlap.
fn place_item(cell: &mut TimetableDay, item: TimetableItem) -> u64 {
    let conflict: u64 = cell
        .rows
        .iter()
        .flatten()
        .map(|placed| placed.overlap_sessions(&item))
        .sum();

    match cell
        .rows
        .iter_mut()
        .find(|row| row.iter().all(|placed| !placed.overlaps(&item)))
    {
        Some(row) => row.push(item),
        None => cell.rows.push(vec![item]),
    }
    conflict
}

/// First date at or after `from` falling on `day_of_week` (0 = Sunday).
fn first_on_weekday(from: NaiveDate, day_of_week: u8) -> Option<NaiveDate> {
    let current = from.weekday().num_days_from_sunday() as u8;
    let ahead = (day_of_week.checked_sub(current)).unwrap_or(day_of_week + 7 - current) as u64;
    from.checked_add_days(chrono::Days::new(ahead))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassData, SelectionState};

    // Term 240902 (a Monday) .. 240929 (a Sunday): 4 weeks.
    fn weekly(day_of_week: u8, start_session: u8, end_session: u8) -> ScheduleEntry {
        ScheduleEntry::new(240902, 240929, day_of_week, start_session, end_session)
    }

    fn sample_calendar() -> Calendar {
        Calendar::new("2024-1", 240902, 240929)
            .with_class(
                "SE",
                "Algorithms",
                "ALG01",
                ClassData::new("Dr. Chen").with_schedule(weekly(1, 1, 3)),
            )
            .with_class(
                "SE",
                "Databases",
                "DB01",
                ClassData::new("Dr. Vu").with_schedule(weekly(1, 2, 4)),
            )
            .with_class(
                "SE",
                "Networks",
                "NW01",
                ClassData::new("Dr. Le").with_schedule(weekly(3, 7, 9)),
            )
    }

    #[test]
    fn test_empty_selection_yields_empty_days() {
        let table = build_timetable(&sample_calendar(), &SelectionState::new());
        assert_eq!(table.days.len(), 28);
        assert_eq!(table.item_count(), 0);
        assert!(table.is_conflict_free());
    }

    #[test]
    fn test_weekly_occurrences_are_placed() {
        let selection = SelectionState::new().with_class("SE", "Algorithms", "ALG01");
        let table = build_timetable(&sample_calendar(), &selection);

        // One block per Monday of the 4-week term.
        assert_eq!(table.item_count(), 4);
        assert!(table.is_conflict_free());
        let dates: Vec<u32> = table.items().map(|(date, _)| date).collect();
        assert_eq!(dates, [240902, 240909, 240916, 240923]);
    }

    #[test]
    fn test_conflicting_blocks_are_stacked_not_dropped() {
        let selection = SelectionState::new()
            .with_class("SE", "Algorithms", "ALG01")
            .with_class("SE", "Databases", "DB01");
        let table = build_timetable(&sample_calendar(), &selection);

        // Both Monday blocks appear every week (conservation).
        assert_eq!(table.item_count(), 8);
        // Sessions 2-3 collide each of the 4 Mondays.
        assert_eq!(table.conflicted_sessions, 8);
        // The colliding block went to a second row.
        let monday = &table.days[0];
        assert_eq!(monday.rows.len(), 2);
        assert_eq!(monday.rows[0].len(), 1);
        assert_eq!(monday.rows[1].len(), 1);
    }

    #[test]
    fn test_disjoint_blocks_share_a_row() {
        // Networks sits on Wednesday; Algorithms on Monday — and a second
        // Monday block that does not overlap lands in row 0 as well.
        let cal = sample_calendar().with_class(
            "SE",
            "Graphics",
            "GR01",
            ClassData::new("Dr. Ng").with_schedule(weekly(1, 5, 6)),
        );
        let selection = SelectionState::new()
            .with_class("SE", "Algorithms", "ALG01")
            .with_class("SE", "Graphics", "GR01");
        let table = build_timetable(&cal, &selection);

        assert!(table.is_conflict_free());
        let monday = &table.days[0];
        assert_eq!(monday.rows.len(), 1);
        assert_eq!(monday.rows[0].len(), 2);
    }

    #[test]
    fn test_hidden_and_undecided_subjects_are_skipped() {
        let mut selection = SelectionState::new()
            .with_class("SE", "Algorithms", "ALG01")
            .with_subject("SE", "Databases"); // No class chosen yet.
        selection.set_shown("SE", "Algorithms", false);

        let table = build_timetable(&sample_calendar(), &selection);
        assert_eq!(table.item_count(), 0);
    }

    #[test]
    fn test_unknown_class_code_is_skipped() {
        let selection = SelectionState::new().with_class("SE", "Algorithms", "GONE99");
        let table = build_timetable(&sample_calendar(), &selection);
        assert_eq!(table.item_count(), 0);
        assert!(table.is_conflict_free());
    }

    #[test]
    fn test_entry_clamped_to_term() {
        // Entry nominally starts mid-term and ends after it; only in-term
        // Wednesdays are placed.
        let cal = Calendar::new("2024-1", 240902, 240929).with_class(
            "SE",
            "Networks",
            "NW01",
            ClassData::new("t").with_schedule(ScheduleEntry::new(240911, 241030, 3, 7, 9)),
        );
        let selection = SelectionState::new().with_class("SE", "Networks", "NW01");
        let table = build_timetable(&cal, &selection);

        let dates: Vec<u32> = table.items().map(|(date, _)| date).collect();
        assert_eq!(dates, [240911, 240918, 240925]);
    }

    #[test]
    fn test_malformed_calendar_bounds_yield_empty_table() {
        let cal = Calendar::new("bad", 249999, 240929);
        let selection = SelectionState::new();
        let table = build_timetable(&cal, &selection);
        assert!(table.days.is_empty());
    }

    #[test]
    fn test_triple_conflict_counts_each_intersection() {
        // Three blocks on the same Monday sessions 1-2: the second pays 2,
        // the third pays 2 against each of the first two.
        let cal = Calendar::new("2024-1", 240902, 240908)
            .with_class("SE", "A", "A1", ClassData::new("t").with_schedule(
                ScheduleEntry::new(240902, 240908, 1, 1, 2),
            ))
            .with_class("SE", "B", "B1", ClassData::new("t").with_schedule(
                ScheduleEntry::new(240902, 240908, 1, 1, 2),
            ))
            .with_class("SE", "C", "C1", ClassData::new("t").with_schedule(
                ScheduleEntry::new(240902, 240908, 1, 1, 2),
            ));
        let selection = SelectionState::new()
            .with_class("SE", "A", "A1")
            .with_class("SE", "B", "B1")
            .with_class("SE", "C", "C1");
        let table = build_timetable(&cal, &selection);

        assert_eq!(table.item_count(), 3);
        assert_eq!(table.conflicted_sessions, 6);
        assert_eq!(table.days[0].rows.len(), 3);
    }
}
