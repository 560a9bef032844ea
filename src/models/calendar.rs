//! Course catalog models.
//!
//! Defines the normalized, read-only representation produced by timetable
//! ingestion: majors → subjects → classes → weekly schedule entries.
//!
//! # Time Model
//! Dates are compact `YYMMDD` integers (e.g. `240902` = 2024-09-02) in the
//! 2000–2099 window. A [`ScheduleEntry`] is a weekly-recurring block: it is
//! active only on its weekday, between `start_date` and `end_date` inclusive.
//!
//! # Session Model
//! Each day is partitioned into [`SESSIONS_PER_DAY`] fixed teaching slots,
//! numbered from 1. A class occupies a contiguous session range. Sessions
//! group into three shift bands — see [`Shift`].
//!
//! # Ordering
//! All catalog maps are `BTreeMap`, so iteration order is the lexicographic
//! catalog order. Ranking tie-breaks downstream rely on this being stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Number of teaching sessions in a day.
pub const SESSIONS_PER_DAY: u8 = 16;

/// Subject-name → class-code → class.
pub type SubjectMap = BTreeMap<String, ClassMap>;

/// Class-code → class.
pub type ClassMap = BTreeMap<String, ClassData>;

/// A term catalog: every class offering of every subject, grouped by major.
///
/// Produced once by ingestion and treated as read-only thereafter. Invariant:
/// every schedule entry's dates lie within `[min_date, max_date]`
/// (checked by [`validate_calendar`](crate::validation::validate_calendar)).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calendar {
    /// Display title (e.g. term name).
    pub title: String,
    /// First day of the term (compact `YYMMDD`).
    pub min_date: u32,
    /// Last day of the term (compact `YYMMDD`).
    pub max_date: u32,
    /// Major-code → subject-name → class-code → class.
    pub majors: BTreeMap<String, SubjectMap>,
}

/// One offered class (section) of a subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassData {
    /// Lecturer name.
    pub teacher: String,
    /// Weekly-recurring theory blocks.
    pub schedules: Vec<ScheduleEntry>,
    /// Practice-section-code → practice blocks. Merged into synthetic
    /// combined classes by ingestion via [`ClassData::combined`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub practice_schedules: BTreeMap<String, Vec<ScheduleEntry>>,
}

/// A weekly-recurring block of contiguous sessions on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// First active date (compact `YYMMDD`).
    pub start_date: u32,
    /// Last active date (compact `YYMMDD`), inclusive.
    pub end_date: u32,
    /// Weekday the block recurs on: 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// First occupied session (1-based).
    pub start_session: u8,
    /// Last occupied session (1-based), inclusive. `>= start_session`.
    pub end_session: u8,
}

/// A named session band within the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    /// Sessions 1–6.
    Morning,
    /// Sessions 7–12.
    Afternoon,
    /// Sessions 13–16.
    Evening,
}

impl Shift {
    /// Inclusive session range of this band.
    pub fn sessions(self) -> RangeInclusive<u8> {
        match self {
            Shift::Morning => 1..=6,
            Shift::Afternoon => 7..=12,
            Shift::Evening => 13..=16,
        }
    }
}

impl Calendar {
    /// Creates an empty catalog covering `[min_date, max_date]`.
    pub fn new(title: impl Into<String>, min_date: u32, max_date: u32) -> Self {
        Self {
            title: title.into(),
            min_date,
            max_date,
            majors: BTreeMap::new(),
        }
    }

    /// Adds a class under `major` / `subject`.
    pub fn with_class(
        mut self,
        major: impl Into<String>,
        subject: impl Into<String>,
        code: impl Into<String>,
        class: ClassData,
    ) -> Self {
        self.majors
            .entry(major.into())
            .or_default()
            .entry(subject.into())
            .or_default()
            .insert(code.into(), class);
        self
    }

    /// All classes offered for a subject, in catalog order.
    pub fn classes(&self, major: &str, subject: &str) -> Option<&ClassMap> {
        self.majors.get(major)?.get(subject)
    }

    /// Looks up a single class.
    pub fn class(&self, major: &str, subject: &str, code: &str) -> Option<&ClassData> {
        self.classes(major, subject)?.get(code)
    }

    /// Total number of classes across the catalog.
    pub fn class_count(&self) -> usize {
        self.majors
            .values()
            .flat_map(|subjects| subjects.values())
            .map(|classes| classes.len())
            .sum()
    }
}

impl ClassData {
    /// Creates a class taught by `teacher`.
    pub fn new(teacher: impl Into<String>) -> Self {
        Self {
            teacher: teacher.into(),
            schedules: Vec::new(),
            practice_schedules: BTreeMap::new(),
        }
    }

    /// Adds a theory block.
    pub fn with_schedule(mut self, entry: ScheduleEntry) -> Self {
        self.schedules.push(entry);
        self
    }

    /// Adds a practice section's blocks.
    pub fn with_practice(mut self, code: impl Into<String>, entries: Vec<ScheduleEntry>) -> Self {
        self.practice_schedules.insert(code.into(), entries);
        self
    }

    /// Expands this class into the combined classes ingestion registers.
    ///
    /// Without practice sections the class maps to itself. With practice
    /// sections, each yields a synthetic `code.practice-code` class whose
    /// schedule is the theory blocks followed by that practice's blocks.
    pub fn combined(&self, code: &str) -> Vec<(String, ClassData)> {
        if self.practice_schedules.is_empty() {
            return vec![(code.to_string(), self.clone())];
        }
        self.practice_schedules
            .iter()
            .map(|(practice_code, practice)| {
                let mut schedules = self.schedules.clone();
                schedules.extend(practice.iter().copied());
                let class = ClassData {
                    teacher: self.teacher.clone(),
                    schedules,
                    practice_schedules: BTreeMap::new(),
                };
                (format!("{code}.{practice_code}"), class)
            })
            .collect()
    }
}

impl ScheduleEntry {
    /// Creates a weekly block.
    pub fn new(
        start_date: u32,
        end_date: u32,
        day_of_week: u8,
        start_session: u8,
        end_session: u8,
    ) -> Self {
        Self {
            start_date,
            end_date,
            day_of_week,
            start_session,
            end_session,
        }
    }

    /// Number of sessions the block occupies per occurrence.
    #[inline]
    pub fn session_count(&self) -> u8 {
        self.end_session - self.start_session + 1
    }
}

/// Converts a compact `YYMMDD` date to a calendar date.
///
/// Returns `None` for digits that do not form a valid date.
pub fn to_naive_date(compact: u32) -> Option<NaiveDate> {
    let year = 2000 + (compact / 10_000) as i32;
    let month = (compact / 100) % 100;
    let day = compact % 100;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Converts a calendar date back to compact `YYMMDD` form.
pub fn from_naive_date(date: NaiveDate) -> u32 {
    use chrono::Datelike;
    let year = (date.year() - 2000).clamp(0, 99) as u32;
    year * 10_000 + date.month() * 100 + date.day()
}
