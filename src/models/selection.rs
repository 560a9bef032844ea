//! Caller-owned selection state.
//!
//! Tracks which subjects a student wants on their timetable and which class
//! was picked for each — either by hand or by the optimizer. The core only
//! borrows this state; the caller mutates it between runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-subject choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectChoice {
    /// Whether the subject participates in the timetable at all.
    pub show: bool,
    /// Chosen class code. `None` = let the optimizer decide.
    pub class_code: Option<String>,
}

/// Major → subject → choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionState {
    /// Choices keyed by major code, then subject name.
    pub subjects: BTreeMap<String, BTreeMap<String, SubjectChoice>>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a subject as shown without picking a class.
    pub fn with_subject(mut self, major: impl Into<String>, subject: impl Into<String>) -> Self {
        self.entry(major.into(), subject.into()).show = true;
        self
    }

    /// Marks a subject as shown with a concrete class pick.
    pub fn with_class(
        mut self,
        major: impl Into<String>,
        subject: impl Into<String>,
        class_code: impl Into<String>,
    ) -> Self {
        let choice = self.entry(major.into(), subject.into());
        choice.show = true;
        choice.class_code = Some(class_code.into());
        self
    }

    /// Sets the picked class for an already-tracked subject.
    pub fn set_class(&mut self, major: &str, subject: &str, class_code: Option<String>) {
        self.entry(major.to_string(), subject.to_string()).class_code = class_code;
    }

    /// Shows or hides a subject.
    pub fn set_shown(&mut self, major: &str, subject: &str, show: bool) {
        self.entry(major.to_string(), subject.to_string()).show = show;
    }

    /// Shown subjects that still need the optimizer to pick a class.
    pub fn undecided(&self) -> Vec<(String, String)> {
        self.shown()
            .filter(|(_, _, choice)| choice.class_code.is_none())
            .map(|(major, subject, _)| (major.to_string(), subject.to_string()))
            .collect()
    }

    /// Iterates shown subjects in catalog order.
    pub fn shown(&self) -> impl Iterator<Item = (&str, &str, &SubjectChoice)> {
        self.subjects.iter().flat_map(|(major, subjects)| {
            subjects
                .iter()
                .filter(|(_, choice)| choice.show)
                .map(move |(subject, choice)| (major.as_str(), subject.as_str(), choice))
        })
    }

    fn entry(&mut self, major: String, subject: String) -> &mut SubjectChoice {
        self.subjects
            .entry(major)
            .or_default()
            .entry(subject)
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_builder() {
        let sel = SelectionState::new()
            .with_subject("SE", "Algorithms")
            .with_class("SE", "Databases", "DB02");

        let shown: Vec<_> = sel.shown().collect();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].1, "Algorithms");
        assert_eq!(shown[0].2.class_code, None);
        assert_eq!(shown[1].2.class_code, Some("DB02".into()));
    }

    #[test]
    fn test_hidden_subjects_are_skipped() {
        let mut sel = SelectionState::new()
            .with_class("SE", "Algorithms", "ALG01")
            .with_class("SE", "Databases", "DB02");
        sel.set_shown("SE", "Databases", false);

        let shown: Vec<_> = sel.shown().collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].1, "Algorithms");
    }

    #[test]
    fn test_undecided() {
        let mut sel = SelectionState::new()
            .with_subject("SE", "Algorithms")
            .with_class("SE", "Databases", "DB02");

        assert_eq!(sel.undecided(), vec![("SE".into(), "Algorithms".into())]);

        sel.set_class("SE", "Algorithms", Some("ALG01".into()));
        assert!(sel.undecided().is_empty());
    }
}
