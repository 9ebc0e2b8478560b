//! Expanded/collapsed flags for tree display.
//!
//! Flags are keyed by level, subject id and the index path below the
//! subject. A missing flag means collapsed. Nothing here touches storage.

use crate::model::subject::{Subject, SubjectId};
use std::collections::HashMap;

/// Tree level that can be expanded. Details are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Subject,
    Topic,
    Category,
    SubCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpansionKey {
    pub level: Level,
    pub subject_id: SubjectId,
    pub path: Vec<usize>,
}

impl ExpansionKey {
    pub fn subject(subject_id: SubjectId) -> Self {
        Self {
            level: Level::Subject,
            subject_id,
            path: Vec::new(),
        }
    }

    pub fn topic(subject_id: SubjectId, topic: usize) -> Self {
        Self {
            level: Level::Topic,
            subject_id,
            path: vec![topic],
        }
    }

    pub fn category(subject_id: SubjectId, topic: usize, category: usize) -> Self {
        Self {
            level: Level::Category,
            subject_id,
            path: vec![topic, category],
        }
    }

    pub fn sub_category(
        subject_id: SubjectId,
        topic: usize,
        category: usize,
        sub_category: usize,
    ) -> Self {
        Self {
            level: Level::SubCategory,
            subject_id,
            path: vec![topic, category, sub_category],
        }
    }
}

/// Display-only open/closed state for the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    flags: HashMap<ExpansionKey, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `key` and returns the new state.
    pub fn toggle(&mut self, key: ExpansionKey) -> bool {
        let flag = self.flags.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_open(&self, key: &ExpansionKey) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set_open(&mut self, key: ExpansionKey, open: bool) {
        self.flags.insert(key, open);
    }

    /// Opens every node of `subjects` from the subject level down to
    /// `deepest`, inclusive.
    pub fn expand_to_depth(&mut self, subjects: &[Subject], deepest: Level) {
        for subject in subjects {
            let id = subject.id;
            self.set_open(ExpansionKey::subject(id), true);
            if deepest < Level::Topic {
                continue;
            }
            for (t, topic) in subject.topics.iter().enumerate() {
                self.set_open(ExpansionKey::topic(id, t), true);
                if deepest < Level::Category {
                    continue;
                }
                for (c, category) in topic.categories.iter().enumerate() {
                    self.set_open(ExpansionKey::category(id, t, c), true);
                    if deepest < Level::SubCategory {
                        continue;
                    }
                    for s in 0..category.sub_categories.len() {
                        self.set_open(ExpansionKey::sub_category(id, t, c, s), true);
                    }
                }
            }
        }
    }

    /// Drops flags of subjects not present in `subjects`.
    pub fn retain_subjects(&mut self, subjects: &[Subject]) {
        self.flags.retain(|key, _| {
            subjects
                .iter()
                .any(|subject| subject.id == key.subject_id)
        });
    }

    /// Number of stored flags, open or closed.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ExpansionKey, ExpansionState, Level};
    use crate::model::subject::{Category, Subject, Topic};

    #[test]
    fn toggle_flips_and_defaults_closed() {
        let subject = Subject::new("Math");
        let key = ExpansionKey::topic(subject.id, 0);
        let mut state = ExpansionState::new();

        assert!(!state.is_open(&key));
        assert!(state.toggle(key.clone()));
        assert!(state.is_open(&key));
        assert!(!state.toggle(key.clone()));
        assert!(!state.is_open(&key));
    }

    #[test]
    fn keys_differ_by_level_and_path() {
        let subject = Subject::new("Math");
        let mut state = ExpansionState::new();
        state.set_open(ExpansionKey::topic(subject.id, 1), true);

        assert!(!state.is_open(&ExpansionKey::topic(subject.id, 0)));
        assert!(!state.is_open(&ExpansionKey::category(subject.id, 1, 0)));
    }

    #[test]
    fn expand_to_depth_stops_at_requested_level() {
        let mut subject = Subject::new("Math");
        let mut topic = Topic::new("Algebra");
        topic.categories.push(Category::new("Linear"));
        subject.topics.push(topic);
        let subjects = vec![subject];
        let id = subjects[0].id;

        let mut state = ExpansionState::new();
        state.expand_to_depth(&subjects, Level::Topic);

        assert!(state.is_open(&ExpansionKey::subject(id)));
        assert!(state.is_open(&ExpansionKey::topic(id, 0)));
        assert!(!state.is_open(&ExpansionKey::category(id, 0, 0)));
    }

    #[test]
    fn retain_subjects_drops_stale_flags() {
        let kept = Subject::new("Kept");
        let gone = Subject::new("Gone");
        let mut state = ExpansionState::new();
        state.set_open(ExpansionKey::subject(kept.id), true);
        state.set_open(ExpansionKey::subject(gone.id), true);

        state.retain_subjects(std::slice::from_ref(&kept));

        assert_eq!(state.len(), 1);
        assert!(state.is_open(&ExpansionKey::subject(kept.id)));
    }
}
