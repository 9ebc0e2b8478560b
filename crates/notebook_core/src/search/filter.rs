//! Case-insensitive subject/topic/category filter.
//!
//! # Invariants
//! - Blank queries return the input unchanged. Other queries match as
//!   typed, surrounding whitespace included.
//! - A subject whose name matches keeps all of its topics.
//! - Otherwise only topics matching by title or by a category name are
//!   kept, each in full.
//! - Input order is preserved.

use crate::model::subject::{Subject, Topic};

/// Projects `subjects` onto the branches matching `query`.
pub fn filter_subjects(subjects: &[Subject], query: &str) -> Vec<Subject> {
    if query.trim().is_empty() {
        return subjects.to_vec();
    }
    let needle = query.to_lowercase();

    subjects
        .iter()
        .filter_map(|subject| {
            if contains(&subject.name, &needle) {
                return Some(subject.clone());
            }

            let topics: Vec<Topic> = subject
                .topics
                .iter()
                .filter(|topic| topic_matches(topic, &needle))
                .cloned()
                .collect();
            if topics.is_empty() {
                return None;
            }

            Some(Subject {
                id: subject.id,
                name: subject.name.clone(),
                topics,
            })
        })
        .collect()
}

fn topic_matches(topic: &Topic, needle: &str) -> bool {
    contains(&topic.title, needle)
        || topic
            .categories
            .iter()
            .any(|category| contains(&category.name, needle))
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
