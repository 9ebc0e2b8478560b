//! Subject aggregate model.
//!
//! # Responsibility
//! - Define the nested note tree persisted as one document per subject.
//! - Validate inbound payloads before they reach persistence.
//!
//! # Invariants
//! - `Subject::id` is the only identity in the tree; descendants are owned
//!   values with no identity of their own.
//! - Sequence order is display order and is never rearranged here.
//! - Empty containers are valid at every level.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of one subject document.
pub type SubjectId = Uuid;

/// Top-level aggregate root of the note tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Store-assigned identifier. `_id` is accepted on input.
    #[serde(alias = "_id")]
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub details: Vec<Detail>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub details: Vec<Detail>,
}

/// Leaf note text. The only node that tracks timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(default)]
    pub text: String,
    /// Unix epoch milliseconds. Stamped by the store when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds. Must not be earlier than `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Candidate subject payload for create and replace.
///
/// Carries no identifier: create assigns one, replace takes it from the
/// caller. Any `id`/`_id` present in a JSON body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Location of one detail inside a subject tree, used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLocation {
    pub topic: usize,
    pub category: usize,
    pub sub_category: Option<usize>,
    pub detail: usize,
}

impl Display for DetailLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}/c{}", self.topic, self.category)?;
        if let Some(sub_category) = self.sub_category {
            write!(f, "/s{sub_category}")?;
        }
        write!(f, "/d{}", self.detail)
    }
}

/// Validation failures for subject payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectValidationError {
    /// Payload cannot be coerced into the subject schema.
    Malformed(String),
    /// Subject name is missing or blank after trim.
    BlankName,
    /// Detail `updated_at` is earlier than its `created_at`.
    DetailTimestampOrder(DetailLocation),
}

impl Display for SubjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed subject payload: {message}"),
            Self::BlankName => write!(f, "subject name must not be blank"),
            Self::DetailTimestampOrder(location) => write!(
                f,
                "detail at {location} has updatedAt earlier than createdAt"
            ),
        }
    }
}

impl Error for SubjectValidationError {}

impl SubjectInput {
    /// Creates an input with the given name and no topics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topics: Vec::new(),
        }
    }

    /// Decodes a JSON value into an input, mapping decode failures to
    /// [`SubjectValidationError::Malformed`].
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SubjectValidationError> {
        serde_json::from_value(value)
            .map_err(|err| SubjectValidationError::Malformed(err.to_string()))
    }

    /// Binds this payload to an identifier, producing a full subject.
    pub fn into_subject(self, id: SubjectId) -> Subject {
        Subject {
            id,
            name: self.name,
            topics: self.topics,
        }
    }
}

impl From<Subject> for SubjectInput {
    fn from(value: Subject) -> Self {
        Self {
            name: value.name,
            topics: value.topics,
        }
    }
}

impl Subject {
    /// Creates an empty subject with a generated identifier.
    pub fn new(name: impl Into<String>) -> Self {
        SubjectInput::new(name).into_subject(Uuid::new_v4())
    }

    /// Checks payload invariants enforced before every write.
    pub fn validate(&self) -> Result<(), SubjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(SubjectValidationError::BlankName);
        }

        for (topic_idx, topic) in self.topics.iter().enumerate() {
            for (category_idx, category) in topic.categories.iter().enumerate() {
                check_detail_order(&category.details, topic_idx, category_idx, None)?;
                for (sub_idx, sub_category) in category.sub_categories.iter().enumerate() {
                    check_detail_order(
                        &sub_category.details,
                        topic_idx,
                        category_idx,
                        Some(sub_idx),
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Fills missing detail timestamps with `now_ms`.
    ///
    /// Supplied timestamps are kept as-is and filled values never invert
    /// the pair: a missing `created_at` is capped at a supplied
    /// `updated_at`, a missing `updated_at` is at least `created_at`.
    pub fn stamp_details(&mut self, now_ms: i64) {
        for detail in self.details_mut() {
            let created_at = match (detail.created_at, detail.updated_at) {
                (Some(created_at), _) => created_at,
                (None, Some(updated_at)) => now_ms.min(updated_at),
                (None, None) => now_ms,
            };
            detail.created_at = Some(created_at);
            if detail.updated_at.is_none() {
                detail.updated_at = Some(created_at.max(now_ms));
            }
        }
    }

    /// Returns `(topics, categories, sub_categories, details)` counts.
    ///
    /// Used for metadata-only log lines; never exposes note text.
    pub fn node_counts(&self) -> NodeCounts {
        let mut counts = NodeCounts {
            topics: self.topics.len(),
            ..NodeCounts::default()
        };
        for topic in &self.topics {
            counts.categories += topic.categories.len();
            for category in &topic.categories {
                counts.details += category.details.len();
                counts.sub_categories += category.sub_categories.len();
                for sub_category in &category.sub_categories {
                    counts.details += sub_category.details.len();
                }
            }
        }
        counts
    }

    fn details_mut(&mut self) -> impl Iterator<Item = &mut Detail> {
        self.topics
            .iter_mut()
            .flat_map(|topic| topic.categories.iter_mut())
            .flat_map(|category| {
                let Category {
                    details,
                    sub_categories,
                    ..
                } = category;
                details.iter_mut().chain(
                    sub_categories
                        .iter_mut()
                        .flat_map(|sub_category| sub_category.details.iter_mut()),
                )
            })
    }
}

/// Node totals for one subject tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    pub topics: usize,
    pub categories: usize,
    pub sub_categories: usize,
    pub details: usize,
}

impl Topic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            categories: Vec::new(),
        }
    }
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Vec::new(),
            sub_categories: Vec::new(),
        }
    }
}

impl SubCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Vec::new(),
        }
    }
}

impl Detail {
    /// Creates a detail with both timestamps set to `now_ms`.
    pub fn new(text: impl Into<String>, now_ms: i64) -> Self {
        Self {
            text: text.into(),
            created_at: Some(now_ms),
            updated_at: Some(now_ms),
        }
    }
}

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn check_detail_order(
    details: &[Detail],
    topic: usize,
    category: usize,
    sub_category: Option<usize>,
) -> Result<(), SubjectValidationError> {
    for (detail_idx, detail) in details.iter().enumerate() {
        if let (Some(created_at), Some(updated_at)) = (detail.created_at, detail.updated_at) {
            if updated_at < created_at {
                return Err(SubjectValidationError::DetailTimestampOrder(
                    DetailLocation {
                        topic,
                        category,
                        sub_category,
                        detail: detail_idx,
                    },
                ));
            }
        }
    }
    Ok(())
}
