//! Pure in-memory edits on an owned subject tree.
//!
//! # Invariants
//! - Labels are trimmed; blank labels are rejected.
//! - A failed edit leaves the tree untouched.
//! - New children are appended; deletes keep sibling order.

use super::path::{DetailParent, NodePath};
use crate::model::subject::{Category, Detail, SubCategory, Subject, Topic};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from tree edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Label is empty or whitespace-only.
    BlankLabel,
    /// Path does not resolve inside the subject; carries the failing prefix.
    PathNotFound(String),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLabel => write!(f, "label must not be blank"),
            Self::PathNotFound(path) => write!(f, "no node at path `{path}`"),
        }
    }
}

impl Error for EditError {}

/// One non-destructive edit below the subject root.
///
/// Deletes are not edits here: they go through a confirmation step first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    AddTopic {
        title: String,
    },
    AddCategory {
        topic: usize,
        name: String,
    },
    AddSubCategory {
        topic: usize,
        category: usize,
        name: String,
    },
    AddDetail {
        parent: DetailParent,
        text: String,
    },
    Rename {
        path: NodePath,
        label: String,
    },
}

impl TreeEdit {
    /// Short stable name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddTopic { .. } => "add_topic",
            Self::AddCategory { .. } => "add_category",
            Self::AddSubCategory { .. } => "add_sub_category",
            Self::AddDetail { .. } => "add_detail",
            Self::Rename { .. } => "rename",
        }
    }
}

/// Trims `value` and rejects it when nothing is left.
pub fn normalize_label(value: &str) -> Result<String, EditError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EditError::BlankLabel);
    }
    Ok(trimmed.to_string())
}

/// Applies `edit` to `subject`. `now_ms` stamps detail timestamps.
pub fn apply_edit(subject: &mut Subject, edit: &TreeEdit, now_ms: i64) -> Result<(), EditError> {
    match edit {
        TreeEdit::AddTopic { title } => add_topic(subject, title).map(drop),
        TreeEdit::AddCategory { topic, name } => add_category(subject, *topic, name).map(drop),
        TreeEdit::AddSubCategory {
            topic,
            category,
            name,
        } => add_sub_category(subject, *topic, *category, name).map(drop),
        TreeEdit::AddDetail { parent, text } => {
            add_detail(subject, *parent, text, now_ms).map(drop)
        }
        TreeEdit::Rename { path, label } => rename_node(subject, *path, label, now_ms),
    }
}

/// Renames the subject itself.
pub fn rename_subject(subject: &mut Subject, name: &str) -> Result<(), EditError> {
    subject.name = normalize_label(name)?;
    Ok(())
}

/// Appends a topic and returns its index.
pub fn add_topic(subject: &mut Subject, title: &str) -> Result<usize, EditError> {
    let title = normalize_label(title)?;
    subject.topics.push(Topic::new(title));
    Ok(subject.topics.len() - 1)
}

/// Appends a category under topic `topic` and returns its index.
pub fn add_category(subject: &mut Subject, topic: usize, name: &str) -> Result<usize, EditError> {
    let name = normalize_label(name)?;
    let categories = &mut topic_mut(subject, topic)?.categories;
    categories.push(Category::new(name));
    Ok(categories.len() - 1)
}

/// Appends a sub-category under a category and returns its index.
pub fn add_sub_category(
    subject: &mut Subject,
    topic: usize,
    category: usize,
    name: &str,
) -> Result<usize, EditError> {
    let name = normalize_label(name)?;
    let sub_categories = &mut category_mut(subject, topic, category)?.sub_categories;
    sub_categories.push(SubCategory::new(name));
    Ok(sub_categories.len() - 1)
}

/// Appends a detail under a category or sub-category and returns its index.
pub fn add_detail(
    subject: &mut Subject,
    parent: DetailParent,
    text: &str,
    now_ms: i64,
) -> Result<usize, EditError> {
    let text = normalize_label(text)?;
    let details = details_mut(subject, parent)?;
    details.push(Detail::new(text, now_ms));
    Ok(details.len() - 1)
}

/// Sets the label of the node at `path`.
///
/// Detail renames also bump `updated_at` to `now_ms`.
pub fn rename_node(
    subject: &mut Subject,
    path: NodePath,
    label: &str,
    now_ms: i64,
) -> Result<(), EditError> {
    let label = normalize_label(label)?;
    match path {
        NodePath::Topic { topic } => topic_mut(subject, topic)?.title = label,
        NodePath::Category { topic, category } => {
            category_mut(subject, topic, category)?.name = label;
        }
        NodePath::SubCategory {
            topic,
            category,
            sub_category,
        } => sub_category_mut(subject, topic, category, sub_category)?.name = label,
        NodePath::Detail { parent, detail } => {
            let target = details_mut(subject, parent)?
                .get_mut(detail)
                .ok_or_else(|| missing(path))?;
            target.text = label;
            let created_at = target.created_at.unwrap_or(now_ms);
            target.updated_at = Some(now_ms.max(created_at));
        }
    }
    Ok(())
}

/// Removes the node at `path` from its parent sequence.
pub fn delete_node(subject: &mut Subject, path: NodePath) -> Result<(), EditError> {
    match path {
        NodePath::Topic { topic } => remove_at(&mut subject.topics, topic, path),
        NodePath::Category { topic, category } => {
            remove_at(&mut topic_mut(subject, topic)?.categories, category, path)
        }
        NodePath::SubCategory {
            topic,
            category,
            sub_category,
        } => remove_at(
            &mut category_mut(subject, topic, category)?.sub_categories,
            sub_category,
            path,
        ),
        NodePath::Detail { parent, detail } => {
            remove_at(details_mut(subject, parent)?, detail, path)
        }
    }
}

/// Returns the current label of the node at `path`.
pub fn label_at(subject: &Subject, path: NodePath) -> Option<&str> {
    let category_at = move |topic: usize, category: usize| {
        subject
            .topics
            .get(topic)
            .and_then(|node| node.categories.get(category))
    };
    match path {
        NodePath::Topic { topic } => subject.topics.get(topic).map(|node| node.title.as_str()),
        NodePath::Category { topic, category } => {
            category_at(topic, category).map(|node| node.name.as_str())
        }
        NodePath::SubCategory {
            topic,
            category,
            sub_category,
        } => category_at(topic, category)
            .and_then(|node| node.sub_categories.get(sub_category))
            .map(|node| node.name.as_str()),
        NodePath::Detail { parent, detail } => {
            let details = match parent {
                DetailParent::Category { topic, category } => {
                    &category_at(topic, category)?.details
                }
                DetailParent::SubCategory {
                    topic,
                    category,
                    sub_category,
                } => {
                    &category_at(topic, category)?
                        .sub_categories
                        .get(sub_category)?
                        .details
                }
            };
            details.get(detail).map(|node| node.text.as_str())
        }
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, path: NodePath) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(missing(path));
    }
    items.remove(index);
    Ok(())
}

fn missing(path: impl Display) -> EditError {
    EditError::PathNotFound(path.to_string())
}

fn topic_mut(subject: &mut Subject, topic: usize) -> Result<&mut Topic, EditError> {
    subject
        .topics
        .get_mut(topic)
        .ok_or_else(|| missing(NodePath::Topic { topic }))
}

fn category_mut(
    subject: &mut Subject,
    topic: usize,
    category: usize,
) -> Result<&mut Category, EditError> {
    topic_mut(subject, topic)?
        .categories
        .get_mut(category)
        .ok_or_else(|| missing(NodePath::Category { topic, category }))
}

fn sub_category_mut(
    subject: &mut Subject,
    topic: usize,
    category: usize,
    sub_category: usize,
) -> Result<&mut SubCategory, EditError> {
    category_mut(subject, topic, category)?
        .sub_categories
        .get_mut(sub_category)
        .ok_or_else(|| {
            missing(NodePath::SubCategory {
                topic,
                category,
                sub_category,
            })
        })
}

fn details_mut(subject: &mut Subject, parent: DetailParent) -> Result<&mut Vec<Detail>, EditError> {
    match parent {
        DetailParent::Category { topic, category } => {
            Ok(&mut category_mut(subject, topic, category)?.details)
        }
        DetailParent::SubCategory {
            topic,
            category,
            sub_category,
        } => Ok(&mut sub_category_mut(subject, topic, category, sub_category)?.details),
    }
}
