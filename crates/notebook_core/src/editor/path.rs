//! Structured index paths into a subject tree.
//!
//! Text form, one segment per level: `t0`, `t0/c1`, `t0/c1/s2`,
//! `t0/c1/d3`, `t0/c1/s2/d0`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Owner of a detail sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailParent {
    Category {
        topic: usize,
        category: usize,
    },
    SubCategory {
        topic: usize,
        category: usize,
        sub_category: usize,
    },
}

/// Address of one node below the subject root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePath {
    Topic {
        topic: usize,
    },
    Category {
        topic: usize,
        category: usize,
    },
    SubCategory {
        topic: usize,
        category: usize,
        sub_category: usize,
    },
    Detail {
        parent: DetailParent,
        detail: usize,
    },
}

impl NodePath {
    /// Human-readable node kind, used in confirmation prompts.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Topic { .. } => "topic",
            Self::Category { .. } => "category",
            Self::SubCategory { .. } => "sub-category",
            Self::Detail { .. } => "detail",
        }
    }
}

impl From<DetailParent> for NodePath {
    fn from(value: DetailParent) -> Self {
        match value {
            DetailParent::Category { topic, category } => Self::Category { topic, category },
            DetailParent::SubCategory {
                topic,
                category,
                sub_category,
            } => Self::SubCategory {
                topic,
                category,
                sub_category,
            },
        }
    }
}

impl TryFrom<NodePath> for DetailParent {
    type Error = PathParseError;

    fn try_from(value: NodePath) -> Result<Self, Self::Error> {
        match value {
            NodePath::Category { topic, category } => Ok(Self::Category { topic, category }),
            NodePath::SubCategory {
                topic,
                category,
                sub_category,
            } => Ok(Self::SubCategory {
                topic,
                category,
                sub_category,
            }),
            other => Err(PathParseError::NotADetailParent(other.to_string())),
        }
    }
}

impl Display for DetailParent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", NodePath::from(*self))
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic { topic } => write!(f, "t{topic}"),
            Self::Category { topic, category } => write!(f, "t{topic}/c{category}"),
            Self::SubCategory {
                topic,
                category,
                sub_category,
            } => write!(f, "t{topic}/c{category}/s{sub_category}"),
            Self::Detail { parent, detail } => write!(f, "{parent}/d{detail}"),
        }
    }
}

/// Errors from parsing the text form of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    Empty,
    /// Segment is not `<letter><index>`.
    InvalidSegment(String),
    /// Segments are valid but do not form a path of this tree.
    InvalidShape(String),
    /// Path is valid but does not own details.
    NotADetailParent(String),
}

impl Display for PathParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "path must not be empty"),
            Self::InvalidSegment(segment) => write!(
                f,
                "invalid path segment `{segment}`; expected t<N>, c<N>, s<N> or d<N>"
            ),
            Self::InvalidShape(path) => write!(
                f,
                "invalid path `{path}`; expected t/c, t/c/s, t/c/d or t/c/s/d"
            ),
            Self::NotADetailParent(path) => {
                write!(f, "path `{path}` is not a category or sub-category")
            }
        }
    }
}

impl Error for PathParseError {}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(PathParseError::Empty);
        }

        let segments = trimmed
            .split('/')
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;

        match segments.as_slice() {
            [('t', topic)] => Ok(Self::Topic { topic: *topic }),
            [('t', topic), ('c', category)] => Ok(Self::Category {
                topic: *topic,
                category: *category,
            }),
            [('t', topic), ('c', category), ('s', sub_category)] => Ok(Self::SubCategory {
                topic: *topic,
                category: *category,
                sub_category: *sub_category,
            }),
            [('t', topic), ('c', category), ('d', detail)] => Ok(Self::Detail {
                parent: DetailParent::Category {
                    topic: *topic,
                    category: *category,
                },
                detail: *detail,
            }),
            [('t', topic), ('c', category), ('s', sub_category), ('d', detail)] => {
                Ok(Self::Detail {
                    parent: DetailParent::SubCategory {
                        topic: *topic,
                        category: *category,
                        sub_category: *sub_category,
                    },
                    detail: *detail,
                })
            }
            _ => Err(PathParseError::InvalidShape(trimmed.to_string())),
        }
    }
}

impl FromStr for DetailParent {
    type Err = PathParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<NodePath>()?.try_into()
    }
}

fn parse_segment(segment: &str) -> Result<(char, usize), PathParseError> {
    let invalid = || PathParseError::InvalidSegment(segment.to_string());
    let mut chars = segment.chars();
    let tag = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
    if !matches!(tag, 't' | 'c' | 's' | 'd') {
        return Err(invalid());
    }
    let index = chars.as_str().parse::<usize>().map_err(|_| invalid())?;
    Ok((tag, index))
}
