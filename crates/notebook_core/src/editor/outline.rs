//! Plain-text outline of subject trees.
//!
//! Each node line carries the path understood by the CLI (`t0/c1/s2/d0`).
//! Children of collapsed nodes are hidden.

use super::expansion::{ExpansionKey, ExpansionState};
use super::path::{DetailParent, NodePath};
use crate::model::subject::{Detail, Subject};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders `subjects` as an indented outline honoring `expansion`.
pub fn render_outline(subjects: &[Subject], expansion: &ExpansionState) -> String {
    let mut out = String::new();
    for subject in subjects {
        render_subject(&mut out, subject, expansion);
    }
    out
}

fn render_subject(out: &mut String, subject: &Subject, expansion: &ExpansionState) {
    let id = subject.id;
    let open = expansion.is_open(&ExpansionKey::subject(id));
    push_line(
        out,
        0,
        marker(open, !subject.topics.is_empty()),
        &id.to_string(),
        &subject.name,
    );
    if !open {
        return;
    }

    for (t, topic) in subject.topics.iter().enumerate() {
        let open = expansion.is_open(&ExpansionKey::topic(id, t));
        let path = NodePath::Topic { topic: t };
        push_line(
            out,
            1,
            marker(open, !topic.categories.is_empty()),
            &path.to_string(),
            &topic.title,
        );
        if !open {
            continue;
        }

        for (c, category) in topic.categories.iter().enumerate() {
            let open = expansion.is_open(&ExpansionKey::category(id, t, c));
            let has_children =
                !category.details.is_empty() || !category.sub_categories.is_empty();
            let parent = DetailParent::Category {
                topic: t,
                category: c,
            };
            push_line(
                out,
                2,
                marker(open, has_children),
                &parent.to_string(),
                &category.name,
            );
            if !open {
                continue;
            }

            render_details(out, 3, parent, &category.details);
            for (s, sub_category) in category.sub_categories.iter().enumerate() {
                let open = expansion.is_open(&ExpansionKey::sub_category(id, t, c, s));
                let parent = DetailParent::SubCategory {
                    topic: t,
                    category: c,
                    sub_category: s,
                };
                push_line(
                    out,
                    3,
                    marker(open, !sub_category.details.is_empty()),
                    &parent.to_string(),
                    &sub_category.name,
                );
                if open {
                    render_details(out, 4, parent, &sub_category.details);
                }
            }
        }
    }
}

fn render_details(out: &mut String, depth: usize, parent: DetailParent, details: &[Detail]) {
    for (d, detail) in details.iter().enumerate() {
        let path = NodePath::Detail { parent, detail: d };
        push_line(out, depth, "*", &path.to_string(), &detail.text);
    }
}

fn marker(open: bool, has_children: bool) -> &'static str {
    match (has_children, open) {
        (false, _) => " ",
        (true, true) => "-",
        (true, false) => "+",
    }
}

fn push_line(out: &mut String, depth: usize, marker: &str, key: &str, label: &str) {
    let _ = writeln!(out, "{}{marker} [{key}] {label}", INDENT.repeat(depth));
}
