//! Command execution.

use crate::cli::{Cli, Commands, Depth};
use anyhow::{bail, Context};
use log::info;
use notebook_core::db::open_db;
use notebook_core::{
    label_at, render_outline, DetailParent, EditOutcome, ExpansionState, NodePath,
    SqliteSubjectRepository, SubjectId, SubjectService, SubjectStore, TreeEdit, TreeEditor,
};
use notebook_server::{AppState, HttpSubjectStore, NotebookServer, ServerConfig};
use std::io::{self, BufRead, Write};

pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            cors_origins,
        } => {
            let state = AppState::open(&cli.db)
                .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
            let config = ServerConfig {
                host,
                port,
                cors_origins,
            };
            let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            runtime
                .block_on(NotebookServer::new(config, state).start())
                .context("http server failed")
        }
        command => match &cli.server {
            Some(url) => {
                let store = HttpSubjectStore::new(url)
                    .with_context(|| format!("failed to create client for `{url}`"))?;
                run_local(store, command)
            }
            None => {
                let conn = open_db(&cli.db)
                    .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
                let repo = SqliteSubjectRepository::try_new(&conn)?;
                run_local(SubjectService::new(repo), command)
            }
        },
    }
}

fn run_local<S: SubjectStore>(store: S, command: Commands) -> anyhow::Result<()> {
    let mut editor = open_editor(store)?;

    match command {
        Commands::List { search, depth } => {
            print!("{}", outline(&editor, search.as_deref().unwrap_or(""), depth));
        }
        Commands::AddSubject { name } => {
            let created = editor.add_subject(&name)?;
            println!("{}", created.id);
        }
        Commands::Add {
            subject,
            under,
            detail,
            label,
        } => {
            let edit = child_edit(under, detail, label)?;
            editor.apply(subject, &edit)?;
        }
        Commands::Rename {
            subject,
            path: None,
            label,
        } => editor.rename_subject(subject, &label)?,
        Commands::Rename {
            subject,
            path: Some(path),
            label,
        } => editor.apply(subject, &TreeEdit::Rename { path, label })?,
        Commands::Delete { subject, path, yes } => {
            let outcome = delete(&mut editor, subject, path, yes)?;
            if outcome == EditOutcome::Cancelled {
                println!("Cancelled");
            }
        }
        Commands::Serve { .. } => bail!("serve is not a local command"),
    }

    Ok(())
}

fn open_editor<S: SubjectStore>(store: S) -> anyhow::Result<TreeEditor<S>> {
    let mut editor = TreeEditor::new(store);
    if !editor.refresh() {
        bail!("failed to load subjects");
    }
    Ok(editor)
}

/// Renders the (optionally filtered) outline. Under a search, node paths
/// index the filtered view.
fn outline<S: SubjectStore>(editor: &TreeEditor<S>, query: &str, depth: Option<Depth>) -> String {
    let subjects = editor.visible_subjects(query);
    let mut expansion = ExpansionState::new();
    if let Some(depth) = depth {
        expansion.expand_to_depth(&subjects, depth.into());
    }
    render_outline(&subjects, &expansion)
}

/// Maps a parent path to the edit that appends `label` beneath it.
fn child_edit(under: Option<NodePath>, detail: bool, label: String) -> anyhow::Result<TreeEdit> {
    let edit = match under {
        None if detail => bail!("a detail needs a category or sub-category parent"),
        None => TreeEdit::AddTopic { title: label },
        Some(NodePath::Topic { topic }) if !detail => TreeEdit::AddCategory { topic, name: label },
        Some(NodePath::Category { topic, category }) if !detail => TreeEdit::AddSubCategory {
            topic,
            category,
            name: label,
        },
        Some(path @ (NodePath::Category { .. } | NodePath::SubCategory { .. })) => {
            TreeEdit::AddDetail {
                parent: DetailParent::try_from(path)?,
                text: label,
            }
        }
        Some(NodePath::Topic { .. }) => bail!("a detail cannot be added directly under a topic"),
        Some(NodePath::Detail { .. }) => bail!("details have no children"),
    };
    Ok(edit)
}

fn delete<S: SubjectStore>(
    editor: &mut TreeEditor<S>,
    subject: SubjectId,
    path: Option<NodePath>,
    yes: bool,
) -> anyhow::Result<EditOutcome> {
    let Some(current) = editor.subject(subject) else {
        bail!("unknown subject {subject}");
    };
    // Resolve the target before prompting.
    let label = match path {
        None => current.name.clone(),
        Some(path) => label_at(current, path)
            .with_context(|| format!("no {} at `{path}`", path.kind_label()))?
            .to_string(),
    };

    let confirm = |prompt: &str| yes || prompt_yes_no(&format!("{prompt} ({label})"));
    let outcome = match path {
        None => editor.delete_subject(subject, &confirm)?,
        Some(path) => editor.delete_node(subject, path, &confirm)?,
    };
    info!(
        "event=cli_delete module=cli status=ok subject_id={subject} outcome={}",
        match outcome {
            EditOutcome::Applied => "applied",
            EditOutcome::Cancelled => "cancelled",
        }
    );
    Ok(outcome)
}

fn prompt_yes_no(prompt: &str) -> bool {
    let mut stderr = io::stderr();
    if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
