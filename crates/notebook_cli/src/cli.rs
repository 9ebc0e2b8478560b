//! Command-line interface definitions.

use clap::{Parser, Subcommand, ValueEnum};
use notebook_core::{Level, NodePath, SubjectId};
use std::path::PathBuf;

/// Hierarchical subject notebook
#[derive(Parser, Debug)]
#[command(name = "notebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "notebook.db", env = "NOTEBOOK_DB")]
    pub db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NOTEBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; stderr when unset
    #[arg(long, global = true, env = "NOTEBOOK_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Base URL of a running `notebook serve`. Editing commands go through
    /// its API instead of opening the database file.
    #[arg(long, global = true, env = "NOTEBOOK_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0", env = "NOTEBOOK_HOST")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 5000, env = "PORT")]
        port: u16,

        /// Allowed CORS origin; repeat for several. Any origin when omitted.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Print the subject outline
    List {
        /// Show only matching subjects and topics
        #[arg(long)]
        search: Option<String>,

        /// Expand nodes down to this level
        #[arg(long, value_enum)]
        depth: Option<Depth>,
    },

    /// Create a subject with no topics
    AddSubject { name: String },

    /// Append a child node
    ///
    /// Without `--under` a topic is added. Under a topic a category is
    /// added; under a category a sub-category (or a detail with
    /// `--detail`); under a sub-category a detail.
    Add {
        #[arg(long)]
        subject: SubjectId,

        /// Parent path such as `t0`, `t0/c1`, `t0/c1/s2`
        #[arg(long)]
        under: Option<NodePath>,

        /// Add a detail directly under a category
        #[arg(long)]
        detail: bool,

        label: String,
    },

    /// Rename a subject, or the node at `--path`
    Rename {
        #[arg(long)]
        subject: SubjectId,

        #[arg(long)]
        path: Option<NodePath>,

        label: String,
    },

    /// Delete a subject, or the node at `--path`
    Delete {
        #[arg(long)]
        subject: SubjectId,

        #[arg(long)]
        path: Option<NodePath>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl Commands {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Self::Serve { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Depth {
    Subject,
    Topic,
    Category,
    SubCategory,
}

impl From<Depth> for Level {
    fn from(value: Depth) -> Self {
        match value {
            Depth::Subject => Level::Subject,
            Depth::Topic => Level::Topic,
            Depth::Category => Level::Category,
            Depth::SubCategory => Level::SubCategory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::parse_from(["notebook", "serve"]);
        match cli.command {
            Commands::Serve {
                host, cors_origins, ..
            } => {
                assert_eq!(host, "0.0.0.0");
                assert!(cors_origins.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_repeated_cors_origins() {
        let cli = Cli::parse_from([
            "notebook",
            "serve",
            "--port",
            "8080",
            "--cors-origin",
            "http://a.test",
            "--cors-origin",
            "http://b.test",
        ]);
        match cli.command {
            Commands::Serve {
                port, cors_origins, ..
            } => {
                assert_eq!(port, 8080);
                assert_eq!(cors_origins, ["http://a.test", "http://b.test"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_add_with_parent_path() {
        let cli = Cli::parse_from([
            "notebook", "add", "--subject", SUBJECT, "--under", "t0/c1", "Matrices",
        ]);
        match cli.command {
            Commands::Add {
                subject,
                under,
                detail,
                label,
            } => {
                assert_eq!(subject.to_string(), SUBJECT);
                assert_eq!(
                    under,
                    Some(NodePath::Category {
                        topic: 0,
                        category: 1
                    })
                );
                assert!(!detail);
                assert_eq!(label, "Matrices");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_server_after_subcommand() {
        let cli = Cli::parse_from(["notebook", "list", "--server", "http://localhost:5000"]);
        assert_eq!(cli.server.as_deref(), Some("http://localhost:5000"));
    }

    #[test]
    fn test_cli_rejects_bad_path() {
        let result = Cli::try_parse_from([
            "notebook", "delete", "--subject", SUBJECT, "--path", "x9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_list_depth() {
        let cli = Cli::parse_from(["notebook", "list", "--depth", "sub-category"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                depth: Some(Depth::SubCategory),
                ..
            }
        ));
        assert!(cli.command.is_interactive());
    }
}
