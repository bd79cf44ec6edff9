//! Command-line front end for a SQLite-backed node tree.
//!
//! # Responsibility
//! - Map subcommands onto `TreeService` operations.
//! - Load once per invocation and save after every applied mutation.
//!
//! # Invariants
//! - A mutation that does not apply is reported and never saved.
//! - Import is the only async path and runs on a current-thread runtime.

mod outline;

use clap::{Parser, Subcommand};
use log::info;
use nodetree_core::db::{open_db, DbError};
use nodetree_core::{
    default_log_level, init_logging, DirectorySink, ExportError, FsSource, ImportError,
    ImportOptions, ImportOutcome, MoveDirection, Node, PersistError, SqliteStore, StoreError,
    TreeService,
};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nodetree")]
#[command(about = "Cursor-addressed node tree stored in SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file
    #[arg(long, env = "NODETREE_DB", default_value = "nodetree.db", global = true)]
    db: PathBuf,

    /// Storage key the tree lives under
    #[arg(long, env = "NODETREE_KEY", default_value = "nodetree", global = true)]
    key: String,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, env = "NODETREE_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree as an indented outline
    Show {
        /// Include soft-deleted nodes
        #[arg(short, long)]
        all: bool,
    },

    /// Append a node to the root or to the children of a node
    Add {
        /// Node type; `folder` makes a container
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Parent cursor such as `0.2`; root when omitted
        #[arg(short, long)]
        parent: Option<String>,

        /// Domain field as `key=value`; value is JSON or a plain string
        #[arg(short, long = "field", value_parser = parse_field_arg)]
        fields: Vec<(String, Value)>,
    },

    /// Print a node as JSON, or one of its fields
    Get {
        cursor: String,
        /// Field name; the whole node when omitted
        field: Option<String>,
    },

    /// Set one field on a node
    Set {
        cursor: String,
        field: String,
        /// JSON value, or a plain string when it is not valid JSON
        value: String,
    },

    /// Soft-delete a node
    Delete { cursor: String },

    /// Undo a soft delete
    Restore { cursor: String },

    /// Move a node among siblings or across nesting levels
    Move {
        cursor: String,
        #[arg(value_parser = parse_direction_arg)]
        direction: MoveDirection,
    },

    /// Write the visible roots to `<base>-<timestamp>.json`
    Export {
        base_name: String,

        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Load nodes from a JSON file
    Import {
        file: PathBuf,

        /// Append to the existing roots instead of replacing them
        #[arg(short, long)]
        merge: bool,

        /// Field every imported node must carry; repeatable
        #[arg(short, long = "require")]
        required: Vec<String>,
    },

    /// Print the core version
    Version,
}

#[derive(Debug)]
enum CliError {
    Db(DbError),
    Store(StoreError),
    Persist(PersistError),
    Export(ExportError),
    Import(ImportError),
    Runtime(io::Error),
    Logging(String),
    NotApplied { action: &'static str, cursor: String },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::Persist(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "import failed: {err}"),
            Self::Runtime(err) => write!(f, "failed to start runtime: {err}"),
            Self::Logging(message) => write!(f, "failed to init logging: {message}"),
            Self::NotApplied { action, cursor } => {
                write!(f, "{action} not applied at cursor `{cursor}`")
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Persist(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::Logging(_) | Self::NotApplied { .. } => None,
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistError> for CliError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<ExportError> for CliError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<ImportError> for CliError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("nodetree: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).map_err(CliError::Logging)?;
    }

    if let Commands::Version = cli.command {
        println!("nodetree {}", nodetree_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)?;
    let store = SqliteStore::try_new(&conn)?;
    let mut service = TreeService::open(store, cli.key)?;
    info!(
        "event=cli_session module=cli status=ok db={} key={} roots={}",
        cli.db.display(),
        service.key(),
        service.nodes().len()
    );

    match cli.command {
        Commands::Show { all } => {
            print!("{}", outline::render(service.nodes(), all));
        }
        Commands::Add {
            kind,
            parent,
            fields,
        } => {
            let node = fields
                .into_iter()
                .fold(Node::new(kind), |node, (key, value)| node.with_field(key, value));
            let cursor = service
                .add(parent.as_deref(), node)
                .ok_or_else(|| CliError::NotApplied {
                    action: "add",
                    cursor: parent.unwrap_or_default(),
                })?;
            service.save()?;
            println!("{cursor}");
        }
        Commands::Get { cursor, field } => {
            let node = service.get(&cursor).ok_or_else(|| CliError::NotApplied {
                action: "get",
                cursor: cursor.clone(),
            })?;
            let value = match field.as_deref() {
                Some(name) => node.field(name).unwrap_or(Value::Null),
                None => serde_json::to_value(node).unwrap_or(Value::Null),
            };
            println!("{value}");
        }
        Commands::Set {
            cursor,
            field,
            value,
        } => {
            let applied = service.set_field(&cursor, &field, parse_value(&value));
            commit(&service, applied, "set", cursor)?;
        }
        Commands::Delete { cursor } => {
            let applied = service.delete(&cursor);
            commit(&service, applied, "delete", cursor)?;
        }
        Commands::Restore { cursor } => {
            let applied = service.restore(&cursor);
            commit(&service, applied, "restore", cursor)?;
        }
        Commands::Move { cursor, direction } => {
            let applied = service.move_node(&cursor, direction);
            commit(&service, applied, direction.as_str(), cursor)?;
        }
        Commands::Export { base_name, dir } => {
            let file = service.export(&base_name, &DirectorySink::new(&dir))?;
            println!("{}", dir.join(&file.file_name).display());
        }
        Commands::Import {
            file,
            merge,
            required,
        } => {
            let mut options = ImportOptions {
                merge,
                ..ImportOptions::default()
            };
            if !required.is_empty() {
                options.required_fields = required;
            }
            let source = FsSource::new(file);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .map_err(CliError::Runtime)?;
            let outcome = runtime.block_on(service.import(Some(&source), &options))?;
            match outcome {
                ImportOutcome::Merged { count } => println!("merged {count} node(s)"),
                ImportOutcome::Replaced { count } => println!("replaced tree with {count} node(s)"),
                ImportOutcome::Unchanged => println!("file holds no nodes; nothing changed"),
                ImportOutcome::NothingSelected => println!("no file selected; nothing changed"),
            }
            if outcome.is_applied() {
                service.save()?;
            }
        }
        Commands::Version => {}
    }

    Ok(())
}

fn commit(
    service: &TreeService<SqliteStore<'_>>,
    applied: bool,
    action: &'static str,
    cursor: String,
) -> Result<(), CliError> {
    if !applied {
        return Err(CliError::NotApplied { action, cursor });
    }
    service.save()?;
    Ok(())
}

/// Reads `raw` as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_field_arg(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in `{raw}`"));
    }
    Ok((key.to_string(), parse_value(value)))
}

fn parse_direction_arg(raw: &str) -> Result<MoveDirection, String> {
    MoveDirection::parse(raw)
        .ok_or_else(|| format!("unknown direction `{raw}`; use backward, forward, upward or downward"))
}

#[cfg(test)]
mod tests {
    use super::{parse_direction_arg, parse_field_arg, parse_value, Cli, Commands};
    use clap::Parser;
    use nodetree_core::MoveDirection;
    use serde_json::json;

    #[test]
    fn values_fall_back_to_strings() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("{\"a\":true}"), json!({ "a": true }));
        assert_eq!(parse_value("plain words"), json!("plain words"));
    }

    #[test]
    fn field_args_need_a_name() {
        assert_eq!(
            parse_field_arg("title=hello").expect("valid field"),
            ("title".to_string(), json!("hello"))
        );
        assert!(parse_field_arg("=1").is_err());
        assert!(parse_field_arg("title").is_err());
    }

    #[test]
    fn direction_arg_rejects_unknown_names() {
        assert_eq!(
            parse_direction_arg("upward").expect("known direction"),
            MoveDirection::Upward
        );
        assert!(parse_direction_arg("sideways").is_err());
    }

    #[test]
    fn move_subcommand_parses() {
        let cli = Cli::try_parse_from(["nodetree", "--db", "t.db", "move", "0.1", "forward"])
            .expect("parse");
        match cli.command {
            Commands::Move { cursor, direction } => {
                assert_eq!(cursor, "0.1");
                assert_eq!(direction, MoveDirection::Forward);
            }
            _ => panic!("expected move"),
        }
    }

    #[test]
    fn get_subcommand_field_is_optional() {
        let cli = Cli::try_parse_from(["nodetree", "get", "2.0"]).expect("parse");
        match cli.command {
            Commands::Get { cursor, field } => {
                assert_eq!(cursor, "2.0");
                assert_eq!(field, None);
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn add_subcommand_collects_fields() {
        let cli = Cli::try_parse_from([
            "nodetree", "add", "-t", "note", "-p", "1", "-f", "title=x", "-f", "n=3",
        ])
        .expect("parse");
        match cli.command {
            Commands::Add {
                kind,
                parent,
                fields,
            } => {
                assert_eq!(kind, "note");
                assert_eq!(parent.as_deref(), Some("1"));
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1], ("n".to_string(), json!(3)));
            }
            _ => panic!("expected add"),
        }
    }
}
