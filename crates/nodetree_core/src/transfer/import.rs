//! Import of a node sequence from a user-selected JSON file.
//!
//! # Responsibility
//! - Read the file asynchronously, parse, validate required fields.
//! - Merge into or replace the root sequence.
//!
//! # Invariants
//! - The tree is untouched unless the whole import succeeds.
//! - Load failures and format failures are distinct error kinds.
//! - A valid but empty (or non-sequence) document changes nothing and is not
//!   reported as a success.
//! - A parse failure stops the import; the validator never runs on it, so a
//!   single bad file yields exactly one format error.
//! - Under the tolerant policy a `children` value that is not a sequence
//!   imports as a leaf.
//! - A selection with no files is ignored; a selection that yields no file
//!   is a load error.

use super::source::ImportSource;
use crate::model::node::{Node, FIELD_CHILDREN, FIELD_TYPE, FIELD_VISIBLE};
use crate::tree::validate::{all_fields_present, ValidationPolicy};
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Import configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Keys every imported node, descendants included, must carry.
    pub required_fields: Vec<String>,
    /// `true` appends to the root sequence; `false` replaces it.
    pub merge: bool,
    /// Treatment of malformed `children` values during validation.
    pub policy: ValidationPolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            required_fields: vec![FIELD_TYPE.to_string(), FIELD_VISIBLE.to_string()],
            merge: false,
            policy: ValidationPolicy::default(),
        }
    }
}

impl ImportOptions {
    pub fn merging() -> Self {
        Self {
            merge: true,
            ..Self::default()
        }
    }
}

/// Successful import result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// `count` nodes were appended to the root sequence.
    Merged { count: usize },
    /// The root sequence now holds exactly the `count` imported nodes.
    Replaced { count: usize },
    /// Document was valid but held no nodes; nothing changed.
    Unchanged,
    /// The selection event held no files; nothing was read.
    NothingSelected,
}

impl ImportOutcome {
    /// Whether the tree was modified.
    pub fn is_applied(self) -> bool {
        !matches!(self, Self::Unchanged | Self::NothingSelected)
    }
}

/// The selected file could not be read.
#[derive(Debug)]
pub enum LoadError {
    /// A selection happened but carried no file.
    NoFile,
    Read { name: String, source: io::Error },
}

/// The file content is not an acceptable node document.
#[derive(Debug)]
pub enum FormatError {
    Parse(serde_json::Error),
    MissingFields,
    /// Nodes carry the required keys but do not fit the node schema.
    InvalidNode(serde_json::Error),
}

/// Errors from import.
#[derive(Debug)]
pub enum ImportError {
    Load(LoadError),
    Format(FormatError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFile => write!(f, "no file selected"),
            Self::Read { name, source } => write!(f, "cannot load file `{name}`: {source}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoFile => None,
            Self::Read { source, .. } => Some(source),
        }
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "file is not valid JSON: {err}"),
            Self::MissingFields => write!(f, "file nodes are missing required fields"),
            Self::InvalidNode(err) => write!(f, "file nodes do not match node schema: {err}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingFields => None,
            Self::InvalidNode(err) => Some(err),
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}

impl From<LoadError> for ImportError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<FormatError> for ImportError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

/// Imports nodes from `file` into `nodes`.
///
/// `file == None` models a non-empty selection that still carried no file;
/// use [`import_selection`] for raw selection events. The only
/// suspension point is the file read; all tree mutation happens after it,
/// synchronously.
pub async fn import_nodes(
    nodes: &mut Vec<Node>,
    file: Option<&dyn ImportSource>,
    options: &ImportOptions,
) -> Result<ImportOutcome, ImportError> {
    let Some(file) = file else {
        warn!("event=nodes_import module=transfer status=error error_code=no_file");
        return Err(LoadError::NoFile.into());
    };

    let text = file.read_text().await.map_err(|source| {
        warn!(
            "event=nodes_import module=transfer status=error error_code=load_failed file={} error={source}",
            file.name()
        );
        LoadError::Read {
            name: file.name().to_string(),
            source,
        }
    })?;

    let imported = parse_document(&text, options).map_err(|err| {
        warn!(
            "event=nodes_import module=transfer status=error error_code=format_invalid file={} error={err}",
            file.name()
        );
        err
    })?;
    let Some(imported) = imported else {
        info!(
            "event=nodes_import module=transfer status=skip file={} reason=empty",
            file.name()
        );
        return Ok(ImportOutcome::Unchanged);
    };

    let outcome = if options.merge {
        merge_nodes(nodes, imported)
    } else {
        replace_nodes(nodes, imported)
    };
    info!(
        "event=nodes_import module=transfer status=ok file={} outcome={outcome:?} roots={}",
        file.name(),
        nodes.len()
    );
    Ok(outcome)
}

/// Imports the first file of a selection event.
///
/// An empty selection is not an error and leaves `nodes` untouched. Only
/// the first file is read; any others are ignored.
pub async fn import_selection(
    nodes: &mut Vec<Node>,
    files: &[&dyn ImportSource],
    options: &ImportOptions,
) -> Result<ImportOutcome, ImportError> {
    match files.first() {
        Some(file) => import_nodes(nodes, Some(*file), options).await,
        None => {
            debug!("event=nodes_import module=transfer status=skip reason=no_selection");
            Ok(ImportOutcome::NothingSelected)
        }
    }
}

/// Parses and validates import text.
///
/// Returns `Ok(None)` for a valid document that holds no nodes.
pub fn parse_document(
    text: &str,
    options: &ImportOptions,
) -> Result<Option<Vec<Node>>, FormatError> {
    let mut document: Value = serde_json::from_str(text).map_err(FormatError::Parse)?;
    if !all_fields_present(&document, options.required_fields.as_slice(), options.policy) {
        return Err(FormatError::MissingFields);
    }
    if options.policy.tolerate_malformed_children {
        if let Value::Array(items) = &mut document {
            drop_malformed_children(items);
        }
    }

    match document {
        Value::Array(items) if !items.is_empty() => {
            serde_json::from_value::<Vec<Node>>(Value::Array(items))
                .map(Some)
                .map_err(FormatError::InvalidNode)
        }
        _ => Ok(None),
    }
}

/// Removes every `children` value that is neither an array nor `null`, so a
/// subtree the validator let through decodes as a leaf.
fn drop_malformed_children(items: &mut [Value]) {
    for item in items {
        let Some(object) = item.as_object_mut() else {
            continue;
        };
        let malformed = match object.get_mut(FIELD_CHILDREN) {
            Some(Value::Array(children)) => {
                drop_malformed_children(children);
                false
            }
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if malformed {
            object.remove(FIELD_CHILDREN);
        }
    }
}

fn merge_nodes(nodes: &mut Vec<Node>, imported: Vec<Node>) -> ImportOutcome {
    let count = imported.len();
    nodes.extend(imported);
    ImportOutcome::Merged { count }
}

fn replace_nodes(nodes: &mut Vec<Node>, imported: Vec<Node>) -> ImportOutcome {
    let count = imported.len();
    nodes.truncate(count);
    for (index, node) in imported.into_iter().enumerate() {
        match nodes.get_mut(index) {
            Some(slot) => *slot = node,
            None => nodes.push(node),
        }
    }
    ImportOutcome::Replaced { count }
}
