//! Export of the visible root sequence to a downloadable JSON file.
//!
//! # Invariants
//! - Root-level invisible nodes are dropped; nested ones are kept.
//! - File name is `<base>-<YYYYMMDD>T<HHMMSS>.json` in local time.

use crate::model::node::Node;
use crate::persist::encode_visible_roots;
use chrono::{Local, NaiveDateTime};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// MIME type attached to exported files.
pub const EXPORT_MIME_TYPE: &str = "application/json;charset=utf-8";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// One export payload handed to a [`DownloadSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Platform save/download trigger.
pub trait DownloadSink {
    fn deliver(&self, file: &ExportedFile) -> io::Result<()>;
}

/// Sink that writes exported files into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file: &ExportedFile) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(&file.file_name), &file.bytes)
    }
}

/// Errors from export.
#[derive(Debug)]
pub enum ExportError {
    Encode(serde_json::Error),
    Deliver { file_name: String, source: io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode export: {err}"),
            Self::Deliver { file_name, source } => {
                write!(f, "failed to deliver export `{file_name}`: {source}")
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Deliver { source, .. } => Some(source),
        }
    }
}

/// Builds `<base>-<YYYYMMDD>T<HHMMSS>.json`.
pub fn export_file_name(base_name: &str, at: NaiveDateTime) -> String {
    format!("{base_name}-{}.json", at.format(TIMESTAMP_FORMAT))
}

/// Exports the visible root sequence, stamped with the current local time.
pub fn export_nodes<D: DownloadSink + ?Sized>(
    nodes: &[Node],
    base_name: &str,
    sink: &D,
) -> Result<ExportedFile, ExportError> {
    export_nodes_at(nodes, base_name, Local::now().naive_local(), sink)
}

/// Exports the visible root sequence with an explicit timestamp.
pub fn export_nodes_at<D: DownloadSink + ?Sized>(
    nodes: &[Node],
    base_name: &str,
    at: NaiveDateTime,
    sink: &D,
) -> Result<ExportedFile, ExportError> {
    let encoded = encode_visible_roots(nodes).map_err(ExportError::Encode)?;
    let file = ExportedFile {
        file_name: export_file_name(base_name, at),
        mime_type: EXPORT_MIME_TYPE,
        bytes: encoded.into_bytes(),
    };

    if let Err(source) = sink.deliver(&file) {
        error!(
            "event=nodes_export module=transfer status=error file={} error={source}",
            file.file_name
        );
        return Err(ExportError::Deliver {
            file_name: file.file_name,
            source,
        });
    }

    info!(
        "event=nodes_export module=transfer status=ok file={} bytes={}",
        file.file_name,
        file.bytes.len()
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, export_nodes_at, DownloadSink, ExportedFile, EXPORT_MIME_TYPE};
    use crate::model::node::Node;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    struct RecordingSink {
        delivered: RefCell<Vec<ExportedFile>>,
    }

    impl DownloadSink for RecordingSink {
        fn deliver(&self, file: &ExportedFile) -> io::Result<()> {
            self.delivered.borrow_mut().push(file.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl DownloadSink for FailingSink {
        fn deliver(&self, _file: &ExportedFile) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(4, 5, 9))
            .expect("valid timestamp")
    }

    #[test]
    fn file_name_pads_every_component() {
        assert_eq!(export_file_name("notes", stamp()), "notes-20240307T040509.json");
    }

    #[test]
    fn export_drops_invisible_roots_and_hands_bytes_to_sink() {
        let mut hidden = Node::new("note");
        hidden.soft_delete();
        let nodes = vec![hidden, Node::new("note").with_field("title", "kept")];
        let sink = RecordingSink::default();

        let file = export_nodes_at(&nodes, "notes", stamp(), &sink).expect("export");
        assert_eq!(file.mime_type, EXPORT_MIME_TYPE);
        assert_eq!(
            String::from_utf8(file.bytes.clone()).expect("utf-8"),
            r#"[{"type":"note","visible":1,"title":"kept"}]"#
        );
        assert_eq!(sink.delivered.borrow().as_slice(), &[file]);
    }

    #[test]
    fn sink_failure_is_reported() {
        let err = export_nodes_at(&[], "notes", stamp(), &FailingSink).expect_err("must fail");
        assert!(err.to_string().contains("notes-20240307T040509.json"));
    }
}
