//! Cursor: dot-separated index path into the tree.
//!
//! `"2.3.5"` addresses the 6th child of the 4th child of the 3rd root node.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SEPARATOR: char = '.';

/// Parsed cursor. Always holds at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    segments: Vec<usize>,
}

/// Cursor text parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorParseError {
    Empty,
    InvalidSegment { position: usize, segment: String },
}

impl Display for CursorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "cursor must not be empty"),
            Self::InvalidSegment { position, segment } => write!(
                f,
                "cursor segment {position} is not a non-negative integer: `{segment}`"
            ),
        }
    }
}

impl Error for CursorParseError {}

impl Cursor {
    /// Cursor of one root-level slot.
    pub fn root(index: usize) -> Self {
        Self {
            segments: vec![index],
        }
    }

    /// Parses `segment ("." segment)*` where each segment is ASCII digits.
    pub fn parse(value: &str) -> Result<Self, CursorParseError> {
        if value.is_empty() {
            return Err(CursorParseError::Empty);
        }

        let segments = value
            .split(SEPARATOR)
            .enumerate()
            .map(|(position, segment)| parse_segment(position, segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    /// Nesting depth; root-level cursors have depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Index of the addressed slot within its sibling array.
    pub fn local_index(&self) -> usize {
        self.segments[self.segments.len() - 1]
    }

    /// Cursor of the parent node, `None` at root level.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Cursor of the child at `index` under this cursor.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index);
        Self { segments }
    }

    /// Cursor of the sibling at `index` in the same array.
    pub fn sibling(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        let last = segments.len() - 1;
        segments[last] = index;
        Self { segments }
    }
}

fn parse_segment(position: usize, segment: &str) -> Result<usize, CursorParseError> {
    let invalid = || CursorParseError::InvalidSegment {
        position,
        segment: segment.to_string(),
    };
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }
    segment.parse::<usize>().map_err(|_| invalid())
}

impl FromStr for Cursor {
    type Err = CursorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
