//! Tree node model.
//!
//! # Responsibility
//! - Define the typed structural header every node carries.
//! - Keep arbitrary domain fields in an insertion-ordered open map.
//!
//! # Invariants
//! - `visible == 0` is the only soft-delete marker; any other value is live.
//! - `children` stays `None` until the node first acquires a child.
//! - Structural keys (`type`, `visible`, `children`) never live in `fields`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node type value that marks a container node.
pub const FOLDER_TYPE: &str = "folder";
/// Serialized key of the node type.
pub const FIELD_TYPE: &str = "type";
/// Serialized key of the visibility flag.
pub const FIELD_VISIBLE: &str = "visible";
/// Serialized key of the children sequence.
pub const FIELD_CHILDREN: &str = "children";

const VISIBLE: i64 = 1;
const DELETED: i64 = 0;

fn default_visible() -> i64 {
    VISIBLE
}

/// One node of the tree.
///
/// Serialized as a flat JSON object: `{type, visible, ...fields, children?}`.
/// A missing `type` reads as the empty string and a missing `visible` reads
/// as live, so hand-written documents stay loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Serialized as `type`. `"folder"` marks a container.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Soft-delete flag. Zero means deleted.
    #[serde(default = "default_visible")]
    pub visible: i64,
    /// Domain fields opaque to the engine.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Owned child nodes, absent on most leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// Creates a live node of the given type with no domain fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            visible: VISIBLE,
            fields: Map::new(),
            children: None,
        }
    }

    /// Creates a live, empty folder.
    pub fn folder() -> Self {
        Self::new(FOLDER_TYPE)
    }

    /// Creates the blank node left behind in a slot a node was moved out of.
    ///
    /// The placeholder is soft-deleted, so it is never picked as a move
    /// partner and disappears at the next root-level save.
    pub fn placeholder() -> Self {
        Self {
            kind: String::new(),
            visible: DELETED,
            fields: Map::new(),
            children: None,
        }
    }

    /// Builder-style domain field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(&key.into(), value.into());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children_or_init().push(child);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER_TYPE
    }

    pub fn is_visible(&self) -> bool {
        self.visible != DELETED
    }

    /// Marks this node as softly deleted. Children are left untouched.
    pub fn soft_delete(&mut self) {
        self.visible = DELETED;
    }

    /// Clears the soft-delete flag.
    pub fn restore(&mut self) {
        self.visible = VISIBLE;
    }

    /// Returns the children sequence, creating it on first use.
    pub fn children_or_init(&mut self) -> &mut Vec<Node> {
        self.children.get_or_insert_with(Vec::new)
    }

    /// Reads one field as a JSON value, structural fields included.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            FIELD_TYPE => Some(Value::String(self.kind.clone())),
            FIELD_VISIBLE => Some(Value::from(self.visible)),
            FIELD_CHILDREN => self
                .children
                .as_ref()
                .and_then(|children| serde_json::to_value(children).ok()),
            other => self.fields.get(other).cloned(),
        }
    }

    /// Writes one field.
    ///
    /// Domain fields accept any value. Structural fields go through the typed
    /// header and reject values of the wrong JSON type: `type` needs a string,
    /// `visible` an integer, `children` an array of nodes or `null`.
    ///
    /// Returns `false` and leaves the node unchanged on rejection.
    pub fn set_field(&mut self, name: &str, value: Value) -> bool {
        match name {
            FIELD_TYPE => match value {
                Value::String(kind) => {
                    self.kind = kind;
                    true
                }
                _ => false,
            },
            FIELD_VISIBLE => match value.as_i64() {
                Some(visible) => {
                    self.visible = visible;
                    true
                }
                None => false,
            },
            FIELD_CHILDREN => {
                if value.is_null() {
                    self.children = None;
                    return true;
                }
                match serde_json::from_value::<Vec<Node>>(value) {
                    Ok(children) => {
                        self.children = Some(children);
                        true
                    }
                    Err(_) => false,
                }
            }
            other => {
                self.fields.insert(other.to_string(), value);
                true
            }
        }
    }
}
