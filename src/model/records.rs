use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Page,
    Collection,
}

/// Where a record hangs in the remote hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParentRef {
    Page { id: RecordId },
    Collection { id: RecordId },
    WorkspaceRoot,
}

impl ParentRef {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            ParentRef::Page { id } | ParentRef::Collection { id } => Some(id),
            ParentRef::WorkspaceRoot => None,
        }
    }
}

/// Immutable snapshot of one remote content object, superseded wholesale on
/// each refresh.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub title: String,
    pub parent: ParentRef,
    pub created_at: String,
    pub last_edited_at: String,
    pub owner: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordMeta {
    pub last_edited_at: String,
    pub owner: String,
}
