use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Directory,
    File,
    Placeholder,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Directory => "dir",
            NodeKind::File => "file",
            NodeKind::Placeholder => "placeholder",
        }
    }
}

/// One entry in the synthetic namespace tree. Paths are absolute,
/// slash-separated and unique; `children` holds absolute child paths and is
/// only populated for directories.
#[derive(Clone, Debug)]
pub struct NamespaceNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub parent_path: Option<String>,
    pub backing_id: Option<RecordId>,
    pub children: BTreeSet<String>,
}

impl NamespaceNode {
    pub fn dir(path: &str, parent: Option<&str>) -> Self {
        Self {
            path: path.to_string(),
            name: basename(path),
            kind: NodeKind::Directory,
            parent_path: parent.map(str::to_string),
            backing_id: None,
            children: BTreeSet::new(),
        }
    }

    pub fn file(path: &str, parent: &str, backing: RecordId) -> Self {
        Self {
            path: path.to_string(),
            name: basename(path),
            kind: NodeKind::File,
            parent_path: Some(parent.to_string()),
            backing_id: Some(backing),
            children: BTreeSet::new(),
        }
    }

    pub fn placeholder(path: &str, parent: &str, backing: RecordId) -> Self {
        Self {
            path: path.to_string(),
            name: basename(path),
            kind: NodeKind::Placeholder,
            parent_path: Some(parent.to_string()),
            backing_id: Some(backing),
            children: BTreeSet::new(),
        }
    }
}

fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}
