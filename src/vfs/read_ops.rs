use super::*;
use crate::markdown;
use crate::model::NodeKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub struct NodeStat {
    pub path: String,
    pub kind: NodeKind,
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub last_edited_at: Option<String>,
    pub owner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrepMatch {
    pub path: String,
    pub line_number: usize,
    pub line: String,
}

fn kind_rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Directory => 0,
        NodeKind::File => 1,
        NodeKind::Placeholder => 2,
    }
}

impl PathIndex {
    /// Immediate children of a directory, directories first then by name.
    /// Listing a file or placeholder returns that single entry.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let tree = self.snapshot()?;
        let node = tree.require(path)?;
        if node.kind != NodeKind::Directory {
            return Ok(vec![entry_of(node)]);
        }
        let mut entries: Vec<DirEntry> = node
            .children
            .iter()
            .filter_map(|child| tree.node(child))
            .map(entry_of)
            .collect();
        entries.sort_by(|a, b| {
            kind_rank(a.kind)
                .cmp(&kind_rank(b.kind))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(entries)
    }

    pub fn stat(&self, path: &str) -> Result<NodeStat, FsError> {
        let tree = self.snapshot()?;
        let node = tree.require(path)?;
        let record = node.backing_id.as_ref().and_then(|id| tree.record(id));

        let mut stat = NodeStat {
            path: node.path.clone(),
            kind: node.kind,
            id: node.backing_id.clone(),
            title: record.map(|r| r.title.clone()),
            created_at: record.map(|r| r.created_at.clone()),
            last_edited_at: record.map(|r| r.last_edited_at.clone()),
            owner: record.map(|r| r.owner.clone()),
        };

        // A successful write refreshes the cache row from post-write
        // metadata, but a rebuild can also leave the snapshot newer than a
        // surviving row. RFC3339 stamps order lexically; keep the newer one.
        if let Some(id) = &node.backing_id
            && let Some((stamp, owner)) = self.cached_meta(id)
            && Some(&stamp) > stat.last_edited_at.as_ref()
        {
            stat.last_edited_at = Some(stamp);
            stat.owner = Some(owner);
        }
        Ok(stat)
    }

    /// File content as flat text, served from the TTL cache when possible.
    pub fn read_file(&self, path: &str) -> Result<String, FsError> {
        let tree = self.snapshot()?;
        let node = tree.require(path)?;
        match node.kind {
            NodeKind::Directory => return Err(FsError::NotAFile(path.to_string())),
            NodeKind::Placeholder => {
                let id = node.backing_id.as_ref().map(RecordId::as_str).unwrap_or("?");
                return Ok(format!("collection {id} is not mounted\n"));
            }
            NodeKind::File => {}
        }
        let id = node
            .backing_id
            .clone()
            .ok_or_else(|| FsError::Invariant(format!("file without backing record: {path}")))?;

        if let Some(content) = self.cached_content(&id) {
            return Ok(content);
        }

        // Stamp before content: an edit landing between the two calls leaves
        // a stale stamp behind, so the next write fails its conflict check
        // instead of overwriting the edit.
        let meta = self.gateway.get_metadata(&id)?;
        let blocks = self.gateway.read_content(&id)?;
        let content = markdown::render(&blocks);
        self.store_entry(&id, content.clone(), meta.last_edited_at, meta.owner);
        Ok(content)
    }

    /// Regex search over file content. Placeholders are skipped; recursive
    /// search walks the whole subtree, otherwise only immediate children.
    pub fn grep(
        &self,
        pattern: &str,
        path: &str,
        recursive: bool,
        ignore_case: bool,
    ) -> Result<Vec<GrepMatch>, FsError> {
        let re = regex::RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| FsError::Pattern(e.to_string()))?;

        let tree = self.snapshot()?;
        let node = tree.require(path)?;

        let mut files: Vec<String> = Vec::new();
        collect_files(&tree, node, recursive, true, &mut files);

        let mut matches = Vec::new();
        for file in files {
            let content = self.read_file(&file)?;
            for (i, line) in content.lines().enumerate() {
                if re.is_match(line) {
                    matches.push(GrepMatch {
                        path: file.clone(),
                        line_number: i + 1,
                        line: line.to_string(),
                    });
                }
            }
        }
        Ok(matches)
    }
}

fn entry_of(node: &NamespaceNode) -> DirEntry {
    DirEntry {
        name: node.name.clone(),
        path: node.path.clone(),
        kind: node.kind,
    }
}

fn collect_files(
    tree: &Tree,
    node: &NamespaceNode,
    recursive: bool,
    top: bool,
    out: &mut Vec<String>,
) {
    match node.kind {
        NodeKind::File => out.push(node.path.clone()),
        NodeKind::Placeholder => {}
        NodeKind::Directory => {
            if !top && !recursive {
                return;
            }
            for child in &node.children {
                if let Some(child_node) = tree.node(child) {
                    collect_files(tree, child_node, recursive, false, out);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/vfs/read_ops_tests.rs"]
mod tests;
