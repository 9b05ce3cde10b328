//! Creating new backing records for touch/mkdir.

use super::path_ops::{basename, dirname};
use super::*;
use crate::model::NodeKind;

impl PathIndex {
    /// Create a page record for `path` and return the path it mounted on.
    ///
    /// A page is simultaneously a directory and its content file, so touch
    /// and mkdir share this. The returned path is authoritative: collision
    /// suffixes can shift the name away from the naive slug. Creating a path
    /// that already exists is a no-op returning the existing path.
    pub fn create(&self, path: &str) -> Result<String, FsError> {
        let tree = self.snapshot()?;
        if tree.node(path).is_some() {
            return Ok(path.to_string());
        }

        let parent_path = dirname(path);
        if parent_path == "/" {
            return Err(FsError::ReadOnly("/".to_string()));
        }
        let parent = tree.require(parent_path)?;
        if parent.kind != NodeKind::Directory {
            return Err(FsError::NotADirectory(parent_path.to_string()));
        }

        let name = basename(path);
        let title = name.strip_suffix(".md").unwrap_or(name).to_string();
        let parent_id = parent.backing_id.clone();
        drop(tree);

        let record = self.gateway.create_record(&title, parent_id.as_ref())?;
        tracing::info!(%record.id, %title, "created record");

        // The new record only materializes in the namespace after a rebuild.
        self.refresh(true)?;
        let tree = self.snapshot()?;
        tree.path_of(&record.id)
            .map(str::to_string)
            .ok_or_else(|| {
                FsError::Invariant(format!("created record {} did not mount", record.id))
            })
    }
}

#[cfg(test)]
#[path = "../tests/vfs/create_ops_tests.rs"]
mod tests;
