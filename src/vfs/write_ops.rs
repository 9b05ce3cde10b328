//! The conflict-aware write path.

use super::*;
use crate::markdown;
use crate::model::NodeKind;

impl PathIndex {
    /// Replace a file's content remotely, guarded by an optimistic conflict
    /// check: if the remote's last-edited stamp diverged from the last local
    /// observation, the write fails naming both stamps. Never overwrites a
    /// concurrent remote edit silently.
    pub fn write_file(&self, path: &str, text: &str) -> Result<(), FsError> {
        let tree = self.snapshot()?;
        let node = tree.require(path)?;
        match node.kind {
            NodeKind::Directory => return Err(FsError::NotAFile(path.to_string())),
            NodeKind::Placeholder => return Err(FsError::ReadOnly(path.to_string())),
            NodeKind::File => {}
        }
        let id = node
            .backing_id
            .clone()
            .ok_or_else(|| FsError::Invariant(format!("file without backing record: {path}")))?;

        // Lightweight metadata fetch, not a content fetch.
        let meta = self.gateway.get_metadata(&id)?;
        if let Some(ours) = self.observed_stamp(&id)
            && ours != meta.last_edited_at
        {
            tracing::warn!(path, %id, %ours, theirs = %meta.last_edited_at, "write conflict");
            // The local observation lost; drop it so the caller's
            // refresh-and-retry re-reads the remote version first.
            self.cache_lock().remove(&id);
            return Err(FsError::Conflict {
                ours,
                theirs: meta.last_edited_at,
            });
        }

        let blocks = markdown::parse(text);
        self.gateway.replace_content(&id, &blocks)?;

        // Re-read post-write metadata so immediately-following reads are
        // consistent without another fetch.
        let post = self.gateway.get_metadata(&id)?;
        self.store_entry(&id, text.to_string(), post.last_edited_at, post.owner);
        tracing::info!(path, %id, blocks = blocks.len(), "wrote file");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/vfs/write_ops_tests.rs"]
mod tests;
