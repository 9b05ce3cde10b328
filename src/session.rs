//! Per-connection edit session: a line-buffer state machine layered on the
//! path index read/write operations.
//!
//! idle -> editing -> (committing | cancelled) -> idle. The buffer is never
//! persisted except through an explicit commit, and commit leaves edit mode
//! regardless of the write outcome: a conflict surfaces as an error and the
//! caller re-enters edit to try again.

use std::sync::Arc;

use crate::error::FsError;
use crate::model::NodeKind;
use crate::vfs::{CONTENT_FILE, PathIndex, join};

enum State {
    Idle,
    Editing { path: String, lines: Vec<String> },
}

pub struct EditSession {
    index: Arc<PathIndex>,
    state: State,
}

impl EditSession {
    pub fn new(index: Arc<PathIndex>) -> Self {
        Self {
            index,
            state: State::Idle,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, State::Editing { .. })
    }

    pub fn target(&self) -> Option<&str> {
        match &self.state {
            State::Editing { path, .. } => Some(path),
            State::Idle => None,
        }
    }

    /// Enter edit mode on `path`. A directory edits its content file; a path
    /// that does not exist yet gets a fresh backing record first.
    pub fn open(&mut self, path: &str) -> Result<(), FsError> {
        if let State::Editing { path: current, .. } = &self.state {
            return Err(FsError::AlreadyEditing(current.clone()));
        }

        let tree = self.index.snapshot()?;
        let file_path = match tree.node(path) {
            Some(node) => match node.kind {
                NodeKind::File => path.to_string(),
                NodeKind::Directory => join(path, CONTENT_FILE),
                NodeKind::Placeholder => return Err(FsError::ReadOnly(path.to_string())),
            },
            None => {
                drop(tree);
                let mounted = self.index.create(path)?;
                join(&mounted, CONTENT_FILE)
            }
        };

        let content = self.index.read_file(&file_path)?;
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            content.lines().map(str::to_string).collect()
        };
        self.state = State::Editing {
            path: file_path,
            lines,
        };
        Ok(())
    }

    fn buffer_mut(&mut self) -> Result<&mut Vec<String>, FsError> {
        match &mut self.state {
            State::Editing { lines, .. } => Ok(lines),
            State::Idle => Err(FsError::NotEditing),
        }
    }

    pub fn lines(&self) -> Result<&[String], FsError> {
        match &self.state {
            State::Editing { lines, .. } => Ok(lines),
            State::Idle => Err(FsError::NotEditing),
        }
    }

    pub fn append_line(&mut self, text: &str) -> Result<(), FsError> {
        self.buffer_mut()?.push(text.to_string());
        Ok(())
    }

    /// Replace line `n` (1-based).
    pub fn replace_line(&mut self, n: usize, text: &str) -> Result<(), FsError> {
        let lines = self.buffer_mut()?;
        if n == 0 || n > lines.len() {
            return Err(FsError::LineOutOfRange(n, lines.len()));
        }
        lines[n - 1] = text.to_string();
        Ok(())
    }

    /// Delete line `n` (1-based).
    pub fn delete_line(&mut self, n: usize) -> Result<(), FsError> {
        let lines = self.buffer_mut()?;
        if n == 0 || n > lines.len() {
            return Err(FsError::LineOutOfRange(n, lines.len()));
        }
        lines.remove(n - 1);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), FsError> {
        self.buffer_mut()?.clear();
        Ok(())
    }

    /// Discard the buffer without writing.
    pub fn cancel(&mut self) -> Result<(), FsError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Editing { .. } => Ok(()),
            State::Idle => Err(FsError::NotEditing),
        }
    }

    /// Join the buffer and push it through the conflict-aware write path.
    /// Exits edit mode whether or not the write succeeds.
    pub fn commit(&mut self) -> Result<String, FsError> {
        let (path, lines) = match std::mem::replace(&mut self.state, State::Idle) {
            State::Editing { path, lines } => (path, lines),
            State::Idle => return Err(FsError::NotEditing),
        };
        let text = lines.join("\n");
        self.index.write_file(&path, &text)?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/session/session_tests.rs"]
mod tests;
