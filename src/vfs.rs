//! The path index: builds and serves the synthetic namespace from gateway
//! listings, owns the content cache and the refresh coordination.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use crate::error::FsError;
use crate::model::{NamespaceNode, RecordId, RemoteRecord};
use crate::remote::Gateway;

mod build;
mod cache;
use self::cache::CacheEntry;
mod create_ops;
mod path_ops;
pub use self::path_ops::{basename, dirname, join, normalize};
mod read_ops;
pub use self::read_ops::{DirEntry, GrepMatch, NodeStat};
mod refresh;
use self::refresh::RefreshCoordinator;
mod write_ops;

pub const CONTENT_FILE: &str = "index.md";
pub const MOUNT_DIR: &str = "/pages";

/// One immutable namespace snapshot, replaced wholesale on every refresh.
pub struct Tree {
    nodes: HashMap<String, NamespaceNode>,
    by_id: HashMap<RecordId, String>,
    records: HashMap<RecordId, RemoteRecord>,
}

impl Tree {
    pub fn node(&self, path: &str) -> Option<&NamespaceNode> {
        self.nodes.get(path)
    }

    pub fn require(&self, path: &str) -> Result<&NamespaceNode, FsError> {
        self.node(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    pub fn record(&self, id: &RecordId) -> Option<&RemoteRecord> {
        self.records.get(id)
    }

    pub fn path_of(&self, id: &RecordId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NamespaceNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Process-wide namespace state shared by every session.
///
/// Uninitialized at startup, populated by the first successful refresh,
/// atomically replaced thereafter. The content cache is keyed by record id
/// (paths shift across rebuilds, ids do not) and survives tree swaps.
pub struct PathIndex {
    gateway: Arc<dyn Gateway>,
    scope_root: Option<RecordId>,
    ttl: Duration,
    tree: RwLock<Option<Arc<Tree>>>,
    cache: Mutex<HashMap<RecordId, CacheEntry>>,
    refresh: RefreshCoordinator,
}

impl PathIndex {
    pub fn new(gateway: Arc<dyn Gateway>, scope_root: Option<RecordId>, ttl: Duration) -> Self {
        Self {
            gateway,
            scope_root,
            ttl,
            tree: RwLock::new(None),
            cache: Mutex::new(HashMap::new()),
            refresh: RefreshCoordinator::default(),
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.tree
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// The current snapshot, or NotIndexed before the first successful
    /// rebuild. Readers clone the Arc and keep serving the pre-swap tree
    /// while a refresh is in flight.
    pub fn snapshot(&self) -> Result<Arc<Tree>, FsError> {
        self.tree
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(FsError::NotIndexed)
    }

    fn swap_tree(&self, tree: Tree) {
        *self.tree.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(tree));
    }

    fn cache_lock(&self) -> MutexGuard<'_, HashMap<RecordId, CacheEntry>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
