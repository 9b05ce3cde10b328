//! In-process gateway used by tests and offline mode.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{Gateway, Listing};
use crate::error::FsError;
use crate::markdown::Block;
use crate::model::{ParentRef, RecordId, RecordKind, RecordMeta, RemoteRecord};

const EPOCH: i64 = 1_750_000_000;

#[derive(Default)]
struct MemoryState {
    records: HashMap<RecordId, RemoteRecord>,
    content: HashMap<RecordId, Vec<Block>>,
    next_id: u64,
}

#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    clock: AtomicU64,
    list_calls: AtomicU64,
    read_calls: AtomicU64,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn stamp(&self) -> String {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        OffsetDateTime::from_unix_timestamp(EPOCH + tick)
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| format!("tick-{tick}"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_page(&self, id: &str, title: &str, parent: ParentRef) -> RecordId {
        self.add_record(id, title, parent, RecordKind::Page)
    }

    pub fn add_collection(&self, id: &str, title: &str, parent: ParentRef) -> RecordId {
        self.add_record(id, title, parent, RecordKind::Collection)
    }

    fn add_record(&self, id: &str, title: &str, parent: ParentRef, kind: RecordKind) -> RecordId {
        let id = RecordId(id.to_string());
        let stamp = self.stamp();
        let record = RemoteRecord {
            id: id.clone(),
            kind,
            title: title.to_string(),
            parent,
            created_at: stamp.clone(),
            last_edited_at: stamp,
            owner: "remote".to_string(),
        };
        self.lock().records.insert(id.clone(), record);
        id
    }

    pub fn remove_record(&self, id: &RecordId) {
        let mut state = self.lock();
        state.records.remove(id);
        state.content.remove(id);
    }

    pub fn set_content(&self, id: &RecordId, blocks: Vec<Block>) {
        self.lock().content.insert(id.clone(), blocks);
    }

    /// Simulate a concurrent remote edit: bump the record's edit stamp.
    pub fn touch(&self, id: &RecordId) {
        let stamp = self.stamp();
        if let Some(record) = self.lock().records.get_mut(id) {
            record.last_edited_at = stamp;
        }
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl Gateway for MemoryGateway {
    fn list_records(&self, _scope_root: Option<&RecordId>) -> Result<Listing, FsError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        let mut listing = Listing::default();
        for record in state.records.values() {
            match record.kind {
                RecordKind::Page => listing.pages.push(record.clone()),
                RecordKind::Collection => listing.collections.push(record.clone()),
            }
        }
        Ok(listing)
    }

    fn read_content(&self, id: &RecordId) -> Result<Vec<Block>, FsError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if !state.records.contains_key(id) {
            return Err(FsError::Gateway(format!("no such record: {id}")));
        }
        Ok(state.content.get(id).cloned().unwrap_or_default())
    }

    fn replace_content(&self, id: &RecordId, blocks: &[Block]) -> Result<(), FsError> {
        let stamp = self.stamp();
        let mut state = self.lock();
        let record = state
            .records
            .get_mut(id)
            .ok_or_else(|| FsError::Gateway(format!("no such record: {id}")))?;
        record.last_edited_at = stamp;
        state.content.insert(id.clone(), blocks.to_vec());
        Ok(())
    }

    fn get_metadata(&self, id: &RecordId) -> Result<RecordMeta, FsError> {
        let state = self.lock();
        let record = state
            .records
            .get(id)
            .ok_or_else(|| FsError::Gateway(format!("no such record: {id}")))?;
        Ok(RecordMeta {
            last_edited_at: record.last_edited_at.clone(),
            owner: record.owner.clone(),
        })
    }

    fn create_record(&self, title: &str, parent: Option<&RecordId>) -> Result<RemoteRecord, FsError> {
        let stamp = self.stamp();
        let mut state = self.lock();
        state.next_id += 1;
        let id = RecordId(format!("mem-{:04}", state.next_id));
        let record = RemoteRecord {
            id: id.clone(),
            kind: RecordKind::Page,
            title: title.to_string(),
            parent: match parent {
                Some(p) => ParentRef::Page { id: p.clone() },
                None => ParentRef::WorkspaceRoot,
            },
            created_at: stamp.clone(),
            last_edited_at: stamp,
            owner: "local".to_string(),
        };
        state.records.insert(id.clone(), record.clone());
        state.content.insert(id, Vec::new());
        Ok(record)
    }
}
