use std::time::Instant;

use super::*;

/// Cached converted content for one record. The stamp is the remote's
/// last-edited timestamp observed when the content was fetched or written; it
/// is the unit of optimistic-conflict comparison.
#[derive(Clone, Debug)]
pub(super) struct CacheEntry {
    pub(super) content: String,
    pub(super) fetched_at: Instant,
    pub(super) stamp: String,
    pub(super) owner: String,
}

impl PathIndex {
    /// Content for `id` if a cache row exists and is inside the TTL window.
    pub(super) fn cached_content(&self, id: &RecordId) -> Option<String> {
        let cache = self.cache_lock();
        let entry = cache.get(id)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.content.clone())
        } else {
            None
        }
    }

    /// Last locally observed stamp for `id`, regardless of TTL: conflict
    /// detection compares observations, staleness does not invalidate them.
    pub(super) fn observed_stamp(&self, id: &RecordId) -> Option<String> {
        self.cache_lock().get(id).map(|e| e.stamp.clone())
    }

    /// Freshest locally known (stamp, owner) pair, if any.
    pub(super) fn cached_meta(&self, id: &RecordId) -> Option<(String, String)> {
        self.cache_lock()
            .get(id)
            .map(|e| (e.stamp.clone(), e.owner.clone()))
    }

    pub(super) fn store_entry(&self, id: &RecordId, content: String, stamp: String, owner: String) {
        self.cache_lock().insert(
            id.clone(),
            CacheEntry {
                content,
                fetched_at: Instant::now(),
                stamp,
                owner,
            },
        );
    }
}
