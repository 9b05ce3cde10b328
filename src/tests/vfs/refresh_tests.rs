use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::*;
use crate::error::FsError;
use crate::markdown::Block;
use crate::model::{ParentRef, RecordMeta, RemoteRecord};
use crate::remote::{Gateway, Listing, MemoryGateway};

/// Delegating gateway that slows listing down and can be told to fail, so
/// tests can observe in-flight and aborted rebuilds.
struct ThrottledGateway {
    inner: MemoryGateway,
    delay: Duration,
    fail: AtomicBool,
}

impl ThrottledGateway {
    fn new(delay: Duration) -> Self {
        let inner = MemoryGateway::new();
        inner.add_page("home", "Home", ParentRef::WorkspaceRoot);
        Self {
            inner,
            delay,
            fail: AtomicBool::new(false),
        }
    }
}

impl Gateway for ThrottledGateway {
    fn list_records(&self, scope_root: Option<&RecordId>) -> Result<Listing, FsError> {
        std::thread::sleep(self.delay);
        if self.fail.load(Ordering::SeqCst) {
            return Err(FsError::Gateway("listing unavailable".to_string()));
        }
        self.inner.list_records(scope_root)
    }

    fn read_content(&self, id: &RecordId) -> Result<Vec<Block>, FsError> {
        self.inner.read_content(id)
    }

    fn replace_content(&self, id: &RecordId, blocks: &[Block]) -> Result<(), FsError> {
        self.inner.replace_content(id, blocks)
    }

    fn get_metadata(&self, id: &RecordId) -> Result<RecordMeta, FsError> {
        self.inner.get_metadata(id)
    }

    fn create_record(&self, title: &str, parent: Option<&RecordId>) -> Result<RemoteRecord, FsError> {
        self.inner.create_record(title, parent)
    }
}

#[test]
fn concurrent_refreshes_coalesce_into_one_listing_pass() {
    let gw = Arc::new(ThrottledGateway::new(Duration::from_millis(150)));
    let index = Arc::new(PathIndex::new(gw.clone(), None, Duration::from_secs(60)));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let index = Arc::clone(&index);
            scope.spawn(move || index.refresh(false).expect("refresh"));
        }
    });

    assert!(index.is_indexed());
    assert_eq!(gw.inner.list_calls(), 1);
}

#[test]
fn refresh_within_ttl_is_a_no_op_unless_forced() {
    let gw = Arc::new(ThrottledGateway::new(Duration::ZERO));
    let index = PathIndex::new(gw.clone(), None, Duration::from_secs(60));

    index.refresh(true).expect("first");
    index.refresh(false).expect("no-op");
    assert_eq!(gw.inner.list_calls(), 1);

    index.refresh(true).expect("forced");
    assert_eq!(gw.inner.list_calls(), 2);
}

#[test]
fn failed_rebuild_keeps_serving_the_last_good_tree() {
    let gw = Arc::new(ThrottledGateway::new(Duration::ZERO));
    let index = PathIndex::new(gw.clone(), None, Duration::from_secs(60));
    index.refresh(true).expect("first");

    gw.fail.store(true, Ordering::SeqCst);
    assert!(matches!(index.refresh(true), Err(FsError::Gateway(_))));

    assert!(index.is_indexed());
    assert!(index.list("/pages/home").is_ok());
}

#[test]
fn reads_are_served_from_the_previous_tree_mid_refresh() {
    let gw = Arc::new(ThrottledGateway::new(Duration::from_millis(200)));
    let index = Arc::new(PathIndex::new(gw, None, Duration::from_secs(60)));
    index.refresh(true).expect("warm up");

    std::thread::scope(|scope| {
        let bg = Arc::clone(&index);
        scope.spawn(move || bg.refresh(true).expect("forced refresh"));

        std::thread::sleep(Duration::from_millis(50));
        assert!(index.is_refreshing());
        assert!(index.list("/pages/home").is_ok());
    });
    assert!(!index.is_refreshing());
}
