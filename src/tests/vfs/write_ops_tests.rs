use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::*;
use crate::error::FsError;
use crate::markdown::{Block, BlockKind};
use crate::model::{ParentRef, RecordMeta, RemoteRecord};
use crate::remote::{Gateway, Listing, MemoryGateway};

fn setup() -> (Arc<MemoryGateway>, PathIndex) {
    let gw = Arc::new(MemoryGateway::new());
    gw.add_page("home", "Home", ParentRef::WorkspaceRoot);
    gw.add_collection("db1", "DB1", ParentRef::Page {
        id: RecordId("home".to_string()),
    });
    let index = PathIndex::new(gw.clone(), None, Duration::from_secs(60));
    index.refresh(true).expect("initial refresh");
    (gw, index)
}

#[test]
fn write_converts_and_replaces_content() {
    let (gw, index) = setup();
    index
        .write_file("/pages/home/index.md", "# Title\n\nbody text")
        .expect("write");

    let blocks = gw
        .read_content(&RecordId("home".to_string()))
        .expect("content");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::Heading1);
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);

    // Immediately-following reads are served from the refreshed cache.
    assert_eq!(
        index.read_file("/pages/home/index.md").expect("read"),
        "# Title\n\nbody text"
    );
    assert_eq!(gw.read_calls(), 0);
}

#[test]
fn concurrent_remote_edit_is_a_conflict() {
    let (gw, index) = setup();
    let home = RecordId("home".to_string());
    gw.set_content(&home, vec![Block::new(BlockKind::Paragraph, "original")]);

    // Observe the current version locally, then lose the race.
    index.read_file("/pages/home/index.md").expect("read");
    gw.touch(&home);

    let err = index
        .write_file("/pages/home/index.md", "stale overwrite")
        .expect_err("conflict");
    let FsError::Conflict { ours, theirs } = err else {
        panic!("expected conflict, got {err}");
    };
    assert_ne!(ours, theirs);

    // The remote content was never touched by the failed write.
    let blocks = gw.read_content(&home).expect("content");
    assert_eq!(blocks[0].text, "original");
}

#[test]
fn refresh_and_retry_after_conflict_succeeds() {
    let (gw, index) = setup();
    let home = RecordId("home".to_string());

    index.read_file("/pages/home/index.md").expect("read");
    gw.touch(&home);
    index
        .write_file("/pages/home/index.md", "first try")
        .expect_err("conflict");

    // Re-observe the remote version, then retry.
    index.refresh(true).expect("refresh");
    index.read_file("/pages/home/index.md").expect("re-read");
    index
        .write_file("/pages/home/index.md", "second try")
        .expect("retry succeeds");
}

#[test]
fn first_write_without_prior_observation_goes_through() {
    let (gw, index) = setup();
    gw.touch(&RecordId("home".to_string()));
    index
        .write_file("/pages/home/index.md", "fresh write")
        .expect("no prior observation, no conflict");
}

#[test]
fn two_optimistic_writers_second_one_loses() {
    let (gw, index) = setup();
    let home = RecordId("home".to_string());
    gw.set_content(&home, vec![Block::new(BlockKind::Paragraph, "v0")]);

    // Both sessions observe v0.
    index.read_file("/pages/home/index.md").expect("read");

    // Writer A commits; writer B still holds the pre-A observation only if
    // the cache were per-session, but the shared cache now reflects A. B's
    // conflict therefore comes from the remote stamp check after an external
    // edit.
    index.write_file("/pages/home/index.md", "A wins").expect("A");
    gw.touch(&home);
    index
        .write_file("/pages/home/index.md", "B loses")
        .expect_err("B conflicts");
}

/// Delegating gateway that, when armed, applies a remote edit in the middle
/// of a content read, after the caller has observed the metadata.
struct RacingGateway {
    inner: MemoryGateway,
    race: AtomicBool,
}

impl RacingGateway {
    fn new() -> Self {
        let inner = MemoryGateway::new();
        inner.add_page("home", "Home", ParentRef::WorkspaceRoot);
        Self {
            inner,
            race: AtomicBool::new(false),
        }
    }
}

impl Gateway for RacingGateway {
    fn list_records(&self, scope_root: Option<&RecordId>) -> Result<Listing, FsError> {
        self.inner.list_records(scope_root)
    }

    fn read_content(&self, id: &RecordId) -> Result<Vec<Block>, FsError> {
        if self.race.swap(false, Ordering::SeqCst) {
            self.inner
                .replace_content(id, &[Block::new(BlockKind::Paragraph, "remote edit")])?;
        }
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
fn edit_landing_mid_read_still_conflicts_the_next_write() {
    let gw = Arc::new(RacingGateway::new());
    let index = PathIndex::new(gw.clone(), None, Duration::from_secs(60));
    index.refresh(true).expect("initial refresh");
    let home = RecordId("home".to_string());
    gw.inner
        .set_content(&home, vec![Block::new(BlockKind::Paragraph, "v0")]);

    // The remote edit lands after the stamp observation but before the
    // content arrives; the stale stamp must make the next write conflict.
    gw.race.store(true, Ordering::SeqCst);
    index.read_file("/pages/home/index.md").expect("read");

    let err = index
        .write_file("/pages/home/index.md", "stale overwrite")
        .expect_err("conflict");
    assert!(matches!(err, FsError::Conflict { .. }));

    let blocks = gw.inner.read_content(&home).expect("content");
    assert_eq!(blocks[0].text, "remote edit");
}

#[test]
fn placeholders_and_directories_reject_writes() {
    let (_gw, index) = setup();
    let fp = crate::model::fingerprint(&RecordId("db1".to_string()));
    assert!(matches!(
        index.write_file(&format!("/pages/home/[db:{fp}]"), "x"),
        Err(FsError::ReadOnly(_))
    ));
    assert!(matches!(
        index.write_file("/pages/home", "x"),
        Err(FsError::NotAFile(_))
    ));
    assert!(matches!(
        index.write_file("/pages/missing/index.md", "x"),
        Err(FsError::NotFound(_))
    ));
}
