use anyhow::{Context, Result};

use crate::error::FsError;
use crate::markdown::Block;
use crate::model::{RecordId, RecordMeta, RemoteRecord};

mod http_client;
use self::http_client::with_retries;

mod types;
pub use self::types::*;

mod api;

mod memory;
pub use self::memory::MemoryGateway;

/// Everything the namespace index needs from the remote record store.
///
/// Wire mechanics (pagination, batching, backoff) live behind this seam; the
/// index only sees whole listings, fully materialized block trees and
/// lightweight metadata.
pub trait Gateway: Send + Sync {
    /// One full listing pass over every reachable record of both kinds.
    fn list_records(&self, scope_root: Option<&RecordId>) -> Result<Listing, FsError>;

    /// Fetch one record's block tree, nested children resolved recursively.
    fn read_content(&self, id: &RecordId) -> Result<Vec<Block>, FsError>;

    /// Archive the record's existing content, then append `blocks` in order.
    fn replace_content(&self, id: &RecordId, blocks: &[Block]) -> Result<(), FsError>;

    /// Metadata-only fetch used by the conflict check.
    fn get_metadata(&self, id: &RecordId) -> Result<RecordMeta, FsError>;

    fn create_record(&self, title: &str, parent: Option<&RecordId>) -> Result<RemoteRecord, FsError>;
}

#[derive(Clone, Debug, Default)]
pub struct Listing {
    pub pages: Vec<RemoteRecord>,
    pub collections: Vec<RemoteRecord>,
}

pub struct RemoteClient {
    base_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("notefs")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        })
    }
}
