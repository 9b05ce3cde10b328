//! DTOs for the record-store API requests/responses.

use serde::{Deserialize, Serialize};

use crate::markdown::Block;
use crate::model::RemoteRecord;

#[derive(Debug, Deserialize)]
pub struct RecordPage {
    pub records: Vec<RemoteRecord>,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockPage {
    pub blocks: Vec<WireBlock>,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireBlock {
    #[serde(flatten)]
    pub block: Block,

    #[serde(default)]
    pub has_children: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct AppendBlocksRequest<'a> {
    pub(super) blocks: &'a [Block],
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRecordRequest<'a> {
    pub(super) title: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) parent_id: Option<&'a str>,
}
