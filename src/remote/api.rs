//! Gateway implementation over the record-store HTTP API.

use super::http_client::ApiError;
use super::*;
use crate::model::RecordKind;

// Appends are batched so a large document never exceeds one request's limits.
const APPEND_BATCH: usize = 50;

impl RemoteClient {
    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        label: &str,
    ) -> Result<T, ApiError> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(ApiError::transport)?;
        self.ensure_ok(resp, label)?
            .json()
            .map_err(|e| ApiError::fatal(anyhow::Error::new(e).context(format!("parse {label}"))))
    }

    fn fetch_children(&self, parent: &str) -> Result<Vec<Block>, FsError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page: BlockPage = with_retries(&format!("list blocks of {parent}"), || {
                let mut query: Vec<(&str, &str)> = Vec::new();
                if let Some(c) = cursor.as_deref() {
                    query.push(("cursor", c));
                }
                self.get_json(&format!("/blocks/{parent}/children"), &query, "list blocks")
            })
            .map_err(FsError::gateway)?;

            for wire in page.blocks {
                let mut block = wire.block;
                if wire.has_children
                    && let Some(id) = block.id.clone()
                {
                    block.children = self.fetch_children(&id)?;
                }
                blocks.push(block);
            }

            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => return Ok(blocks),
            }
        }
    }
}

impl Gateway for RemoteClient {
    fn list_records(&self, scope_root: Option<&RecordId>) -> Result<Listing, FsError> {
        let mut listing = Listing::default();
        let mut cursor: Option<String> = None;
        loop {
            let page: RecordPage = with_retries("list records", || {
                let mut query: Vec<(&str, &str)> = Vec::new();
                if let Some(root) = scope_root {
                    query.push(("root", root.as_str()));
                }
                if let Some(c) = cursor.as_deref() {
                    query.push(("cursor", c));
                }
                self.get_json("/records", &query, "list records")
            })
            .map_err(FsError::gateway)?;

            for record in page.records {
                match record.kind {
                    RecordKind::Page => listing.pages.push(record),
                    RecordKind::Collection => listing.collections.push(record),
                }
            }

            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => return Ok(listing),
            }
        }
    }

    fn read_content(&self, id: &RecordId) -> Result<Vec<Block>, FsError> {
        self.fetch_children(id.as_str())
    }

    fn replace_content(&self, id: &RecordId, blocks: &[Block]) -> Result<(), FsError> {
        // Clear-then-append: archive whatever is there, then append the new
        // tree in order. Idempotent full replacement, never a diff.
        let existing: BlockPage = with_retries("list existing blocks", || {
            self.get_json(
                &format!("/blocks/{}/children", id.as_str()),
                &[],
                "list existing blocks",
            )
        })
        .map_err(FsError::gateway)?;

        for wire in &existing.blocks {
            if let Some(block_id) = wire.block.id.as_deref() {
                with_retries(&format!("archive block {block_id}"), || {
                    let resp = self
                        .client
                        .delete(self.url(&format!("/blocks/{block_id}")))
                        .header(reqwest::header::AUTHORIZATION, self.auth())
                        .send()
                        .map_err(ApiError::transport)?;
                    self.ensure_ok(resp, "archive block").map(|_| ())
                })
                .map_err(FsError::gateway)?;
            }
        }

        for chunk in blocks.chunks(APPEND_BATCH) {
            with_retries("append blocks", || {
                let resp = self
                    .client
                    .post(self.url(&format!("/blocks/{}/children", id.as_str())))
                    .header(reqwest::header::AUTHORIZATION, self.auth())
                    .json(&AppendBlocksRequest { blocks: chunk })
                    .send()
                    .map_err(ApiError::transport)?;
                self.ensure_ok(resp, "append blocks").map(|_| ())
            })
            .map_err(FsError::gateway)?;
        }

        Ok(())
    }

    fn get_metadata(&self, id: &RecordId) -> Result<RecordMeta, FsError> {
        with_retries("get metadata", || {
            self.get_json(&format!("/records/{}/meta", id.as_str()), &[], "metadata")
        })
        .map_err(FsError::gateway)
    }

    fn create_record(&self, title: &str, parent: Option<&RecordId>) -> Result<RemoteRecord, FsError> {
        with_retries("create record", || {
            let resp = self
                .client
                .post(self.url("/records"))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .json(&CreateRecordRequest {
                    title,
                    parent_id: parent.map(RecordId::as_str),
                })
                .send()
                .map_err(ApiError::transport)?;
            self.ensure_ok(resp, "create record")?
                .json()
                .map_err(|e| ApiError::fatal(anyhow::Error::new(e).context("parse created record")))
        })
        .map_err(FsError::gateway)
    }
}
