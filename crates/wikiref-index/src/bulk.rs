// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `_bulk` API client.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};
use url::Url;
use wikiref_common_http::{build_client, BasicCredentials, TransportConfig};

use crate::document::IndexDocument;
use crate::error::IndexError;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";
pub const DEFAULT_CHUNK_DOCUMENTS: usize = 500;
pub const DEFAULT_CHUNK_BYTES: usize = 100 * 1024 * 1024;

/// Per-request outcome of a bulk call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
	pub indexed: usize,
	pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct BulkIndexer {
	http_client: Client,
	bulk_url: Url,
	index: String,
	credentials: Option<BasicCredentials>,
	max_documents: usize,
	max_bytes: usize,
}

#[derive(Serialize)]
struct BulkAction<'a> {
	index: BulkTarget<'a>,
}

#[derive(Serialize)]
struct BulkTarget<'a> {
	#[serde(rename = "_index")]
	index: &'a str,
	#[serde(rename = "_id")]
	id: &'a str,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
	#[serde(default)]
	items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
	#[serde(alias = "create")]
	index: BulkItemResult,
}

#[derive(Debug, Deserialize)]
struct BulkItemResult {
	#[serde(rename = "_id", default)]
	id: Option<String>,
	status: u16,
	#[serde(default)]
	error: Option<serde_json::Value>,
}

impl BulkIndexer {
	pub fn new(base_url: &str, index: &str, transport: &TransportConfig) -> Result<Self, IndexError> {
		if index.is_empty() || index.contains('/') {
			return Err(IndexError::InvalidConfig(format!("invalid index name '{index}'")));
		}

		let mut bulk_url = Url::parse(base_url)
			.map_err(|e| IndexError::InvalidConfig(format!("invalid base URL '{base_url}': {e}")))?;
		bulk_url
			.path_segments_mut()
			.map_err(|_| IndexError::InvalidConfig(format!("base URL '{base_url}' cannot carry a path")))?
			.pop_if_empty()
			.push("_bulk");

		Ok(Self {
			http_client: build_client(transport)?,
			bulk_url,
			index: index.to_string(),
			credentials: None,
			max_documents: DEFAULT_CHUNK_DOCUMENTS,
			max_bytes: DEFAULT_CHUNK_BYTES,
		})
	}

	pub fn with_credentials(mut self, credentials: BasicCredentials) -> Self {
		self.credentials = Some(credentials);
		self
	}

	pub fn bulk_url(&self) -> &Url {
		&self.bulk_url
	}

	/// Per-request limits; a single document larger than `max_bytes` is still
	/// sent on its own.
	pub fn with_chunk_limits(mut self, max_documents: usize, max_bytes: usize) -> Self {
		self.max_documents = max_documents.max(1);
		self.max_bytes = max_bytes;
		self
	}

	/// Action and source line per document, newline terminated, split into
	/// request bodies within the chunk limits.
	pub fn ndjson_chunks(&self, documents: &[IndexDocument]) -> Result<Vec<String>, IndexError> {
		let encode = |e: serde_json::Error| IndexError::InvalidConfig(format!("unserializable document: {e}"));

		let mut chunks = Vec::new();
		let mut body = String::new();
		let mut count = 0usize;
		for doc in documents {
			let action = BulkAction {
				index: BulkTarget {
					index: &self.index,
					id: &doc.id,
				},
			};
			let mut pair = serde_json::to_string(&action).map_err(encode)?;
			pair.push('\n');
			pair.push_str(&serde_json::to_string(&doc.source).map_err(encode)?);
			pair.push('\n');

			if count > 0 && (count == self.max_documents || body.len() + pair.len() > self.max_bytes) {
				chunks.push(std::mem::take(&mut body));
				count = 0;
			}
			body.push_str(&pair);
			count += 1;
		}
		if count > 0 {
			chunks.push(body);
		}
		Ok(chunks)
	}

	/// Index `documents`, one request per chunk.
	///
	/// Transport and HTTP-level failures are errors and stop at the failing
	/// chunk; per-document rejections are only counted in
	/// [`BulkSummary::failed`].
	#[instrument(skip(self, documents), fields(url = %self.bulk_url, documents = documents.len()))]
	pub async fn index_documents(&self, documents: &[IndexDocument]) -> Result<BulkSummary, IndexError> {
		let mut summary = BulkSummary::default();
		for body in self.ndjson_chunks(documents)? {
			let chunk = self.send_chunk(body).await?;
			summary.indexed += chunk.indexed;
			summary.failed += chunk.failed;
		}
		Ok(summary)
	}

	async fn send_chunk(&self, body: String) -> Result<BulkSummary, IndexError> {
		debug!(bytes = body.len(), "Sending bulk request");
		let mut request = self
			.http_client
			.post(self.bulk_url.clone())
			.header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
			.body(body);
		if let Some(credentials) = &self.credentials {
			request = credentials.apply(request);
		}

		let response = request.send().await.map_err(|e| {
			error!(error = %e, "Network error during bulk request");
			IndexError::Network(e)
		})?;

		let status = response.status();
		debug!(status = %status, "Received bulk response");

		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			error!(status = status.as_u16(), body = %message, "Bulk request rejected");
			return Err(IndexError::ApiError {
				status: status.as_u16(),
				message,
			});
		}

		let parsed: BulkResponse = response.json().await.map_err(|e| {
			error!(error = %e, "Failed to parse bulk response");
			IndexError::InvalidResponse(e.to_string())
		})?;

		let mut summary = BulkSummary::default();
		for item in parsed.items {
			let result = item.index;
			if (200..300).contains(&result.status) && result.error.is_none() {
				summary.indexed += 1;
			} else {
				summary.failed += 1;
				warn!(
					id = result.id.as_deref().unwrap_or("?"),
					status = result.status,
					error = ?result.error,
					"Document rejected"
				);
			}
		}

		debug!(indexed = summary.indexed, failed = summary.failed, "Bulk request complete");
		Ok(summary)
	}
}
