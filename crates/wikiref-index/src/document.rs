// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The document stored per crawled page.

use serde::{Deserialize, Serialize};
use wikiref_domains::{registered_domain, RankingLookup};

use crate::warc::{WarcRecord, WARC_DATE, WARC_RECORD_ID, WARC_REFERS_TO, WARC_TARGET_URI};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
	#[serde(rename = "warc-record-id")]
	pub record_id: String,
	#[serde(rename = "warc-date")]
	pub date: Option<String>,
	#[serde(rename = "warc-target-uri")]
	pub target_uri: String,
	#[serde(rename = "warc-refers-to")]
	pub refers_to: Option<String>,
	/// How often Wikidata cites the page's registered domain.
	#[serde(rename = "wikipedia-references-count")]
	pub references_count: Option<u64>,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
	/// Becomes the document `_id`.
	pub id: String,
	pub source: DocumentSource,
}

impl IndexDocument {
	/// `None` when the record lacks a record ID or target URI.
	pub fn from_record(record: &WarcRecord, ranking: &RankingLookup) -> Option<Self> {
		let record_id = record.header(WARC_RECORD_ID)?.to_string();
		let target_uri = record.header(WARC_TARGET_URI)?.to_string();
		let references_count = registered_domain(&target_uri).and_then(|d| ranking.get(&d).copied());

		Some(Self {
			id: record_id.clone(),
			source: DocumentSource {
				record_id,
				date: record.header(WARC_DATE).map(str::to_string),
				target_uri,
				refers_to: record.header(WARC_REFERS_TO).map(str::to_string),
				references_count,
				content: decode_utf8_dropping_invalid(&record.body),
			},
		})
	}
}

/// UTF-8 decode, skipping invalid byte sequences rather than replacing them.
pub fn decode_utf8_dropping_invalid(mut bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len());
	loop {
		match std::str::from_utf8(bytes) {
			Ok(valid) => {
				out.push_str(valid);
				return out;
			}
			Err(e) => {
				let (valid, rest) = bytes.split_at(e.valid_up_to());
				out.push_str(std::str::from_utf8(valid).unwrap_or_default());
				match e.error_len() {
					Some(len) => bytes = &rest[len..],
					None => return out,
				}
			}
		}
	}
}
