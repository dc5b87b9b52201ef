// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Query text composition and the JSON query body.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::SearchRequest;

/// Upper bound on returned documents.
pub const MAX_RESULTS: usize = 3;

pub const CONTENT_FIELD: &str = "content";
pub const TARGET_URI_FIELD: &str = "warc-target-uri";

/// `"{name} {property} {alt labels}{value}"` with every `:` removed.
///
/// Colons are reserved by the backend's query syntax.
pub fn compose_query_text(request: &SearchRequest) -> String {
	let text = format!(
		"{} {} {}{}",
		request.name,
		request.property,
		request.alt_labels.as_query_fragment(),
		request.value
	);
	text.replace(':', "")
}

/// Body POSTed to `{index}/_search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryBody {
	pub size: usize,
	pub query: Query,
	#[serde(rename = "_source")]
	pub source: Vec<String>,
	pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
	pub bool: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolQuery {
	pub must: Vec<MatchClause>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub filter: Vec<MatchClause>,
}

/// `{"match": {field: text}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchClause {
	#[serde(rename = "match")]
	pub fields: BTreeMap<String, String>,
}

impl MatchClause {
	pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			fields: BTreeMap::from([(field.into(), text.into())]),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
	pub fields: BTreeMap<String, HighlightField>,
}

/// Backend defaults for fragment size and count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightField {}

impl QueryBody {
	/// Build the body for `request`. `identifier_field` names the indexed field
	/// compared against `request.identifier` when `limit_search` is set.
	pub fn build(request: &SearchRequest, identifier_field: &str) -> Self {
		let filter = if request.limit_search {
			vec![MatchClause::new(identifier_field, request.identifier.clone())]
		} else {
			Vec::new()
		};

		Self {
			size: MAX_RESULTS,
			query: Query {
				bool: BoolQuery {
					must: vec![MatchClause::new(
						CONTENT_FIELD,
						compose_query_text(request),
					)],
					filter,
				},
			},
			source: vec![TARGET_URI_FIELD.to_string(), CONTENT_FIELD.to_string()],
			highlight: Highlight {
				fields: BTreeMap::from([(CONTENT_FIELD.to_string(), HighlightField::default())]),
			},
		}
	}

	/// The text sent as the `content` match value.
	pub fn match_text(&self) -> Option<&str> {
		self.query
			.bool
			.must
			.first()
			.and_then(|clause| clause.fields.get(CONTENT_FIELD))
			.map(String::as_str)
	}

	pub fn has_identifier_filter(&self) -> bool {
		!self.query.bool.filter.is_empty()
	}
}
