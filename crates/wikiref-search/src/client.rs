// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search backend client implementation.

use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument, trace};
use url::Url;
use wikiref_common_http::{build_client, BasicCredentials, TransportConfig};

use crate::error::SearchError;
use crate::query::{QueryBody, MAX_RESULTS};
use crate::types::{AltLabels, SearchHit, SearchOutcome, SearchRequest};

pub const DEFAULT_BASE_URL: &str = "https://localhost:9200";
pub const DEFAULT_INDEX: &str = "wikidata-references";
pub const DEFAULT_IDENTIFIER_FIELD: &str = "Q";

/// Client for the reference index.
///
/// Each call is one POST with no retry. Calls share nothing but the
/// underlying connection pool, so a client can be cloned across tasks.
#[derive(Debug, Clone)]
pub struct ReferenceSearchClient {
	http_client: Client,
	search_url: Url,
	credentials: Option<BasicCredentials>,
	identifier_field: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
	hits: ApiHits,
}

#[derive(Debug, Deserialize)]
struct ApiHits {
	hits: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
struct ApiHit {
	#[serde(rename = "_source", default)]
	source: ApiSource,
	#[serde(default)]
	highlight: Option<ApiHighlight>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSource {
	#[serde(rename = "warc-target-uri")]
	target_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiHighlight {
	#[serde(default)]
	content: Vec<String>,
}

impl From<ApiHit> for SearchHit {
	fn from(hit: ApiHit) -> Self {
		SearchHit {
			url: hit.source.target_uri.unwrap_or_default(),
			highlight: hit
				.highlight
				.and_then(|h| h.content.into_iter().next())
				.unwrap_or_default(),
		}
	}
}

impl ReferenceSearchClient {
	/// Creates a client for `{base_url}/{index}/_search`.
	pub fn new(
		base_url: &str,
		index: &str,
		transport: &TransportConfig,
	) -> Result<Self, SearchError> {
		Ok(Self {
			http_client: build_client(transport)?,
			search_url: search_url(base_url, index)?,
			credentials: None,
			identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
		})
	}

	pub fn with_credentials(mut self, credentials: BasicCredentials) -> Self {
		self.credentials = Some(credentials);
		self
	}

	/// Field compared against the request identifier when results are limited.
	pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
		self.identifier_field = field.into();
		self
	}

	pub fn search_url(&self) -> &Url {
		&self.search_url
	}

	/// Build the body that [`Self::search`] would send.
	pub fn build_query(&self, request: &SearchRequest) -> QueryBody {
		QueryBody::build(request, &self.identifier_field)
	}

	/// Runs the search and reports failures as a `false` success flag.
	///
	/// The error is logged here; callers only see an empty result list.
	pub async fn run(&self, request: &SearchRequest) -> SearchOutcome {
		match self.search(request).await {
			Ok(hits) => SearchOutcome::succeeded(hits),
			Err(e) => {
				error!(error = %e, kind = e.kind(), "Reference search failed");
				SearchOutcome::failed()
			}
		}
	}

	/// Positional form of [`Self::run`] returning `(documents, success)`.
	pub async fn search_references(
		&self,
		name: &str,
		property: &str,
		value: &str,
		identifier: &str,
		limit_search: bool,
		alt_labels: &AltLabels,
	) -> (Vec<SearchHit>, bool) {
		let request = SearchRequest {
			name: name.to_string(),
			property: property.to_string(),
			value: value.to_string(),
			identifier: identifier.to_string(),
			limit_search,
			alt_labels: alt_labels.clone(),
		};
		self.run(&request).await.into_parts()
	}

	/// Runs the search, keeping the failure reason.
	#[instrument(
		skip(self, request),
		fields(url = %self.search_url, limit_search = request.limit_search)
	)]
	pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
		let body = self.build_query(request);
		let payload = serde_json::to_string(&body)
			.map_err(|e| SearchError::InvalidConfig(format!("unserializable query: {e}")))?;

		debug!("Sending reference search request");
		trace!(body = %payload, "Query body");

		let mut http_request = self
			.http_client
			.post(self.search_url.clone())
			.header(header::CONTENT_TYPE, "application/json")
			.body(payload);
		if let Some(credentials) = &self.credentials {
			http_request = credentials.apply(http_request);
		}

		let response = http_request.send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Request timed out");
				return SearchError::Timeout;
			}
			error!(error = %e, "Network error during search request");
			SearchError::Network(e)
		})?;

		let status = response.status();
		debug!(status = %status, "Received response from search backend");

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();

			if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
				error!(status = status.as_u16(), "Search backend rejected credentials");
				return Err(SearchError::Unauthorized {
					status: status.as_u16(),
				});
			}

			error!(status = status.as_u16(), body = %body, "Search backend error");
			return Err(SearchError::ApiError {
				status: status.as_u16(),
				message: body,
			});
		}

		let body = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			SearchError::Network(e)
		})?;

		debug!(body = %body, "Search response");

		let parsed: ApiResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse search response");
			SearchError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		let hits: Vec<SearchHit> = parsed
			.hits
			.hits
			.into_iter()
			.take(MAX_RESULTS)
			.map(SearchHit::from)
			.collect();

		debug!(result_count = hits.len(), "Search completed successfully");
		Ok(hits)
	}
}

fn search_url(base_url: &str, index: &str) -> Result<Url, SearchError> {
	if index.is_empty() || index.contains('/') {
		return Err(SearchError::InvalidConfig(format!(
			"invalid index name '{index}'"
		)));
	}

	let mut url = Url::parse(base_url)
		.map_err(|e| SearchError::InvalidConfig(format!("invalid base URL '{base_url}': {e}")))?;
	if url.cannot_be_a_base() {
		return Err(SearchError::InvalidConfig(format!(
			"base URL '{base_url}' cannot carry a path"
		)));
	}

	url.path_segments_mut()
		.map_err(|_| SearchError::InvalidConfig(format!("invalid base URL '{base_url}'")))?
		.pop_if_empty()
		.push(index)
		.push("_search");
	Ok(url)
}
