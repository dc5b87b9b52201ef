// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the reference search client.

use thiserror::Error;
use wikiref_common_http::HttpClientError;

/// Why a search failed.
///
/// [`crate::ReferenceSearchClient::search_references`] folds all of these
/// into `success == false`; [`crate::ReferenceSearchClient::search`] returns
/// them as is.
#[derive(Debug, Error)]
pub enum SearchError {
	/// Bad base URL or index name.
	#[error("invalid search configuration: {0}")]
	InvalidConfig(String),

	#[error("failed to build HTTP client: {0}")]
	Client(#[from] HttpClientError),

	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("request timed out")]
	Timeout,

	/// 401 or 403 from the backend.
	#[error("search backend rejected credentials (status {status})")]
	Unauthorized { status: u16 },

	#[error("search backend error: {status} - {message}")]
	ApiError { status: u16, message: String },

	#[error("invalid response from search backend: {0}")]
	InvalidResponse(String),
}

impl SearchError {
	/// Short label for logs and metrics.
	pub fn kind(&self) -> &'static str {
		match self {
			SearchError::InvalidConfig(_) => "invalid_config",
			SearchError::Client(_) => "client",
			SearchError::Network(_) => "network",
			SearchError::Timeout => "timeout",
			SearchError::Unauthorized { .. } => "unauthorized",
			SearchError::ApiError { .. } => "api_error",
			SearchError::InvalidResponse(_) => "invalid_response",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_carry_status() {
		let err = SearchError::ApiError {
			status: 503,
			message: "cluster unavailable".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"search backend error: 503 - cluster unavailable"
		);
		assert_eq!(err.kind(), "api_error");
	}

	#[test]
	fn unauthorized_kind() {
		let err = SearchError::Unauthorized { status: 401 };
		assert_eq!(err.kind(), "unauthorized");
		assert!(err.to_string().contains("401"));
	}
}
