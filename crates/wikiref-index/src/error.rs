// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the indexing pipeline.

use std::path::PathBuf;

use thiserror::Error;
use wikiref_common_http::HttpClientError;

#[derive(Debug, Error)]
pub enum IndexError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to read WARC stream: {0}")]
	Stream(#[from] std::io::Error),

	#[error("malformed WARC record: {0}")]
	MalformedRecord(String),

	#[error(transparent)]
	Domains(#[from] wikiref_domains::DomainError),

	#[error("invalid index configuration: {0}")]
	InvalidConfig(String),

	#[error("failed to build HTTP client: {0}")]
	Client(#[from] HttpClientError),

	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("bulk API error: {status} - {message}")]
	ApiError { status: u16, message: String },

	#[error("invalid bulk response: {0}")]
	InvalidResponse(String),

	#[error("indexing task failed: {0}")]
	Task(String),
}

impl IndexError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		IndexError::Io {
			path: path.into(),
			source,
		}
	}
}
