// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use std::path::PathBuf;

use reqwest::{Certificate, Client, ClientBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::transport::TransportConfig;

#[derive(Debug, Error)]
pub enum HttpClientError {
	#[error("failed to read CA certificate {path}: {source}")]
	CaCertRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid CA certificate {path}: {source}")]
	CaCertParse {
		path: PathBuf,
		#[source]
		source: reqwest::Error,
	},

	#[error("failed to build HTTP client: {0}")]
	Build(#[source] reqwest::Error),
}

/// Creates a client builder with the wikiref User-Agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Builds a client honouring the caller's transport settings.
pub fn build_client(transport: &TransportConfig) -> Result<Client, HttpClientError> {
	let mut builder = builder();

	if let Some(timeout) = transport.timeout {
		builder = builder.timeout(timeout);
	}

	if let Some(path) = &transport.ca_cert {
		let pem = std::fs::read(path).map_err(|source| HttpClientError::CaCertRead {
			path: path.clone(),
			source,
		})?;
		let cert = Certificate::from_pem(&pem).map_err(|source| HttpClientError::CaCertParse {
			path: path.clone(),
			source,
		})?;
		debug!(path = %path.display(), "trusting additional CA certificate");
		builder = builder.add_root_certificate(cert);
	}

	if transport.tls.is_insecure() {
		warn!("TLS certificate verification disabled for outbound connections");
		builder = builder.danger_accept_invalid_certs(true);
	}

	builder.build().map_err(HttpClientError::Build)
}

/// Format: `wikiref/{version}`
pub fn user_agent() -> String {
	format!("wikiref/{}", env!("CARGO_PKG_VERSION"))
}
