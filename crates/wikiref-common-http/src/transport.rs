// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Transport settings supplied by the caller.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wikiref_common_config::SecretString;

/// Whether server certificates are checked.
///
/// `Insecure` exists for local clusters with self-signed certificates. Prefer
/// [`TransportConfig::ca_cert`] where the CA is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsVerification {
	#[default]
	Verify,
	Insecure,
}

impl TlsVerification {
	pub fn from_insecure_flag(insecure: bool) -> Self {
		if insecure {
			Self::Insecure
		} else {
			Self::Verify
		}
	}

	pub fn is_insecure(self) -> bool {
		matches!(self, Self::Insecure)
	}
}

/// How outbound connections are made.
///
/// No timeout is applied unless one is set here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
	pub tls: TlsVerification,
	/// Extra PEM root certificate to trust.
	pub ca_cert: Option<PathBuf>,
	pub timeout: Option<Duration>,
}

impl TransportConfig {
	pub fn with_tls(mut self, tls: TlsVerification) -> Self {
		self.tls = tls;
		self
	}

	pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
		self.ca_cert = Some(path.into());
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}
}

/// HTTP basic authentication pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
	pub username: String,
	pub password: SecretString,
}

impl BasicCredentials {
	pub fn new(username: impl Into<String>, password: SecretString) -> Self {
		Self {
			username: username.into(),
			password,
		}
	}

	/// Attach these credentials to a request.
	pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
		request.basic_auth(&self.username, Some(self.password.expose()))
	}
}
