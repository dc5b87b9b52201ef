// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Search backend configuration section.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wikiref_common_config::SecretString;
use wikiref_common_http::{BasicCredentials, TlsVerification, TransportConfig};
pub use wikiref_search::{DEFAULT_BASE_URL as DEFAULT_URL, DEFAULT_IDENTIFIER_FIELD, DEFAULT_INDEX};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfigLayer {
	pub url: Option<String>,
	pub index: Option<String>,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub identifier_field: Option<String>,
	pub insecure_skip_verify: Option<bool>,
	pub ca_cert: Option<PathBuf>,
	pub timeout_secs: Option<u64>,
}

impl SearchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.index.is_some() {
			self.index = other.index;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.identifier_field.is_some() {
			self.identifier_field = other.identifier_field;
		}
		if other.insecure_skip_verify.is_some() {
			self.insecure_skip_verify = other.insecure_skip_verify;
		}
		if other.ca_cert.is_some() {
			self.ca_cert = other.ca_cert;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<SearchConfig, ConfigError> {
		let url = self.url.unwrap_or_else(|| DEFAULT_URL.to_string());
		url::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
			key: "search.url".to_string(),
			message: format!("'{url}' is not a valid URL: {e}"),
		})?;

		let credentials = match (self.username, self.password) {
			(Some(username), Some(password)) => Some(BasicCredentials::new(username, password)),
			(None, None) => None,
			(Some(_), None) => {
				return Err(ConfigError::Validation(
					"search.username is set but search.password is missing".to_string(),
				))
			}
			(None, Some(_)) => {
				return Err(ConfigError::Validation(
					"search.password is set but search.username is missing".to_string(),
				))
			}
		};

		if self.timeout_secs == Some(0) {
			return Err(ConfigError::InvalidValue {
				key: "search.timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(SearchConfig {
			url,
			index: self.index.unwrap_or_else(|| DEFAULT_INDEX.to_string()),
			credentials,
			identifier_field: self
				.identifier_field
				.unwrap_or_else(|| DEFAULT_IDENTIFIER_FIELD.to_string()),
			tls: TlsVerification::from_insecure_flag(self.insecure_skip_verify.unwrap_or(false)),
			ca_cert: self.ca_cert,
			timeout: self.timeout_secs.map(Duration::from_secs),
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
	pub url: String,
	pub index: String,
	pub credentials: Option<BasicCredentials>,
	pub identifier_field: String,
	pub tls: TlsVerification,
	pub ca_cert: Option<PathBuf>,
	pub timeout: Option<Duration>,
}

impl SearchConfig {
	pub fn transport(&self) -> TransportConfig {
		TransportConfig {
			tls: self.tls,
			ca_cert: self.ca_cert.clone(),
			timeout: self.timeout,
		}
	}
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_URL.to_string(),
			index: DEFAULT_INDEX.to_string(),
			credentials: None,
			identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
			tls: TlsVerification::Verify,
			ca_cert: None,
			timeout: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wikiref_common_config::Secret;

	#[test]
	fn defaults_match_search_client() {
		let config = SearchConfig::default();
		assert_eq!(config.url, wikiref_search::DEFAULT_BASE_URL);
		assert_eq!(config.index, wikiref_search::DEFAULT_INDEX);
		assert_eq!(config.identifier_field, wikiref_search::DEFAULT_IDENTIFIER_FIELD);
	}

	#[test]
	fn defaults_verify_tls_and_have_no_credentials() {
		let config = SearchConfigLayer::default().finalize().unwrap();
		assert_eq!(config, SearchConfig::default());
		assert_eq!(config.tls, TlsVerification::Verify);
		assert!(config.credentials.is_none());
		assert!(config.timeout.is_none());
	}

	#[test]
	fn username_without_password_is_rejected() {
		let layer = SearchConfigLayer {
			username: Some("elastic".to_string()),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn password_without_username_is_rejected() {
		let layer = SearchConfigLayer {
			password: Some(Secret::new("pw".to_string())),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn invalid_url_is_rejected() {
		let layer = SearchConfigLayer {
			url: Some("not a url".to_string()),
			..Default::default()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let layer = SearchConfigLayer {
			timeout_secs: Some(0),
			..Default::default()
		};
		assert!(layer.finalize().is_err());
	}

	#[test]
	fn transport_reflects_settings() {
		let config = SearchConfigLayer {
			insecure_skip_verify: Some(true),
			ca_cert: Some(PathBuf::from("/etc/ssl/es-ca.pem")),
			timeout_secs: Some(30),
			..Default::default()
		}
		.finalize()
		.unwrap();

		let transport = config.transport();
		assert_eq!(transport.tls, TlsVerification::Insecure);
		assert_eq!(transport.ca_cert, Some(PathBuf::from("/etc/ssl/es-ca.pem")));
		assert_eq!(transport.timeout, Some(Duration::from_secs(30)));
	}

	#[test]
	fn merge_prefers_overlay_values() {
		let mut base = SearchConfigLayer {
			url: Some("https://old:9200".to_string()),
			index: Some("old-index".to_string()),
			..Default::default()
		};
		base.merge(SearchConfigLayer {
			url: Some("https://new:9200".to_string()),
			username: Some("elastic".to_string()),
			password: Some(Secret::new("pw".to_string())),
			..Default::default()
		});

		let config = base.finalize().unwrap();
		assert_eq!(config.url, "https://new:9200");
		assert_eq!(config.index, "old-index");
		assert_eq!(config.credentials.unwrap().username, "elastic");
	}

	#[test]
	fn deserializes_from_toml() {
		let layer: SearchConfigLayer = toml::from_str(
			r#"
url = "https://es.internal:9200"
username = "elastic"
password = "from-file"
insecure_skip_verify = true
"#,
		)
		.unwrap();
		let config = layer.finalize().unwrap();
		assert_eq!(config.url, "https://es.internal:9200");
		assert_eq!(
			config.credentials.unwrap().password.expose(),
			"from-file"
		);
		assert!(config.tls.is_insecure());
	}
}
