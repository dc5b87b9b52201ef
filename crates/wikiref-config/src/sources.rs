// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};
use wikiref_common_config::load_secret_env;

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::sections::{IndexingConfigLayer, LogFormat, LoggingConfigLayer, SearchConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ConfigLayer::default())
	}
}

/// TOML file source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/wikiref/wikiref.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `WIKIREF_<SECTION>_<FIELD>`. The search password also honours
/// `WIKIREF_SEARCH_PASSWORD_FILE`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ConfigLayer {
			search: Some(load_search_from_env()?),
			logging: Some(load_logging_from_env()?),
			indexing: Some(load_indexing_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_search_from_env() -> Result<SearchConfigLayer, ConfigError> {
	Ok(SearchConfigLayer {
		url: env_var("WIKIREF_SEARCH_URL"),
		index: env_var("WIKIREF_SEARCH_INDEX"),
		username: env_var("WIKIREF_SEARCH_USERNAME"),
		password: load_secret_env("WIKIREF_SEARCH_PASSWORD")?,
		identifier_field: env_var("WIKIREF_SEARCH_IDENTIFIER_FIELD"),
		insecure_skip_verify: env_bool("WIKIREF_SEARCH_INSECURE_SKIP_VERIFY"),
		ca_cert: env_var("WIKIREF_SEARCH_CA_CERT").map(PathBuf::from),
		timeout_secs: env_parse("WIKIREF_SEARCH_TIMEOUT_SECS", "u64")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("WIKIREF_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| {
			ConfigError::InvalidValue {
				key: "WIKIREF_LOG_FORMAT".to_string(),
				message,
			}
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("WIKIREF_LOG_LEVEL"),
		format,
	})
}

fn load_indexing_from_env() -> Result<IndexingConfigLayer, ConfigError> {
	Ok(IndexingConfigLayer {
		batch_size: env_parse("WIKIREF_INDEX_BATCH_SIZE", "usize")?,
		checkpoint_file: env_var("WIKIREF_INDEX_CHECKPOINT_FILE").map(PathBuf::from),
		wet_dir: env_var("WIKIREF_INDEX_WET_DIR").map(PathBuf::from),
		wet_paths: env_var("WIKIREF_INDEX_WET_PATHS").map(PathBuf::from),
		ranking_file: env_var("WIKIREF_INDEX_RANKING_FILE").map(PathBuf::from),
		top_domains_file: env_var("WIKIREF_INDEX_TOP_DOMAINS_FILE").map(PathBuf::from),
		top_domains_limit: env_parse("WIKIREF_INDEX_TOP_DOMAINS_LIMIT", "usize")?,
	})
}
