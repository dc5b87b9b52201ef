// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for wikiref.
//!
//! Layers are merged in precedence order:
//! 1. Environment variables (`WIKIREF_*`)
//! 2. Config file (`--config` or `/etc/wikiref/wikiref.toml`)
//! 3. Built-in defaults
//!
//! ```ignore
//! let config = wikiref_config::load_config()?;
//! println!("searching {}/{}", config.search.url, config.search.index);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
	pub search: SearchConfig,
	pub logging: LoggingConfig,
	pub indexing: IndexingConfig,
}

/// Load from defaults, the system config file and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load with a custom config file path in place of the system one.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<Config, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<Config, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ConfigLayer) -> Result<Config, ConfigError> {
	let search = layer.search.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();
	let indexing = layer.indexing.unwrap_or_default().finalize()?;

	info!(
		url = %search.url,
		index = %search.index,
		credentials = search.credentials.is_some(),
		tls_insecure = search.tls.is_insecure(),
		"configuration loaded"
	);

	Ok(Config {
		search,
		logging,
		indexing,
	})
}
