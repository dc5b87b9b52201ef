// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulk indexing configuration section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_CHECKPOINT_FILE: &str = "checkpoint.txt";
pub const DEFAULT_WET_DIR: &str = "documents/wet/docs";
pub const DEFAULT_WET_PATHS: &str = "documents/wet/filtered_wet_docs_paths.txt";
pub const DEFAULT_RANKING_FILE: &str = "domains/top_domains.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexingConfigLayer {
	pub batch_size: Option<usize>,
	pub checkpoint_file: Option<PathBuf>,
	pub wet_dir: Option<PathBuf>,
	pub wet_paths: Option<PathBuf>,
	pub ranking_file: Option<PathBuf>,
	pub top_domains_file: Option<PathBuf>,
	pub top_domains_limit: Option<usize>,
}

impl IndexingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.batch_size.is_some() {
			self.batch_size = other.batch_size;
		}
		if other.checkpoint_file.is_some() {
			self.checkpoint_file = other.checkpoint_file;
		}
		if other.wet_dir.is_some() {
			self.wet_dir = other.wet_dir;
		}
		if other.wet_paths.is_some() {
			self.wet_paths = other.wet_paths;
		}
		if other.ranking_file.is_some() {
			self.ranking_file = other.ranking_file;
		}
		if other.top_domains_file.is_some() {
			self.top_domains_file = other.top_domains_file;
		}
		if other.top_domains_limit.is_some() {
			self.top_domains_limit = other.top_domains_limit;
		}
	}

	pub fn finalize(self) -> Result<IndexingConfig, ConfigError> {
		let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
		if batch_size == 0 {
			return Err(ConfigError::InvalidValue {
				key: "indexing.batch_size".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(IndexingConfig {
			batch_size,
			checkpoint_file: self
				.checkpoint_file
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT_FILE)),
			wet_dir: self.wet_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WET_DIR)),
			wet_paths: self
				.wet_paths
				.unwrap_or_else(|| PathBuf::from(DEFAULT_WET_PATHS)),
			ranking_file: self
				.ranking_file
				.unwrap_or_else(|| PathBuf::from(DEFAULT_RANKING_FILE)),
			top_domains_file: self.top_domains_file,
			top_domains_limit: self.top_domains_limit,
		})
	}
}

/// Settings for `wikiref index`.
///
/// `top_domains_file` enables domain filtering of WET records; without it
/// every English `conversion` record is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingConfig {
	pub batch_size: usize,
	pub checkpoint_file: PathBuf,
	pub wet_dir: PathBuf,
	pub wet_paths: PathBuf,
	pub ranking_file: PathBuf,
	pub top_domains_file: Option<PathBuf>,
	pub top_domains_limit: Option<usize>,
}

impl Default for IndexingConfig {
	fn default() -> Self {
		Self {
			batch_size: DEFAULT_BATCH_SIZE,
			checkpoint_file: PathBuf::from(DEFAULT_CHECKPOINT_FILE),
			wet_dir: PathBuf::from(DEFAULT_WET_DIR),
			wet_paths: PathBuf::from(DEFAULT_WET_PATHS),
			ranking_file: PathBuf::from(DEFAULT_RANKING_FILE),
			top_domains_file: None,
			top_domains_limit: None,
		}
	}
}
