// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IndexError;

/// Remembers the last WET file whose batch was indexed.
#[derive(Debug, Clone)]
pub struct Checkpoint {
	path: PathBuf,
}

impl Checkpoint {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The recorded file name, `None` when no checkpoint exists yet.
	pub fn load(&self) -> Result<Option<String>, IndexError> {
		match std::fs::read_to_string(&self.path) {
			Ok(contents) => {
				let last = contents.trim();
				Ok((!last.is_empty()).then(|| last.to_string()))
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(IndexError::io(&self.path, e)),
		}
	}

	pub fn save(&self, last_processed: &str) -> Result<(), IndexError> {
		std::fs::write(&self.path, format!("{last_processed}\n"))
			.map_err(|e| IndexError::io(&self.path, e))?;
		debug!(path = %self.path.display(), last_processed, "checkpoint saved");
		Ok(())
	}

	/// Index into `files` of the first file still to process.
	pub fn resume_index(last_processed: Option<&str>, files: &[String]) -> usize {
		last_processed
			.and_then(|last| files.iter().position(|f| f == last))
			.map_or(0, |pos| pos + 1)
	}
}
