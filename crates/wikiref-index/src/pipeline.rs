// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Batched, resumable indexing of a WET file list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, instrument};
use wikiref_domains::RankingLookup;

use crate::bulk::BulkIndexer;
use crate::checkpoint::Checkpoint;
use crate::document::IndexDocument;
use crate::error::IndexError;
use crate::filter::WetFilter;
use crate::warc::open_wet;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
	/// Directory the listed WET files are relative to.
	pub wet_dir: PathBuf,
	/// One WET file name per line.
	pub wet_paths: PathBuf,
	pub batch_size: usize,
	pub checkpoint: Checkpoint,
}

pub struct IndexPipeline {
	indexer: BulkIndexer,
	filter: WetFilter,
	ranking: Arc<RankingLookup>,
	settings: PipelineSettings,
}

impl IndexPipeline {
	pub fn new(indexer: BulkIndexer, ranking: RankingLookup, settings: PipelineSettings) -> Self {
		Self {
			indexer,
			filter: WetFilter::new(),
			ranking: Arc::new(ranking),
			settings,
		}
	}

	pub fn with_filter(mut self, filter: WetFilter) -> Self {
		self.filter = filter;
		self
	}

	/// Index every listed file after the checkpoint; returns documents indexed.
	///
	/// The checkpoint advances to the last file of a batch once its documents
	/// are indexed. A bulk request failure stops the run without advancing it.
	#[instrument(skip(self), fields(wet_paths = %self.settings.wet_paths.display()))]
	pub async fn run(&self) -> Result<usize, IndexError> {
		if self.settings.batch_size == 0 {
			return Err(IndexError::InvalidConfig("batch size must be positive".to_string()));
		}

		let files = read_file_list(&self.settings.wet_paths)?;
		let last = self.settings.checkpoint.load()?;
		let start = Checkpoint::resume_index(last.as_deref(), &files);
		info!(files = files.len(), start, "starting WET indexing");

		let mut total = 0usize;
		for batch in files[start..].chunks(self.settings.batch_size) {
			let mut documents = Vec::new();
			for name in batch {
				documents.extend(self.process_file(name).await);
			}

			if documents.is_empty() {
				continue;
			}

			let summary = self.indexer.index_documents(&documents).await?;
			total += summary.indexed;
			info!(
				indexed = summary.indexed,
				failed = summary.failed,
				batch_documents = documents.len(),
				"batch indexed"
			);

			if let Some(last) = batch.last() {
				self.settings.checkpoint.save(last)?;
			}
		}

		info!(total, "WET indexing complete");
		Ok(total)
	}

	/// Documents from one file. Read failures are logged and yield nothing.
	async fn process_file(&self, name: &str) -> Vec<IndexDocument> {
		let path = self.settings.wet_dir.join(name);
		let filter = self.filter.clone();
		let ranking = Arc::clone(&self.ranking);
		let task_path = path.clone();

		let result = tokio::task::spawn_blocking(move || extract_documents(&task_path, &filter, &ranking))
			.await
			.map_err(|e| IndexError::Task(e.to_string()))
			.and_then(|r| r);

		match result {
			Ok(documents) => {
				info!(path = %path.display(), documents = documents.len(), "processed WET file");
				documents
			}
			Err(e) => {
				error!(path = %path.display(), error = %e, "failed to process WET file");
				Vec::new()
			}
		}
	}
}

/// Read one WET file into documents accepted by `filter`.
pub fn extract_documents(
	path: &Path,
	filter: &WetFilter,
	ranking: &RankingLookup,
) -> Result<Vec<IndexDocument>, IndexError> {
	let mut documents = Vec::new();
	for record in open_wet(path)? {
		let record = record?;
		if !filter.accepts(&record) {
			continue;
		}
		if let Some(document) = IndexDocument::from_record(&record, ranking) {
			documents.push(document);
		}
	}
	Ok(documents)
}

fn read_file_list(path: &Path) -> Result<Vec<String>, IndexError> {
	let contents = std::fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
	Ok(contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_string)
		.collect())
}
