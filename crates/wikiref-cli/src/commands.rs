// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand implementations.

use std::process::ExitCode;

use anyhow::Context;
use tracing::info;
use wikiref_config::{Config, IndexingConfig};
use wikiref_domains::{load_ranking, read_top_domains, DomainRanking};
use wikiref_index::{BulkIndexer, Checkpoint, IndexPipeline, PipelineSettings, WetFilter};
use wikiref_search::{AltLabels, ReferenceSearchClient, SearchOutcome};

use crate::{RankDomainsArgs, SearchArgs};

pub async fn search(config: &Config, args: SearchArgs) -> anyhow::Result<ExitCode> {
	let settings = &config.search;
	let mut client = ReferenceSearchClient::new(&settings.url, &settings.index, &settings.transport())
		.context("failed to create search client")?
		.with_identifier_field(settings.identifier_field.clone());
	if let Some(credentials) = &settings.credentials {
		client = client.with_credentials(credentials.clone());
	}

	let (documents, success) = client
		.search_references(
			&args.name,
			&args.property,
			&args.value,
			&args.identifier,
			args.limit_search,
			&alt_labels(&args),
		)
		.await;

	let outcome = SearchOutcome { documents, success };
	println!("{}", serde_json::to_string_pretty(&outcome)?);

	Ok(if success {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

/// Alternative labels take part only when at least one was given.
fn alt_labels(args: &SearchArgs) -> AltLabels {
	if args.item_alt_labels.is_empty()
		&& args.property_alt_labels.is_empty()
		&& args.value_alt_labels.is_empty()
	{
		return AltLabels::disabled();
	}
	AltLabels::enabled(
		args.item_alt_labels.clone(),
		args.property_alt_labels.clone(),
		args.value_alt_labels.clone(),
	)
}

pub fn rank_domains(args: RankDomainsArgs) -> anyhow::Result<ExitCode> {
	let ranking = DomainRanking::from_file(&args.input)?;
	ranking.write_json(&args.json)?;
	ranking.write_txt(&args.txt)?;

	info!(
		domains = ranking.len(),
		skipped = ranking.skipped(),
		json = %args.json.display(),
		txt = %args.txt.display(),
		"domain ranking written"
	);
	Ok(ExitCode::SUCCESS)
}

pub async fn index(config: &Config) -> anyhow::Result<ExitCode> {
	let indexing = &config.indexing;
	let ranking = load_ranking(&indexing.ranking_file).context("failed to load domain ranking")?;

	let mut indexer = BulkIndexer::new(&config.search.url, &config.search.index, &config.search.transport())
		.context("failed to create bulk indexer")?;
	if let Some(credentials) = &config.search.credentials {
		indexer = indexer.with_credentials(credentials.clone());
	}

	let pipeline =
		IndexPipeline::new(indexer, ranking, pipeline_settings(indexing)).with_filter(wet_filter(indexing)?);

	let total = pipeline.run().await?;
	println!("Indexed {total} documents");
	Ok(ExitCode::SUCCESS)
}

fn pipeline_settings(indexing: &IndexingConfig) -> PipelineSettings {
	PipelineSettings {
		wet_dir: indexing.wet_dir.clone(),
		wet_paths: indexing.wet_paths.clone(),
		batch_size: indexing.batch_size,
		checkpoint: Checkpoint::new(indexing.checkpoint_file.clone()),
	}
}

fn wet_filter(indexing: &IndexingConfig) -> anyhow::Result<WetFilter> {
	let Some(path) = &indexing.top_domains_file else {
		return Ok(WetFilter::new());
	};
	let domains = read_top_domains(path, indexing.top_domains_limit)
		.with_context(|| format!("failed to read top domains from {}", path.display()))?;
	info!(domains = domains.len(), "restricting indexing to top domains");
	Ok(WetFilter::new().with_domains(domains))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn args(item: &[&str], value: &[&str]) -> SearchArgs {
		SearchArgs {
			name: "Marie Curie".to_string(),
			property: "award received".to_string(),
			value: "Nobel Prize in Physics".to_string(),
			identifier: "Q7186".to_string(),
			limit_search: false,
			item_alt_labels: item.iter().map(|s| s.to_string()).collect(),
			property_alt_labels: Vec::new(),
			value_alt_labels: value.iter().map(|s| s.to_string()).collect(),
		}
	}

	#[test]
	fn alt_labels_disabled_without_any_label() {
		assert_eq!(alt_labels(&args(&[], &[])), AltLabels::disabled());
	}

	#[test]
	fn alt_labels_enabled_by_any_label() {
		let labels = alt_labels(&args(&[], &["Nobel Physics"]));
		assert!(labels.enabled);
		assert_eq!(labels.value, vec!["Nobel Physics"]);
		assert!(labels.item.is_empty());
	}

	#[test]
	fn filter_without_top_domains_accepts_any_domain() {
		let indexing = IndexingConfig::default();
		assert!(indexing.top_domains_file.is_none());
		assert!(wet_filter(&indexing).is_ok());
	}

	#[test]
	fn missing_top_domains_file_is_an_error() {
		let indexing = IndexingConfig {
			top_domains_file: Some(PathBuf::from("/nonexistent/top_domains.txt")),
			..IndexingConfig::default()
		};
		assert!(wet_filter(&indexing).is_err());
	}

	#[test]
	fn settings_follow_indexing_config() {
		let indexing = IndexingConfig::default();
		let settings = pipeline_settings(&indexing);
		assert_eq!(settings.batch_size, indexing.batch_size);
		assert_eq!(settings.checkpoint.path(), indexing.checkpoint_file.as_path());
	}
}
