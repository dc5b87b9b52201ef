// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `wikiref` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use wikiref_common_http::TlsVerification;
use wikiref_config::{Config, LogFormat};

mod commands;
mod logging;
mod version;

/// Find web references for Wikidata statements.
#[derive(Parser, Debug)]
#[command(name = "wikiref", about = "Wikidata reference search and indexing", version)]
struct Cli {
	/// Config file used in place of /etc/wikiref/wikiref.toml
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Log filter, overrides WIKIREF_LOG_LEVEL (RUST_LOG still wins)
	#[arg(long, global = true, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	/// Skip TLS certificate verification for the search backend
	#[arg(long, global = true)]
	insecure: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Search the reference index for a statement
	Search(SearchArgs),
	/// Rank registered domains from a list of cited URLs
	RankDomains(RankDomainsArgs),
	/// Bulk index the configured WET files
	Index,
	/// Show version and build information
	Version,
}

#[derive(Args, Debug)]
struct SearchArgs {
	/// Item label, e.g. "Albert Einstein"
	name: String,
	/// Property label, e.g. "date of birth"
	property: String,
	/// Value label, e.g. "14 March 1879"
	value: String,

	/// Wikidata identifier matched when --limit-search is set
	#[arg(long, default_value = "")]
	identifier: String,

	/// Only return documents filed under the identifier
	#[arg(long)]
	limit_search: bool,

	/// Alternative item label (repeatable)
	#[arg(long = "item-alt-label", value_name = "LABEL")]
	item_alt_labels: Vec<String>,

	/// Alternative property label (repeatable)
	#[arg(long = "prop-alt-label", value_name = "LABEL")]
	property_alt_labels: Vec<String>,

	/// Alternative value label (repeatable)
	#[arg(long = "val-alt-label", value_name = "LABEL")]
	value_alt_labels: Vec<String>,
}

#[derive(Args, Debug)]
struct RankDomainsArgs {
	/// Cited URLs, one per line (.gz accepted)
	#[arg(long, value_name = "PATH")]
	input: PathBuf,

	/// Ranking output as a {domain: count} JSON object
	#[arg(long, value_name = "PATH", default_value = "top_domains.json")]
	json: PathBuf,

	/// Ranking output as one domain per line
	#[arg(long, value_name = "PATH", default_value = "top_domains.txt")]
	txt: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	if let Command::Version = cli.command {
		println!("{}", version::format_version_info());
		return ExitCode::SUCCESS;
	}

	dotenvy::dotenv().ok();

	let config = match load_config(&cli) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("wikiref: {e:#}");
			return ExitCode::FAILURE;
		}
	};

	logging::init(&config.logging);

	let result = match cli.command {
		Command::Search(args) => commands::search(&config, args).await,
		Command::RankDomains(args) => commands::rank_domains(args),
		Command::Index => commands::index(&config).await,
		Command::Version => Ok(ExitCode::SUCCESS),
	};

	match result {
		Ok(code) => code,
		Err(e) => {
			tracing::error!(error = %format!("{e:#}"), "command failed");
			eprintln!("wikiref: {e:#}");
			ExitCode::FAILURE
		}
	}
}

/// Resolve configuration, then apply command line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
	let mut config = match &cli.config {
		Some(path) => wikiref_config::load_config_with_file(path)?,
		None => wikiref_config::load_config()?,
	};

	if let Some(level) = &cli.log_level {
		config.logging.level = level.clone();
	}
	if cli.json_logs {
		config.logging.format = LogFormat::Json;
	}
	if cli.insecure {
		config.search.tls = TlsVerification::Insecure;
	}
	Ok(config)
}
