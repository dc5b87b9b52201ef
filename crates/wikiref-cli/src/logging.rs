// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wikiref_config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(config: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

	let (compact, json) = match config.format {
		LogFormat::Compact => (Some(fmt::layer().compact().with_writer(std::io::stderr)), None),
		LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(compact)
		.with(json)
		.init();
}
