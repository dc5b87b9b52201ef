// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Citation counts per registered domain.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::domain::registered_domain;
use crate::error::DomainError;

/// Domain → citation count, as loaded from `top_domains.json`.
pub type RankingLookup = HashMap<String, u64>;

/// Domains ordered by citation count, most cited first. Ties keep the order
/// in which the domains were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRanking {
	entries: Vec<(String, u64)>,
	skipped: u64,
}

impl DomainRanking {
	pub fn from_urls<I, S>(urls: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		// domain -> (count, first seen)
		let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
		let mut skipped = 0u64;

		for line in urls {
			let line = line.as_ref().trim();
			if line.is_empty() {
				continue;
			}
			match registered_domain(line) {
				Some(domain) => {
					let next = counts.len();
					counts.entry(domain).or_insert((0, next)).0 += 1;
				}
				None => skipped += 1,
			}
		}

		let mut entries: Vec<(String, u64, usize)> = counts
			.into_iter()
			.map(|(domain, (count, first))| (domain, count, first))
			.collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

		Self {
			entries: entries.into_iter().map(|(d, c, _)| (d, c)).collect(),
			skipped,
		}
	}

	/// Rank the URLs in `path` (one per line, `.gz` decompressed), streaming
	/// the file. The first read error aborts the ranking.
	pub fn from_file(path: &Path) -> Result<Self, DomainError> {
		info!(path = %path.display(), "ranking domains");
		let mut read_error = None;
		let mut urls = 0u64;
		let lines = open_lines(path)?
			.lines()
			.map_while(|line| line.map_err(|e| read_error = Some(e)).ok())
			.inspect(|_| urls += 1);

		let ranking = Self::from_urls(lines);
		if let Some(source) = read_error {
			return Err(DomainError::Read {
				path: path.to_path_buf(),
				source,
			});
		}

		info!(
			urls,
			domains = ranking.len(),
			skipped = ranking.skipped,
			"domain ranking complete"
		);
		Ok(ranking)
	}

	pub fn entries(&self) -> &[(String, u64)] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Lines that had no registered domain.
	pub fn skipped(&self) -> u64 {
		self.skipped
	}

	pub fn to_lookup(&self) -> RankingLookup {
		self.entries.iter().cloned().collect()
	}

	/// `{domain: count}` in rank order, four-space indent.
	pub fn write_json(&self, path: &Path) -> Result<(), DomainError> {
		let write_err = |source| DomainError::Write {
			path: path.to_path_buf(),
			source,
		};
		let file = File::create(path).map_err(write_err)?;
		let mut writer = BufWriter::new(file);
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
		let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
		self.serialize(&mut serializer)
			.map_err(|e| write_err(std::io::Error::other(e)))?;
		writer.flush().map_err(write_err)?;
		debug!(path = %path.display(), "wrote ranking JSON");
		Ok(())
	}

	/// One domain per line in rank order.
	pub fn write_txt(&self, path: &Path) -> Result<(), DomainError> {
		let write_err = |source| DomainError::Write {
			path: path.to_path_buf(),
			source,
		};
		let file = File::create(path).map_err(write_err)?;
		let mut writer = BufWriter::new(file);
		for (domain, _) in &self.entries {
			writeln!(writer, "{domain}").map_err(write_err)?;
		}
		writer.flush().map_err(write_err)?;
		debug!(path = %path.display(), "wrote domain list");
		Ok(())
	}
}

impl Serialize for DomainRanking {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (domain, count) in &self.entries {
			map.serialize_entry(domain, count)?;
		}
		map.end()
	}
}

/// Open `path` for line reading, gunzipping `.gz` files.
pub fn open_lines(path: &Path) -> Result<Box<dyn BufRead>, DomainError> {
	let file = File::open(path).map_err(|source| DomainError::Read {
		path: path.to_path_buf(),
		source,
	})?;

	let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
		Box::new(MultiGzDecoder::new(file))
	} else {
		Box::new(file)
	};
	Ok(Box::new(BufReader::new(reader)))
}

/// Load a ranking previously written by [`DomainRanking::write_json`].
pub fn load_ranking(path: &Path) -> Result<RankingLookup, DomainError> {
	let file = File::open(path).map_err(|source| DomainError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_reader(BufReader::new(file)).map_err(|source| DomainError::InvalidRanking {
		path: path.to_path_buf(),
		source,
	})
}

/// The first `limit` domains of a `top_domains.txt` list (all when `None`).
pub fn read_top_domains(path: &Path, limit: Option<usize>) -> Result<HashSet<String>, DomainError> {
	let reader = open_lines(path)?;
	let mut domains = HashSet::new();

	for line in reader.lines().take(limit.unwrap_or(usize::MAX)) {
		let line = line.map_err(|source| DomainError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let domain = line.trim();
		if !domain.is_empty() {
			domains.insert(domain.to_string());
		}
	}

	Ok(domains)
}
