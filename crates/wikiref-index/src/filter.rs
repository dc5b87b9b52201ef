// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashSet;

use wikiref_domains::registered_domain;

use crate::warc::{WarcRecord, WARC_CONTENT_LANGUAGE, WARC_TARGET_URI};

pub const CONVERSION_RECORD: &str = "conversion";
pub const ENGLISH: &str = "eng";

/// Decides which WET records become index documents.
#[derive(Debug, Clone, Default)]
pub struct WetFilter {
	domains: Option<HashSet<String>>,
}

impl WetFilter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Only keep pages whose registered domain is in `domains`.
	pub fn with_domains(mut self, domains: HashSet<String>) -> Self {
		self.domains = Some(domains);
		self
	}

	pub fn accepts(&self, record: &WarcRecord) -> bool {
		if record.record_type() != Some(CONVERSION_RECORD) {
			return false;
		}

		let Some(uri) = record.header(WARC_TARGET_URI) else {
			return false;
		};

		match record.header(WARC_CONTENT_LANGUAGE) {
			None | Some("") | Some(ENGLISH) => {}
			Some(_) => return false,
		}

		match &self.domains {
			None => true,
			Some(domains) => registered_domain(uri).is_some_and(|d| domains.contains(&d)),
		}
	}
}
