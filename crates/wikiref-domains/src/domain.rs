// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registered (registrable) domain extraction.

use url::{Host, Url};

/// Reduce a URL to its registered domain, e.g. `https://news.bbc.co.uk/x`
/// to `bbc.co.uk`.
///
/// Only ICANN suffixes count: `foo.blogspot.com` reduces to `blogspot.com`.
///
/// `None` for unparseable URLs, IP hosts and hosts that are themselves a
/// public suffix.
pub fn registered_domain(raw: &str) -> Option<String> {
	let url = Url::parse(raw.trim()).ok()?;
	let host = match url.host()? {
		Host::Domain(host) => host.trim_end_matches('.').to_ascii_lowercase(),
		Host::Ipv4(_) | Host::Ipv6(_) => return None,
	};

	let suffix = icann_suffix(&host)?;
	let prefix = host.strip_suffix(suffix)?.strip_suffix('.')?;
	let label = prefix.rsplit('.').next().filter(|l| !l.is_empty())?;
	Some(format!("{label}.{suffix}"))
}

/// Longest ICANN public suffix of `host`, skipping private-section entries.
fn icann_suffix(host: &str) -> Option<&str> {
	let mut tail = host;
	loop {
		let suffix = psl::suffix(tail.as_bytes())?;
		let matched = &tail[tail.len().checked_sub(suffix.as_bytes().len())?..];
		match suffix.typ() {
			Some(psl::Type::Private) => tail = matched.split_once('.')?.1,
			_ => return Some(matched),
		}
	}
}
