// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain ranking for Wikipedia reference URLs.
//!
//! Counts how often each registered domain is cited across a URL dump and
//! writes the ranking consumed by the indexer (`top_domains.json`) and the
//! plain list consumed by the WET filter (`top_domains.txt`).

pub mod domain;
pub mod error;
pub mod ranking;

pub use domain::registered_domain;
pub use error::DomainError;
pub use ranking::{load_ranking, open_lines, read_top_domains, DomainRanking, RankingLookup};
