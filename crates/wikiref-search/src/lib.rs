// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reference search client for the `wikidata-references` index.
//!
//! Given a Wikidata statement (item name, property, value) this crate builds a
//! full-text query, sends it to the search backend and returns at most
//! [`MAX_RESULTS`] candidate reference documents with highlighted snippets.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::{ReferenceSearchClient, DEFAULT_BASE_URL, DEFAULT_IDENTIFIER_FIELD, DEFAULT_INDEX};
pub use error::SearchError;
pub use query::{compose_query_text, QueryBody, MAX_RESULTS};
pub use types::{AltLabels, SearchHit, SearchOutcome, SearchRequest};
pub use wikiref_common_http::{BasicCredentials, TlsVerification, TransportConfig};
