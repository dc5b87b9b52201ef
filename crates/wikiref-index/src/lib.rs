// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Populates the reference index from Common Crawl WET files.
//!
//! - [`warc`]: streaming reader for (gzipped) WARC/WET records
//! - [`filter`]: which records are worth indexing
//! - [`document`]: the indexed document shape
//! - [`bulk`]: `_bulk` API client
//! - [`pipeline`]: batched, checkpointed indexing of a list of WET files

pub mod bulk;
pub mod checkpoint;
pub mod document;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod warc;

pub use bulk::{BulkIndexer, BulkSummary};
pub use checkpoint::Checkpoint;
pub use document::IndexDocument;
pub use error::IndexError;
pub use filter::WetFilter;
pub use pipeline::{IndexPipeline, PipelineSettings};
pub use warc::{WarcReader, WarcRecord};
