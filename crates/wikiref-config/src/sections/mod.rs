// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod indexing;
mod logging;
mod search;

pub use indexing::{IndexingConfig, IndexingConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use search::{SearchConfig, SearchConfigLayer};
