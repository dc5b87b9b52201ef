// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for wikiref.
//!
//! This crate provides:
//! - A pre-configured `reqwest` client builder with the wikiref User-Agent
//! - [`TransportConfig`], the caller-supplied TLS and timeout settings every
//!   outbound client is built from
//! - [`BasicCredentials`] for the search backend

mod client;
mod transport;

pub use client::{builder, build_client, user_agent, HttpClientError};
pub use transport::{BasicCredentials, TlsVerification, TransportConfig};
