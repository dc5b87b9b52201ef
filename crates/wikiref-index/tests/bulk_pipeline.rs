// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulk indexing and the checkpointed pipeline against a mock backend.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use wikiref_common_config::Secret;
use wikiref_common_http::{BasicCredentials, TransportConfig};
use wikiref_domains::RankingLookup;
use wikiref_index::{BulkIndexer, Checkpoint, IndexError, IndexPipeline, PipelineSettings};
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn write_wet(path: &Path, pages: &[(&str, &str)]) {
	let mut file = std::fs::File::create(path).unwrap();
	for (id, uri) in pages {
		let body = format!("content of {uri}");
		write!(
			file,
			"WARC/1.0\r\nWARC-Type: conversion\r\nWARC-Target-URI: {uri}\r\nWARC-Record-ID: {id}\r\nContent-Length: {}\r\n\r\n{body}\r\n\r\n",
			body.len()
		)
		.unwrap();
	}
}

/// Acknowledges every document in the request with status 201.
struct AcceptAll;

impl Respond for AcceptAll {
	fn respond(&self, request: &Request) -> ResponseTemplate {
		let body = String::from_utf8_lossy(&request.body).to_string();
		let items: Vec<Value> = body
			.lines()
			.step_by(2)
			.map(|line| {
				let action: Value = serde_json::from_str(line).unwrap();
				json!({ "index": { "_id": action["index"]["_id"], "status": 201 } })
			})
			.collect();
		ResponseTemplate::new(200).set_body_json(json!({ "took": 1, "errors": false, "items": items }))
	}
}

fn indexer_for(server: &MockServer) -> BulkIndexer {
	BulkIndexer::new(&server.uri(), "wikidata-references", &TransportConfig::default())
		.unwrap()
		.with_credentials(BasicCredentials::new(
			"elastic",
			Secret::new("test-password".to_string()),
		))
}

struct Workspace {
	dir: tempfile::TempDir,
}

impl Workspace {
	/// Three WET files, one page each, listed in order.
	fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir(dir.path().join("docs")).unwrap();
		for (n, name) in ["a.warc.wet", "b.warc.wet", "c.warc.wet"].iter().enumerate() {
			let id = format!("<urn:uuid:{n}>");
			let uri = format!("https://site{n}.example.com/page");
			write_wet(&dir.path().join("docs").join(name), &[(id.as_str(), uri.as_str())]);
		}
		std::fs::write(dir.path().join("paths.txt"), "a.warc.wet\nb.warc.wet\nc.warc.wet\n").unwrap();
		Self { dir }
	}

	fn settings(&self, batch_size: usize) -> PipelineSettings {
		PipelineSettings {
			wet_dir: self.dir.path().join("docs"),
			wet_paths: self.dir.path().join("paths.txt"),
			batch_size,
			checkpoint: self.checkpoint(),
		}
	}

	fn checkpoint(&self) -> Checkpoint {
		Checkpoint::new(self.dir.path().join("checkpoint.txt"))
	}
}

#[tokio::test]
async fn posts_ndjson_with_credentials() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.and(header("content-type", "application/x-ndjson"))
		.and(basic_auth("elastic", "test-password"))
		.respond_with(AcceptAll)
		.expect(1)
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(10));
	assert_eq!(pipeline.run().await.unwrap(), 3);

	let requests = server.received_requests().await.unwrap();
	let body = String::from_utf8_lossy(&requests[0].body).to_string();
	assert_eq!(body.lines().count(), 6);
}

#[tokio::test]
async fn batches_and_checkpoints_each_batch() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(AcceptAll)
		.expect(2)
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(2));
	assert_eq!(pipeline.run().await.unwrap(), 3);
	assert_eq!(workspace.checkpoint().load().unwrap().as_deref(), Some("c.warc.wet"));
}

#[tokio::test]
async fn large_batches_are_split_across_requests() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(AcceptAll)
		.expect(2)
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	let indexer = indexer_for(&server).with_chunk_limits(2, usize::MAX);
	let pipeline = IndexPipeline::new(indexer, RankingLookup::new(), workspace.settings(10));
	assert_eq!(pipeline.run().await.unwrap(), 3);

	let requests = server.received_requests().await.unwrap();
	let documents: Vec<usize> = requests
		.iter()
		.map(|r| String::from_utf8_lossy(&r.body).lines().count() / 2)
		.collect();
	assert_eq!(documents, vec![2, 1]);
	assert_eq!(workspace.checkpoint().load().unwrap().as_deref(), Some("c.warc.wet"));
}

#[tokio::test]
async fn resumes_after_checkpoint() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(AcceptAll)
		.expect(1)
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	workspace.checkpoint().save("b.warc.wet").unwrap();

	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(10));
	assert_eq!(pipeline.run().await.unwrap(), 1);

	let requests = server.received_requests().await.unwrap();
	let body = String::from_utf8_lossy(&requests[0].body).to_string();
	assert!(body.contains("<urn:uuid:2>"));
	assert!(!body.contains("<urn:uuid:0>"));
}

#[tokio::test]
async fn unreadable_file_contributes_nothing() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(AcceptAll)
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	std::fs::remove_file(workspace.dir.path().join("docs").join("b.warc.wet")).unwrap();

	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(10));
	assert_eq!(pipeline.run().await.unwrap(), 2);
	assert_eq!(workspace.checkpoint().load().unwrap().as_deref(), Some("c.warc.wet"));
}

#[tokio::test]
async fn rejected_documents_are_not_counted() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"took": 1,
			"errors": true,
			"items": [
				{ "index": { "_id": "<urn:uuid:0>", "status": 201 } },
				{ "index": { "_id": "<urn:uuid:1>", "status": 400,
					"error": { "type": "mapper_parsing_exception" } } },
				{ "index": { "_id": "<urn:uuid:2>", "status": 201 } }
			]
		})))
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(10));
	assert_eq!(pipeline.run().await.unwrap(), 2);
}

#[tokio::test]
async fn bulk_failure_stops_without_checkpoint() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/_bulk"))
		.respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
		.mount(&server)
		.await;

	let workspace = Workspace::new();
	let pipeline = IndexPipeline::new(indexer_for(&server), RankingLookup::new(), workspace.settings(10));
	let err = pipeline.run().await.unwrap_err();

	assert!(matches!(err, IndexError::ApiError { status: 503, .. }));
	assert_eq!(workspace.checkpoint().load().unwrap(), None);
}
