// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Streaming WARC/WET record reader.
//!
//! A record is a `WARC/x.y` version line, `Name: value` header lines, a blank
//! line, then exactly `Content-Length` bytes of body. Records are separated by
//! blank lines.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::IndexError;

pub const WARC_TYPE: &str = "WARC-Type";
pub const WARC_RECORD_ID: &str = "WARC-Record-ID";
pub const WARC_DATE: &str = "WARC-Date";
pub const WARC_TARGET_URI: &str = "WARC-Target-URI";
pub const WARC_REFERS_TO: &str = "WARC-Refers-To";
pub const WARC_CONTENT_LANGUAGE: &str = "WARC-Identified-Content-Language";
const CONTENT_LENGTH: &str = "Content-Length";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarcRecord {
	pub version: String,
	headers: Vec<(String, String)>,
	pub body: Vec<u8>,
}

impl WarcRecord {
	/// Case-insensitive header lookup; the first occurrence wins.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
		self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn record_type(&self) -> Option<&str> {
		self.header(WARC_TYPE)
	}
}

pub struct WarcReader<R> {
	inner: R,
	line: Vec<u8>,
}

impl<R: BufRead> WarcReader<R> {
	pub fn new(inner: R) -> Self {
		Self {
			inner,
			line: Vec::new(),
		}
	}

	/// The next record, or `None` at a clean end of stream.
	pub fn next_record(&mut self) -> Result<Option<WarcRecord>, IndexError> {
		let version = loop {
			if !self.read_line()? {
				return Ok(None);
			}
			let line = trim_eol(&self.line);
			if line.is_empty() {
				continue;
			}
			let line = String::from_utf8_lossy(line);
			if !line.starts_with("WARC/") {
				return Err(IndexError::MalformedRecord(format!(
					"expected version line, found '{}'",
					truncate(&line, 40)
				)));
			}
			break line.into_owned();
		};

		let mut headers = Vec::new();
		loop {
			if !self.read_line()? {
				return Err(IndexError::MalformedRecord(
					"stream ended inside record headers".to_string(),
				));
			}
			let line = trim_eol(&self.line);
			if line.is_empty() {
				break;
			}
			let line = String::from_utf8_lossy(line);
			let (name, value) = line.split_once(':').ok_or_else(|| {
				IndexError::MalformedRecord(format!("header without colon: '{}'", truncate(&line, 40)))
			})?;
			headers.push((name.trim().to_string(), value.trim().to_string()));
		}

		let mut record = WarcRecord {
			version,
			headers,
			body: Vec::new(),
		};

		let length: u64 = record
			.header(CONTENT_LENGTH)
			.ok_or_else(|| IndexError::MalformedRecord("missing Content-Length".to_string()))?
			.parse()
			.map_err(|e| IndexError::MalformedRecord(format!("bad Content-Length: {e}")))?;

		// Grows with the bytes actually present, not with the declared length.
		let mut body = Vec::new();
		(&mut self.inner).take(length).read_to_end(&mut body)?;
		if (body.len() as u64) < length {
			return Err(IndexError::MalformedRecord(format!(
				"body of {} bytes shorter than Content-Length {length}",
				body.len()
			)));
		}
		record.body = body;

		Ok(Some(record))
	}

	fn read_line(&mut self) -> Result<bool, IndexError> {
		self.line.clear();
		Ok(self.inner.read_until(b'\n', &mut self.line)? > 0)
	}
}

impl<R: BufRead> Iterator for WarcReader<R> {
	type Item = Result<WarcRecord, IndexError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_record().transpose()
	}
}

/// Open a WET file, gunzipping `.gz` files.
pub fn open_wet(path: &Path) -> Result<WarcReader<Box<dyn BufRead + Send>>, IndexError> {
	let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
	let reader: Box<dyn Read + Send> = if path.extension().is_some_and(|ext| ext == "gz") {
		Box::new(MultiGzDecoder::new(file))
	} else {
		Box::new(file)
	};
	Ok(WarcReader::new(Box::new(BufReader::new(reader))))
}

fn trim_eol(line: &[u8]) -> &[u8] {
	let line = line.strip_suffix(b"\n").unwrap_or(line);
	line.strip_suffix(b"\r").unwrap_or(line)
}

fn truncate(s: &str, max: usize) -> &str {
	match s.char_indices().nth(max) {
		Some((idx, _)) => &s[..idx],
		None => s,
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use std::io::{Cursor, Write};

	/// Serialize a record the way Common Crawl writes them.
	pub(crate) fn record_bytes(headers: &[(&str, &str)], body: &str) -> Vec<u8> {
		let mut out = Vec::new();
		write!(out, "WARC/1.0\r\n").unwrap();
		for (name, value) in headers {
			write!(out, "{name}: {value}\r\n").unwrap();
		}
		write!(out, "Content-Length: {}\r\n\r\n", body.len()).unwrap();
		out.extend_from_slice(body.as_bytes());
		out.extend_from_slice(b"\r\n\r\n");
		out
	}

	#[test]
	fn reads_consecutive_records() {
		let mut data = record_bytes(&[(WARC_TYPE, "warcinfo")], "isPartOf: CC-MAIN");
		data.extend(record_bytes(
			&[
				(WARC_TYPE, "conversion"),
				(WARC_TARGET_URI, "https://example.org/a"),
			],
			"line one\nline two\n",
		));

		let records: Vec<WarcRecord> = WarcReader::new(Cursor::new(data))
			.collect::<Result<_, _>>()
			.unwrap();

		assert_eq!(records.len(), 2);
		assert_eq!(records[0].version, "WARC/1.0");
		assert_eq!(records[0].record_type(), Some("warcinfo"));
		assert_eq!(records[1].header("warc-target-uri"), Some("https://example.org/a"));
		assert_eq!(records[1].body, b"line one\nline two\n");
	}

	#[test]
	fn body_may_contain_blank_lines_and_colons() {
		let body = "Title: x\r\n\r\nWARC/1.0 looks like a header\r\n";
		let data = record_bytes(&[(WARC_TYPE, "conversion")], body);
		let record = WarcReader::new(Cursor::new(data))
			.next_record()
			.unwrap()
			.unwrap();
		assert_eq!(record.body, body.as_bytes());
	}

	#[test]
	fn empty_stream_has_no_records() {
		let mut reader = WarcReader::new(Cursor::new(Vec::new()));
		assert!(reader.next_record().unwrap().is_none());
	}

	#[test]
	fn short_body_is_malformed() {
		let data = b"WARC/1.0\r\nContent-Length: 100\r\n\r\ntoo short".to_vec();
		let err = WarcReader::new(Cursor::new(data)).next_record().unwrap_err();
		assert!(matches!(err, IndexError::MalformedRecord(_)));
	}

	#[test]
	fn oversized_content_length_is_malformed_not_allocated() {
		let data = b"WARC/1.0\r\nWARC-Type: conversion\r\nContent-Length: 1000000000000000\r\n\r\nshort".to_vec();
		let err = WarcReader::new(Cursor::new(data)).next_record().unwrap_err();
		assert!(matches!(err, IndexError::MalformedRecord(_)));
	}

	#[test]
	fn missing_version_line_is_malformed() {
		let data = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
		let err = WarcReader::new(Cursor::new(data)).next_record().unwrap_err();
		assert!(matches!(err, IndexError::MalformedRecord(_)));
	}

	#[test]
	fn missing_content_length_is_malformed() {
		let data = b"WARC/1.0\r\nWARC-Type: conversion\r\n\r\n".to_vec();
		let err = WarcReader::new(Cursor::new(data)).next_record().unwrap_err();
		assert!(matches!(err, IndexError::MalformedRecord(_)));
	}

	#[test]
	fn reads_multi_member_gzip() {
		use flate2::write::GzEncoder;
		use flate2::Compression;

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sample.warc.wet.gz");
		let mut file = File::create(&path).unwrap();
		// Common Crawl compresses each record as its own gzip member.
		for uri in ["https://a.example/", "https://b.example/"] {
			let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
			encoder
				.write_all(&record_bytes(
					&[(WARC_TYPE, "conversion"), (WARC_TARGET_URI, uri)],
					"text",
				))
				.unwrap();
			file.write_all(&encoder.finish().unwrap()).unwrap();
		}
		drop(file);

		let uris: Vec<String> = open_wet(&path)
			.unwrap()
			.map(|r| r.unwrap().header(WARC_TARGET_URI).unwrap().to_string())
			.collect();
		assert_eq!(uris, vec!["https://a.example/", "https://b.example/"]);
	}
}
