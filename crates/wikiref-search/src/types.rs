// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request and result types.

use serde::{Deserialize, Serialize};

/// Alternate labels for the item, property and value of a statement.
///
/// The arrays are only folded into the query text when `enabled` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltLabels {
	#[serde(rename = "altLabels")]
	pub enabled: bool,
	#[serde(rename = "item_altLabels", default)]
	pub item: Vec<String>,
	#[serde(rename = "prop_altLabels", default)]
	pub property: Vec<String>,
	#[serde(rename = "val_altLabels", default)]
	pub value: Vec<String>,
}

impl AltLabels {
	pub fn disabled() -> Self {
		Self::default()
	}

	pub fn enabled(item: Vec<String>, property: Vec<String>, value: Vec<String>) -> Self {
		Self {
			enabled: true,
			item,
			property,
			value,
		}
	}

	/// Every label followed by a single space, item then property then value
	/// labels. Empty when disabled.
	pub fn as_query_fragment(&self) -> String {
		if !self.enabled {
			return String::new();
		}

		self.item
			.iter()
			.chain(&self.property)
			.chain(&self.value)
			.fold(String::new(), |mut acc, label| {
				acc.push_str(label);
				acc.push(' ');
				acc
			})
	}
}

/// One search invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	pub name: String,
	pub property: String,
	pub value: String,
	/// Only used when `limit_search` is set.
	pub identifier: String,
	pub limit_search: bool,
	#[serde(default)]
	pub alt_labels: AltLabels,
}

impl SearchRequest {
	pub fn new(
		name: impl Into<String>,
		property: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			property: property.into(),
			value: value.into(),
			..Default::default()
		}
	}

	/// Restrict results to documents whose identifier field matches.
	pub fn limited_to(mut self, identifier: impl Into<String>) -> Self {
		self.identifier = identifier.into();
		self.limit_search = true;
		self
	}

	pub fn with_alt_labels(mut self, alt_labels: AltLabels) -> Self {
		self.alt_labels = alt_labels;
		self
	}
}

/// A matching reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
	pub url: String,
	/// First highlighted fragment of the content, or empty.
	pub highlight: String,
}

/// Caller-facing result: hits plus a success flag.
///
/// Every failure is reported as `success == false` with no hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
	pub documents: Vec<SearchHit>,
	pub success: bool,
}

impl SearchOutcome {
	pub fn succeeded(documents: Vec<SearchHit>) -> Self {
		Self {
			documents,
			success: true,
		}
	}

	pub fn failed() -> Self {
		Self::default()
	}

	pub fn into_parts(self) -> (Vec<SearchHit>, bool) {
		(self.documents, self.success)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn disabled_alt_labels_contribute_nothing() {
		let alt = AltLabels {
			enabled: false,
			item: labels(&["Albert"]),
			property: labels(&["born"]),
			value: labels(&["1879-03-14"]),
		};
		assert_eq!(alt.as_query_fragment(), "");
	}

	#[test]
	fn enabled_alt_labels_keep_array_order_with_trailing_spaces() {
		let alt = AltLabels::enabled(
			labels(&["A. Einstein", "Albert"]),
			labels(&["date of birth"]),
			labels(&["14 March 1879"]),
		);
		assert_eq!(
			alt.as_query_fragment(),
			"A. Einstein Albert date of birth 14 March 1879 "
		);
	}

	#[test]
	fn alt_labels_deserialize_from_caller_bundle() {
		let json = r#"{
			"altLabels": true,
			"item_altLabels": ["Albert"],
			"prop_altLabels": [],
			"val_altLabels": ["1879"]
		}"#;
		let alt: AltLabels = serde_json::from_str(json).unwrap();
		assert!(alt.enabled);
		assert_eq!(alt.item, vec!["Albert"]);
		assert!(alt.property.is_empty());
		assert_eq!(alt.value, vec!["1879"]);
	}

	#[test]
	fn limited_to_sets_flag_and_identifier() {
		let request = SearchRequest::new("Einstein", "P569", "1879").limited_to("Q937");
		assert!(request.limit_search);
		assert_eq!(request.identifier, "Q937");
	}

	#[test]
	fn failed_outcome_is_empty() {
		let (documents, success) = SearchOutcome::failed().into_parts();
		assert!(documents.is_empty());
		assert!(!success);
	}
}
