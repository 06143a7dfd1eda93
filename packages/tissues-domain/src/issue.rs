use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {facet} value '{value}'.")]
pub struct UnknownVariant {
	pub facet: &'static str,
	pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
	Open,
	Closed,
}
impl IssueState {
	pub const ALL: [Self; 2] = [Self::Open, Self::Closed];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::Closed => "closed",
		}
	}
}
impl fmt::Display for IssueState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for IssueState {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim() {
			"open" => Ok(Self::Open),
			"closed" => Ok(Self::Closed),
			other => Err(UnknownVariant { facet: "state", value: other.to_string() }),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
	Issue,
	PullRequest,
}
impl IssueType {
	pub const ALL: [Self; 2] = [Self::Issue, Self::PullRequest];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Issue => "issue",
			Self::PullRequest => "pull_request",
		}
	}
}
impl fmt::Display for IssueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for IssueType {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim() {
			"issue" => Ok(Self::Issue),
			"pull_request" => Ok(Self::PullRequest),
			other => Err(UnknownVariant { facet: "type", value: other.to_string() }),
		}
	}
}

/// One search hit: a GitHub issue or pull request as projected by the search service.
///
/// Deserialization never fails on a malformed field. Facets outside their vocabulary
/// become `None`, counts fall back to zero, and unparseable timestamps become `None`,
/// so a single bad row cannot abort rendering of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
	#[serde(default, deserialize_with = "crate::lenient::count")]
	pub number: u64,
	#[serde(default, deserialize_with = "crate::lenient::text")]
	pub title: String,
	#[serde(default, deserialize_with = "crate::lenient::text")]
	pub body: String,
	#[serde(default, deserialize_with = "crate::lenient::text")]
	pub html_url: String,
	#[serde(default, deserialize_with = "crate::lenient::facet")]
	pub state: Option<IssueState>,
	#[serde(rename = "type", default, deserialize_with = "crate::lenient::facet")]
	pub issue_type: Option<IssueType>,
	#[serde(default, deserialize_with = "crate::lenient::label_categories")]
	pub label_categories: BTreeSet<String>,
	#[serde(default, deserialize_with = "crate::lenient::count")]
	pub reaction_total_count: u64,
	#[serde(
		default,
		deserialize_with = "crate::lenient::timestamp",
		serialize_with = "crate::time_serde::serialize_option"
	)]
	pub created_at: Option<OffsetDateTime>,
	#[serde(
		default,
		deserialize_with = "crate::lenient::timestamp",
		serialize_with = "crate::time_serde::serialize_option"
	)]
	pub updated_at: Option<OffsetDateTime>,
	#[serde(
		default,
		deserialize_with = "crate::lenient::timestamp",
		serialize_with = "crate::time_serde::serialize_option"
	)]
	pub closed_at: Option<OffsetDateTime>,
}
impl IssueRecord {
	/// Decodes one backend row. Rows that are not JSON objects yield `None`.
	pub fn from_row(row: &serde_json::Value) -> Option<Self> {
		if !row.is_object() {
			return None;
		}

		Self::deserialize(row).ok()
	}

	/// `created_at` rendered as `Month DD, YYYY`, or an empty string when unknown.
	pub fn created_on(&self) -> String {
		let format = format_description!("[month repr:long] [day], [year]");

		self.created_at.and_then(|ts| ts.format(&format).ok()).unwrap_or_default()
	}
}
