//! Label category handling.
//!
//! Upstream storage keeps an issue's categories as a textual list. The accepted grammar is
//!
//! ```text
//! list  := ws* "["? item ("," item)* "]"? ws*
//! item  := ws* quote? tag quote? ws*
//! quote := '"' | '\''
//! ```
//!
//! where empty items are dropped and duplicate tags collapse. Anything else degrades to
//! the tokens that can be recovered; decoding never fails.

use std::{collections::BTreeSet, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::issue::UnknownVariant;

static LABEL_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"name="([^"]+)""#).expect("label name pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
	Feature,
	Enhancement,
	Bug,
	Docs,
	Components,
	Other,
}
impl LabelCategory {
	/// Matching order. The first category with a matching keyword wins.
	pub const ALL: [Self; 6] =
		[Self::Feature, Self::Enhancement, Self::Bug, Self::Docs, Self::Components, Self::Other];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Feature => "feature",
			Self::Enhancement => "enhancement",
			Self::Bug => "bug",
			Self::Docs => "docs",
			Self::Components => "components",
			Self::Other => "other",
		}
	}

	pub fn keywords(self) -> &'static [&'static str] {
		match self {
			Self::Feature => &["feature", "change:feature"],
			Self::Enhancement => &["enhancement", "improvement"],
			Self::Bug => &["bug", "fix", "error"],
			Self::Docs => &["docs", "documentation"],
			Self::Components => &["components", "custom-components"],
			Self::Other => &[],
		}
	}
}
impl fmt::Display for LabelCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for LabelCategory {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let raw = raw.trim();

		Self::ALL
			.into_iter()
			.find(|category| category.as_str() == raw)
			.ok_or_else(|| UnknownVariant { facet: "label", value: raw.to_string() })
	}
}

/// Decodes a textual category list into a set of trimmed, non-empty tags.
///
/// Tags are not checked against [`LabelCategory`]; unknown tags pass through and simply
/// never match a filter.
pub fn parse_label_categories(raw: &str) -> BTreeSet<String> {
	let inner = raw.trim().trim_matches(['[', ']']);

	inner
		.split(',')
		.map(|item| item.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\''))
		.filter(|item| !item.is_empty())
		.map(str::to_string)
		.collect()
}

/// Encodes tags as `["a", "b"]`, the inverse of [`parse_label_categories`].
pub fn encode_label_categories(tags: &BTreeSet<String>) -> String {
	let items: Vec<String> = tags.iter().map(|tag| format!("\"{tag}\"")).collect();

	format!("[{}]", items.join(", "))
}

/// Assigns a raw GitHub label name to a category by case-insensitive substring match.
///
/// Any substring counts, so `"debug-tools"` lands in [`LabelCategory::Bug`].
pub fn categorize_label(label_name: &str) -> LabelCategory {
	let lowered = label_name.to_lowercase();

	LabelCategory::ALL
		.into_iter()
		.find(|category| category.keywords().iter().any(|keyword| lowered.contains(keyword)))
		.unwrap_or(LabelCategory::Other)
}

/// Extracts label names from either a JSON labels array (strings or `{ "name": .. }`
/// objects) or the `[Label(name="..."), ...]` repr written by older exports.
pub fn extract_label_names(raw: &serde_json::Value) -> Vec<String> {
	match raw {
		serde_json::Value::Array(items) => items
			.iter()
			.filter_map(|item| match item {
				serde_json::Value::String(name) => Some(name.clone()),
				serde_json::Value::Object(map) =>
					map.get("name").and_then(|name| name.as_str()).map(str::to_string),
				_ => None,
			})
			.collect(),
		serde_json::Value::String(repr) =>
			LABEL_NAME.captures_iter(repr).map(|caps| caps[1].to_string()).collect(),
		_ => Vec::new(),
	}
}

/// Categorizes every label of one issue, collapsing duplicates.
pub fn categorize_labels<I, S>(label_names: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	label_names
		.into_iter()
		.map(|name| categorize_label(name.as_ref()).as_str().to_string())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(tags: &[&str]) -> BTreeSet<String> {
		tags.iter().map(|tag| tag.to_string()).collect()
	}

	#[test]
	fn parses_quoted_bracketed_lists() {
		assert_eq!(
			parse_label_categories(r#"["feature", "bug", "enhancement"]"#),
			set(&["bug", "enhancement", "feature"])
		);
		assert_eq!(parse_label_categories("[\n  \"bug\",\n  \"bug\"\n]"), set(&["bug"]));
		assert_eq!(parse_label_categories("docs, 'other' ,,"), set(&["docs", "other"]));
	}

	#[test]
	fn tolerates_empty_lists() {
		assert!(parse_label_categories("[]").is_empty());
		assert!(parse_label_categories("").is_empty());
		assert!(parse_label_categories("[ , \"\" ]").is_empty());
	}

	#[test]
	fn encode_round_trips_through_parse() {
		for raw in [r#"["bug","docs"]"#, "x, 'y z' , \"q\"", "[[a]]", "a, ]b, c[", "' \"a\" '"] {
			let parsed = parse_label_categories(raw);

			assert_eq!(parse_label_categories(&encode_label_categories(&parsed)), parsed, "{raw}");
		}
	}

	#[test]
	fn categorizes_by_first_matching_keyword() {
		assert_eq!(categorize_label("change:feature"), LabelCategory::Feature);
		assert_eq!(categorize_label("type:bug"), LabelCategory::Bug);
		assert_eq!(categorize_label("Type:Enhancement"), LabelCategory::Enhancement);
		assert_eq!(categorize_label("area:documentation"), LabelCategory::Docs);
		assert_eq!(categorize_label("custom-components"), LabelCategory::Components);
		assert_eq!(categorize_label("status:needs-triage"), LabelCategory::Other);
		assert_eq!(categorize_label("feature:fix-error"), LabelCategory::Feature);
	}

	#[test]
	fn extracts_label_names_from_repr_and_json() {
		let repr = serde_json::json!(r#"[Label(name="change:feature"), Label(name="type:bug")]"#);

		assert_eq!(extract_label_names(&repr), vec!["change:feature", "type:bug"]);

		let json = serde_json::json!([{ "name": "docs" }, "type:bug", 3]);

		assert_eq!(extract_label_names(&json), vec!["docs", "type:bug"]);
		assert!(extract_label_names(&serde_json::json!(null)).is_empty());
	}
}
