//! Client-side filtering, ordering, and truncation of a stored result set.
//!
//! Every function borrows the stored records and returns a new ordered view, so the raw
//! result set kept in a session is never reordered or trimmed.

use std::{cmp::Ordering, collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::issue::{IssueRecord, IssueState, IssueType, UnknownVariant};

/// The three independent facets. Within a facet any selected value matches; across facets
/// all must match. An empty facet matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
	pub labels: BTreeSet<String>,
	pub states: BTreeSet<IssueState>,
	pub types: BTreeSet<IssueType>,
}
impl FacetSelection {
	pub fn matches(&self, record: &IssueRecord) -> bool {
		let label_hit = record.label_categories.iter().any(|tag| self.labels.contains(tag));
		let state_hit = record.state.is_some_and(|state| self.states.contains(&state));
		let type_hit = record.issue_type.is_some_and(|kind| self.types.contains(&kind));

		label_hit && state_hit && type_hit
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	/// Backend order, untouched.
	#[default]
	Relevance,
	NewestFirst,
	OldestFirst,
	MostReactionsFirst,
	MostRecentlyUpdatedFirst,
}
impl SortKey {
	pub const ALL: [Self; 5] = [
		Self::Relevance,
		Self::NewestFirst,
		Self::OldestFirst,
		Self::MostReactionsFirst,
		Self::MostRecentlyUpdatedFirst,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Relevance => "relevance",
			Self::NewestFirst => "newest_first",
			Self::OldestFirst => "oldest_first",
			Self::MostReactionsFirst => "most_reactions_first",
			Self::MostRecentlyUpdatedFirst => "most_recently_updated_first",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Relevance => "Most Relevant First",
			Self::NewestFirst => "Newest First",
			Self::OldestFirst => "Oldest First",
			Self::MostReactionsFirst => "Most Reactions First",
			Self::MostRecentlyUpdatedFirst => "Most Recently Updated First",
		}
	}

	fn compare(self, a: &IssueRecord, b: &IssueRecord) -> Ordering {
		match self {
			Self::Relevance => Ordering::Equal,
			Self::NewestFirst => descending_missing_last(a.created_at, b.created_at),
			Self::OldestFirst => ascending_missing_last(a.created_at, b.created_at),
			Self::MostReactionsFirst => b.reaction_total_count.cmp(&a.reaction_total_count),
			Self::MostRecentlyUpdatedFirst => descending_missing_last(a.updated_at, b.updated_at),
		}
	}
}
impl fmt::Display for SortKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SortKey {
	type Err = UnknownVariant;

	/// Accepts either the wire name (`newest_first`) or the display label (`Newest First`).
	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let raw = raw.trim();

		Self::ALL
			.into_iter()
			.find(|key| key.as_str() == raw || key.label().eq_ignore_ascii_case(raw))
			.ok_or_else(|| UnknownVariant { facet: "sort", value: raw.to_string() })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
	pub facets: FacetSelection,
	pub sort: SortKey,
	pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
	pub records: Vec<&'a IssueRecord>,
	/// Records that passed the facets, before truncation.
	pub total_matched: usize,
}

pub fn filter<'a>(records: &'a [IssueRecord], facets: &FacetSelection) -> Vec<&'a IssueRecord> {
	records.iter().filter(|record| facets.matches(record)).collect()
}

/// Stable, so equal keys keep relevance order.
pub fn sort<'a>(mut records: Vec<&'a IssueRecord>, key: SortKey) -> Vec<&'a IssueRecord> {
	if key != SortKey::Relevance {
		records.sort_by(|a, b| key.compare(a, b));
	}

	records
}

pub fn limit<T>(mut records: Vec<T>, n: usize) -> Vec<T> {
	records.truncate(n);

	records
}

/// Filter, then sort, then limit.
pub fn apply<'a>(records: &'a [IssueRecord], spec: &ViewSpec) -> View<'a> {
	let matched = filter(records, &spec.facets);
	let total_matched = matched.len();
	let records = limit(sort(matched, spec.sort), spec.limit);

	View { records, total_matched }
}

fn descending_missing_last<T>(a: Option<T>, b: Option<T>) -> Ordering
where
	T: Ord,
{
	match (a, b) {
		(Some(a), Some(b)) => b.cmp(&a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn ascending_missing_last<T>(a: Option<T>, b: Option<T>) -> Ordering
where
	T: Ord,
{
	match (a, b) {
		(Some(a), Some(b)) => a.cmp(&b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
