use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tissues_domain::{FacetSelection, IssueRecord, IssueState, IssueType, SortKey, ViewSpec, view};

use crate::{Error, Notice, NoticeCode, Result, Session, TissuesService};

/// Filter, sort, and limit choices. Absent fields take the configured defaults; a present
/// but empty facet list selects nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewRequest {
	pub labels: Option<Vec<String>>,
	pub states: Option<Vec<String>>,
	pub types: Option<Vec<String>>,
	pub sort: Option<String>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
	pub number: u64,
	pub title: String,
	pub html_url: String,
	pub state: Option<IssueState>,
	#[serde(rename = "type")]
	pub issue_type: Option<IssueType>,
	pub label_categories: Vec<String>,
	pub reaction_total_count: u64,
	pub created_on: String,
	pub body: String,
}
impl From<&IssueRecord> for ResultItem {
	fn from(record: &IssueRecord) -> Self {
		Self {
			number: record.number,
			title: record.title.clone(),
			html_url: record.html_url.clone(),
			state: record.state,
			issue_type: record.issue_type,
			label_categories: record.label_categories.iter().cloned().collect(),
			reaction_total_count: record.reaction_total_count,
			created_on: record.created_on(),
			body: record.body.clone(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
	pub items: Vec<ResultItem>,
	/// Records that passed the facets, before the limit.
	pub total_matched: usize,
	/// Size of the stored result set.
	pub total_results: usize,
	pub sort: SortKey,
	pub limit: u32,
	pub notices: Vec<Notice>,
}

impl TissuesService {
	/// Renders the stored result set through the requested view. Never mutates the session.
	pub fn results(&self, session: &Session, req: &ViewRequest) -> Result<ResultsResponse> {
		let spec = self.resolve_view(req)?;
		let limit = u32::try_from(spec.limit).unwrap_or(u32::MAX);
		let Some(records) = session.results.as_deref() else {
			return Ok(ResultsResponse {
				items: Vec::new(),
				total_matched: 0,
				total_results: 0,
				sort: spec.sort,
				limit,
				notices: vec![Notice::new(NoticeCode::NoResultsYet)],
			});
		};
		let view = view::apply(records, &spec);

		Ok(ResultsResponse {
			items: view.records.into_iter().map(ResultItem::from).collect(),
			total_matched: view.total_matched,
			total_results: records.len(),
			sort: spec.sort,
			limit,
			notices: Vec::new(),
		})
	}

	pub(crate) fn resolve_view(&self, req: &ViewRequest) -> Result<ViewSpec> {
		let results = &self.cfg.results;
		let labels = match &req.labels {
			Some(labels) => labels.iter().map(|label| label.trim().to_string()).collect(),
			None => self.default_facets.labels.clone(),
		};
		let states = match &req.states {
			Some(states) => parse_all(states, "states")?,
			None => self.default_facets.states.clone(),
		};
		let types = match &req.types {
			Some(types) => parse_all(types, "types")?,
			None => self.default_facets.types.clone(),
		};
		let sort = match req.sort.as_deref() {
			Some(raw) =>
				raw.parse::<SortKey>().map_err(|err| Error::invalid_field("sort", err.to_string()))?,
			None => SortKey::default(),
		};
		let limit = req.limit.unwrap_or(results.default_limit);

		if !(results.min_limit..=results.max_limit).contains(&limit) {
			return Err(Error::invalid_field(
				"limit",
				format!("limit must be between {} and {}.", results.min_limit, results.max_limit),
			));
		}

		Ok(ViewSpec {
			facets: FacetSelection { labels, states, types },
			sort,
			limit: limit as usize,
		})
	}
}

fn parse_all<T>(raw: &[String], field: &str) -> Result<BTreeSet<T>>
where
	T: std::str::FromStr + Ord,
	T::Err: std::fmt::Display,
{
	raw.iter()
		.map(|value| value.parse::<T>().map_err(|err| Error::invalid_field(field, err.to_string())))
		.collect()
}
