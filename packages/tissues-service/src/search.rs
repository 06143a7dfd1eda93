use serde::{Deserialize, Serialize};

use tissues_domain::IssueRecord;

use crate::{Notice, NoticeCode, Session, TissuesService};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	#[serde(flatten)]
	pub status: SessionStatus,
	pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
	pub session_id: uuid::Uuid,
	pub remaining_searches: u32,
	pub search_enabled: bool,
	/// Size of the stored result set, `None` before the first search.
	pub result_count: Option<usize>,
}

impl TissuesService {
	pub fn session_status(&self, session: &Session) -> SessionStatus {
		let max = self.cfg.search.max_searches_per_session;

		SessionStatus {
			session_id: session.id,
			remaining_searches: max.saturating_sub(session.search_counter),
			search_enabled: session.search_counter < max,
			result_count: session.results.as_ref().map(Vec::len),
		}
	}

	/// Runs one search and replaces the session's stored results.
	///
	/// An empty query or an exhausted quota leaves the session untouched. A backend failure
	/// still spends the attempt and stores an empty result set.
	pub async fn search(&self, session: &mut Session, req: SearchRequest) -> SearchResponse {
		let query = req.query.trim();

		if query.is_empty() {
			return self.search_response(session, vec![Notice::new(NoticeCode::EmptyQuery)]);
		}
		if session.search_counter >= self.cfg.search.max_searches_per_session {
			tracing::info!(session_id = %session.id, "Search quota exhausted.");

			return self.search_response(session, vec![Notice::new(NoticeCode::SearchLimitReached)]);
		}

		session.search_counter += 1;

		let mut notices = Vec::new();
		let records = match self
			.providers
			.search
			.search(&self.cfg.backend, query, &self.cfg.search.columns, self.cfg.search.candidate_limit)
			.await
		{
			Ok(rows) => {
				let records: Vec<IssueRecord> = rows.iter().filter_map(IssueRecord::from_row).collect();

				if records.len() < rows.len() {
					tracing::warn!(
						session_id = %session.id,
						dropped = rows.len() - records.len(),
						"Dropped search rows that are not objects."
					);
				}

				records
			},
			Err(err) => {
				tracing::warn!(
					session_id = %session.id,
					error = %err,
					unavailable = err.is_unavailable(),
					"Search service call failed."
				);
				notices.push(Notice::new(NoticeCode::SearchUnavailable));

				Vec::new()
			},
		};

		tracing::info!(
			session_id = %session.id,
			results = records.len(),
			search_counter = session.search_counter,
			"Search completed."
		);

		session.results = Some(records);

		self.search_response(session, notices)
	}

	fn search_response(&self, session: &Session, notices: Vec<Notice>) -> SearchResponse {
		SearchResponse { status: self.session_status(session), notices }
	}
}
