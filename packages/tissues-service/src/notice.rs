use serde::{Deserialize, Serialize};

/// Recoverable conditions that are reported inline instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeCode {
	EmptyQuery,
	SearchLimitReached,
	SearchUnavailable,
	NoResultsYet,
	EmptyMessage,
	ChatPasswordRequired,
	ChatPasswordIncorrect,
	ContextOverflow,
	CompletionUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
	pub code: NoticeCode,
	pub message: String,
}
impl Notice {
	pub fn new(code: NoticeCode) -> Self {
		Self { code, message: default_message(code).to_string() }
	}
}

fn default_message(code: NoticeCode) -> &'static str {
	match code {
		NoticeCode::EmptyQuery => "Hmm, did you forget to enter a search query?",
		NoticeCode::SearchLimitReached =>
			"You've hit the search limit for this session. Every search costs real money, so \
			 please go easy. Start a new session if you really need to search again.",
		NoticeCode::SearchUnavailable =>
			"The search service is unavailable right now. Showing no results; try again shortly.",
		NoticeCode::NoResultsYet => "Please search for issues first.",
		NoticeCode::EmptyMessage => "Say something first; an empty message is hard to answer.",
		NoticeCode::ChatPasswordRequired =>
			"Please enter the chat password to use the chat function.",
		NoticeCode::ChatPasswordIncorrect =>
			"Chat password is incorrect. Did someone give you the wrong password, or was that a guess?",
		NoticeCode::ContextOverflow =>
			"The selected issues did not fit in the model's context window. Try fewer issues.",
		NoticeCode::CompletionUnavailable =>
			"The completion service is out of resources right now. Please try again later.",
	}
}
