use serde::{Deserialize, Serialize};

use tissues_domain::{assemble_context, build_prompt, view};

use crate::{ChatMessage, Error, Notice, NoticeCode, Result, Session, TissuesService, ViewRequest};

const COMPLETION_UNAVAILABLE_REPLY: &str = "I'm completely out of juice right now; the backend \
	has no capacity left for me. Give it a minute and ask again.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
	#[serde(default)]
	pub password: String,
	pub model: Option<String>,
	pub message: String,
	/// The view whose records become the context. Defaults apply when absent.
	#[serde(default)]
	pub view: Option<ViewRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
	pub reply: Option<String>,
	pub messages: Vec<ChatMessage>,
	pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
	pub messages: Vec<ChatMessage>,
}

impl TissuesService {
	/// Answers one chat turn about the session's current result view.
	///
	/// Gate failures, a missing search, and an empty message are reported as notices and
	/// leave the history untouched. Backend trouble is answered with an explanatory reply
	/// instead of an error.
	pub async fn chat(&self, session: &mut Session, req: ChatRequest) -> Result<ChatResponse> {
		if let Some(code) = self.check_password(&req.password) {
			return Ok(chat_response(session, None, vec![Notice::new(code)]));
		}

		let model = req.model.as_deref().map(str::trim).unwrap_or(&self.cfg.chat.default_model);

		if !self.models().iter().any(|candidate| candidate.id == model) {
			return Err(Error::invalid_field("model", format!("Unknown model '{model}'.")));
		}

		let spec = self.resolve_view(&req.view.unwrap_or_default())?;
		let question = req.message.trim();
		let Some(records) = session.results.as_deref() else {
			return Ok(chat_response(session, None, vec![Notice::new(NoticeCode::NoResultsYet)]));
		};

		if question.is_empty() {
			return Ok(chat_response(session, None, vec![Notice::new(NoticeCode::EmptyMessage)]));
		}

		let view = view::apply(records, &spec);
		let context = assemble_context(&view.records, self.cfg.chat.context_char_limit, None);
		let prompt = build_prompt(question, &context);
		let question = question.to_string();

		session.ensure_greetings();
		session.messages.push(ChatMessage::user(question));

		let mut notices = Vec::new();
		let completion = self.providers.completion.complete(&self.cfg.backend, model, &prompt).await;
		let reply = match completion {
			Ok(Some(text)) => text,
			Ok(None) => {
				let tokens = self.count_prompt_tokens(session, model, &prompt).await;

				notices.push(Notice::new(NoticeCode::ContextOverflow));

				overflow_reply(tokens)
			},
			Err(err) => {
				tracing::warn!(
					session_id = %session.id,
					model,
					error = %err,
					unavailable = err.is_unavailable(),
					"Completion call failed."
				);
				notices.push(Notice::new(NoticeCode::CompletionUnavailable));

				COMPLETION_UNAVAILABLE_REPLY.to_string()
			},
		};

		session.messages.push(ChatMessage::ai(reply.clone()));

		Ok(chat_response(session, Some(reply), notices))
	}

	pub fn chat_history(&self, session: &Session) -> ChatHistoryResponse {
		ChatHistoryResponse { messages: session.messages.clone() }
	}

	pub fn reset_chat(&self, session: &mut Session) -> ChatHistoryResponse {
		session.reset_chat();

		self.chat_history(session)
	}

	fn check_password(&self, password: &str) -> Option<NoticeCode> {
		let chat = &self.cfg.chat;

		if chat.by_pass_password || password == chat.chat_password {
			None
		} else if password.is_empty() {
			Some(NoticeCode::ChatPasswordRequired)
		} else {
			Some(NoticeCode::ChatPasswordIncorrect)
		}
	}

	/// `-1` when the count itself cannot be obtained.
	async fn count_prompt_tokens(&self, session: &Session, model: &str, prompt: &str) -> i64 {
		match self.providers.completion.count_tokens(&self.cfg.backend, model, prompt).await {
			Ok(tokens) => {
				tracing::info!(
					session_id = %session.id,
					model,
					tokens,
					"Prompt exceeded the context window."
				);

				tokens
			},
			Err(err) => {
				tracing::warn!(session_id = %session.id, model, error = %err, "Token count failed.");

				-1
			},
		}
	}
}

fn chat_response(session: &Session, reply: Option<String>, notices: Vec<Notice>) -> ChatResponse {
	ChatResponse { reply, messages: session.messages.clone(), notices }
}

fn overflow_reply(tokens: i64) -> String {
	format!(
		"I tried ingesting too much text ({tokens} tokens to be exact) and promptly choked on it. \
		 I'm going to need a break. Meanwhile, try reducing the number of issues you're feeding me!"
	)
}
