use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use tissues_domain::IssueRecord;

const GREETINGS: [&str; 2] = [
	"*[Sigh]* Hi there. I'm yet another AI assistant, trying my best to help you make sense of \
	 whatever you just searched for. Frankly, I don't know why this app has such a silly name, so \
	 don't ask me that.",
	"If the text in this tiny window is hard to read, switch the app to wide mode. How else may I \
	 help you today?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
	User,
	Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: ChatRole,
	pub content: String,
}
impl ChatMessage {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: ChatRole::User, content: content.into() }
	}

	pub fn ai(content: impl Into<String>) -> Self {
		Self { role: ChatRole::Ai, content: content.into() }
	}
}

/// Everything one user session carries between interactions.
///
/// A fresh session has no results, a zero search counter, and an empty chat history. The
/// history is seeded with the two greetings on first chat use.
#[derive(Debug, Clone)]
pub struct Session {
	pub id: Uuid,
	pub created_at: OffsetDateTime,
	/// The last search's records in relevance order. Replaced on every search.
	pub results: Option<Vec<IssueRecord>>,
	pub search_counter: u32,
	pub messages: Vec<ChatMessage>,
}
impl Session {
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4(),
			created_at: OffsetDateTime::now_utc(),
			results: None,
			search_counter: 0,
			messages: Vec::new(),
		}
	}

	pub(crate) fn ensure_greetings(&mut self) {
		if self.messages.is_empty() {
			self.messages.extend(GREETINGS.iter().map(|greeting| ChatMessage::ai(*greeting)));
		}
	}

	/// Drops everything after the greetings.
	pub fn reset_chat(&mut self) {
		self.messages.truncate(GREETINGS.len());
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

/// Sessions idle this long are discarded when no TTL is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug)]
struct Entry {
	session: SharedSession,
	last_touched: Instant,
}

/// Live sessions by id.
///
/// Each session sits behind its own async mutex, so interactions within one session run
/// one at a time while different sessions proceed independently. A session untouched for
/// `ttl` is dropped: lookups treat it as gone and every `create` sweeps the idle ones.
#[derive(Debug)]
pub struct SessionStore {
	sessions: Mutex<HashMap<Uuid, Entry>>,
	ttl: Duration,
}
impl SessionStore {
	pub fn new(ttl: Duration) -> Self {
		Self { sessions: Mutex::new(HashMap::new()), ttl }
	}

	pub fn create(&self) -> (Uuid, SharedSession) {
		let now = Instant::now();
		let session = Session::new();
		let id = session.id;
		let shared = Arc::new(tokio::sync::Mutex::new(session));

		self.evict_idle(now);
		self.lock().insert(id, Entry { session: shared.clone(), last_touched: now });

		tracing::info!(session_id = %id, "Session started.");

		(id, shared)
	}

	/// Fetches a live session and marks it as used.
	pub fn get(&self, id: Uuid) -> Option<SharedSession> {
		let now = Instant::now();
		let mut sessions = self.lock();
		let entry = sessions.get_mut(&id)?;

		if self.is_idle(entry, now) {
			sessions.remove(&id);

			tracing::info!(session_id = %id, "Session expired.");

			return None;
		}

		entry.last_touched = now;

		Some(entry.session.clone())
	}

	/// Ends a session, discarding its state. Returns whether it existed.
	pub fn end(&self, id: Uuid) -> bool {
		let removed = self.lock().remove(&id).is_some();

		if removed {
			tracing::info!(session_id = %id, "Session ended.");
		}

		removed
	}

	/// Drops every session idle at `now`. Returns how many were dropped.
	pub fn evict_idle(&self, now: Instant) -> usize {
		let mut sessions = self.lock();
		let before = sessions.len();

		sessions.retain(|_, entry| !self.is_idle(entry, now));

		let evicted = before - sessions.len();

		if evicted > 0 {
			tracing::info!(evicted, live = sessions.len(), "Evicted idle sessions.");
		}

		evicted
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn is_idle(&self, entry: &Entry, now: Instant) -> bool {
		now.saturating_duration_since(entry.last_touched) >= self.ttl
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Entry>> {
		self.sessions.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl Default for SessionStore {
	fn default() -> Self {
		Self::new(DEFAULT_SESSION_TTL)
	}
}
