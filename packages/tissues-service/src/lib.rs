pub mod chat;
pub mod results;
pub mod search;
pub mod session;

mod error;
mod notice;

pub use chat::{ChatHistoryResponse, ChatRequest, ChatResponse};
pub use error::{Error, Result};
pub use notice::{Notice, NoticeCode};
pub use results::{ResultItem, ResultsResponse, ViewRequest};
pub use search::{SearchRequest, SearchResponse, SessionStatus};
pub use session::{
	ChatMessage, ChatRole, DEFAULT_SESSION_TTL, Session, SessionStore, SharedSession,
};

use std::{collections::BTreeSet, future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;
use uuid::Uuid;

use tissues_config::{Backend, ChatModel, Config};
use tissues_domain::{FacetSelection, IssueState, IssueType, LabelCategory};
use tissues_providers::{completion, search as search_api};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a Backend,
		query: &'a str,
		columns: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, tissues_providers::Result<Vec<Value>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a Backend,
		model: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, tissues_providers::Result<Option<String>>>;

	fn count_tokens<'a>(
		&'a self,
		cfg: &'a Backend,
		model: &'a str,
		text: &'a str,
	) -> BoxFuture<'a, tissues_providers::Result<i64>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(search: Arc<dyn SearchProvider>, completion: Arc<dyn CompletionProvider>) -> Self {
		Self { search, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(HttpProviders);

		Self { search: provider.clone(), completion: provider }
	}
}

struct HttpProviders;
impl SearchProvider for HttpProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a Backend,
		query: &'a str,
		columns: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, tissues_providers::Result<Vec<Value>>> {
		Box::pin(search_api::query(cfg, query, columns, limit))
	}
}
impl CompletionProvider for HttpProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a Backend,
		model: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, tissues_providers::Result<Option<String>>> {
		Box::pin(completion::try_complete(cfg, model, prompt))
	}

	fn count_tokens<'a>(
		&'a self,
		cfg: &'a Backend,
		model: &'a str,
		text: &'a str,
	) -> BoxFuture<'a, tissues_providers::Result<i64>> {
		Box::pin(completion::count_tokens(cfg, model, text))
	}
}

pub struct TissuesService {
	pub cfg: Config,
	pub providers: Providers,
	pub sessions: SessionStore,
	default_facets: FacetSelection,
}
impl TissuesService {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let default_facets = default_facets(&cfg)?;

		let sessions = SessionStore::new(Duration::from_secs(cfg.service.session_ttl_secs));

		Ok(Self { cfg, providers, sessions, default_facets })
	}

	pub fn models(&self) -> &[ChatModel] {
		&self.cfg.chat.models
	}

	pub fn session(&self, id: Uuid) -> Result<SharedSession> {
		self.sessions.get(id).ok_or_else(|| session_not_found(id))
	}

	/// Discards the session's results, quota, and chat history.
	pub fn end_session(&self, id: Uuid) -> Result<()> {
		if self.sessions.end(id) { Ok(()) } else { Err(session_not_found(id)) }
	}
}

fn session_not_found(id: Uuid) -> Error {
	Error::NotFound { message: format!("Session {id} does not exist.") }
}

/// Parses the configured default selections. Unknown values are a configuration error.
fn default_facets(cfg: &Config) -> Result<FacetSelection> {
	let results = &cfg.results;
	let mut labels = BTreeSet::new();

	for raw in &results.default_labels {
		let category = raw.parse::<LabelCategory>().map_err(|err| Error::InvalidConfig {
			message: format!("results.default_labels: {err}"),
		})?;

		labels.insert(category.as_str().to_string());
	}

	let states = results
		.default_states
		.iter()
		.map(|raw| raw.parse::<IssueState>())
		.collect::<std::result::Result<BTreeSet<_>, _>>()
		.map_err(|err| Error::InvalidConfig { message: format!("results.default_states: {err}") })?;
	let types = results
		.default_types
		.iter()
		.map(|raw| raw.parse::<IssueType>())
		.collect::<std::result::Result<BTreeSet<_>, _>>()
		.map_err(|err| Error::InvalidConfig { message: format!("results.default_types: {err}") })?;

	Ok(FacetSelection { labels, states, types })
}
