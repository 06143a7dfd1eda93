use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub security: Security,
	pub backend: Backend,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub results: Results,
	pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Idle seconds after which a session is discarded.
	#[serde(default = "default_session_ttl_secs")]
	pub session_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

/// Connection parameters for the hosted search and completion backend.
///
/// The search service is addressed as `database_name.schema_name.search_service_name`;
/// completions run on `warehouse`.
#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	pub api_base: String,
	pub api_key: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	pub database_name: String,
	pub schema_name: String,
	pub search_service_name: String,
	pub warehouse: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Searches allowed per session. An exact cap: the search after the last allowed one is
	/// refused without reaching the backend.
	pub max_searches_per_session: u32,
	/// Number of candidates requested from the search service.
	pub candidate_limit: u32,
	/// Fixed projection requested from the search service.
	pub columns: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_searches_per_session: 5,
			candidate_limit: 60,
			columns: [
				"number",
				"title",
				"body",
				"state",
				"html_url",
				"closed_at",
				"created_at",
				"updated_at",
				"label_categories",
				"type",
				"reaction_total_count",
			]
			.into_iter()
			.map(str::to_string)
			.collect(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Results {
	pub min_limit: u32,
	pub max_limit: u32,
	pub default_limit: u32,
	pub default_labels: Vec<String>,
	pub default_states: Vec<String>,
	pub default_types: Vec<String>,
}
impl Default for Results {
	fn default() -> Self {
		Self {
			min_limit: 5,
			max_limit: 20,
			default_limit: 10,
			default_labels: vec!["feature".to_string(), "bug".to_string(), "enhancement".to_string()],
			default_states: vec!["open".to_string(), "closed".to_string()],
			default_types: vec!["issue".to_string()],
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
	#[serde(default)]
	pub chat_password: String,
	#[serde(default)]
	pub by_pass_password: bool,
	#[serde(default = "default_model")]
	pub default_model: String,
	#[serde(default = "default_context_char_limit")]
	pub context_char_limit: usize,
	#[serde(default = "default_models")]
	pub models: Vec<ChatModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct ChatModel {
	pub id: String,
	/// Context window in tokens.
	pub context_window: u32,
}

fn default_session_ttl_secs() -> u64 {
	3_600
}

fn default_model() -> String {
	"mistral-large2".to_string()
}

fn default_context_char_limit() -> usize {
	13_000
}

fn default_models() -> Vec<ChatModel> {
	[
		("mistral-7b", 32_000),
		("mistral-large", 32_000),
		("mistral-large2", 128_000),
		("mixtral-8x7b", 32_000),
		("llama2-70b-chat", 4_096),
		("llama3.2-1b", 128_000),
		("llama3.2-3b", 128_000),
		("gemma-7b", 8_000),
		("snowflake-arctic", 4_096),
	]
	.into_iter()
	.map(|(id, context_window)| ChatModel { id: id.to_string(), context_window })
	.collect()
}
