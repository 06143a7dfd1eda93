use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use tissues_config::{ChatModel, Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn with_table<F>(table: &str, edit: F) -> String
where
	F: FnOnce(&mut toml::Table),
{
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");
	let section = root
		.get_mut(table)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{table}]."));

	edit(section);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("tissues_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> tissues_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = tissues_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn validation_message(result: tissues_config::Result<Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(other) => panic!("Expected validation error, got {other:?}."),
		Ok(_) => panic!("Expected validation error, got a valid config."),
	}
}

#[test]
fn loads_sample_config_with_defaults() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must load.");

	assert_eq!(cfg.backend.api_base, "https://example.snowflakecomputing.com");
	assert_eq!(cfg.search.columns.len(), 11);
	assert_eq!(cfg.results.default_labels, vec!["feature", "bug", "enhancement"]);
	assert_eq!(cfg.results.default_types, vec!["issue"]);
	assert_eq!(cfg.chat.models.len(), 9);
	assert!(cfg.chat.models.contains(&ChatModel {
		id: "llama2-70b-chat".to_string(),
		context_window: 4_096
	}));
	assert!(cfg.security.bind_localhost_only);
	assert_eq!(cfg.service.session_ttl_secs, 3_600);
}

#[test]
fn reports_missing_file() {
	let path = env::temp_dir().join("tissues_config_test_missing_file.toml");
	let err = tissues_config::load(&path).expect_err("Expected read failure.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn reports_parse_failure() {
	let err = load_payload("[service\nhttp_bind = ".to_string()).expect_err("Expected parse failure.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn rejects_empty_backend_fields() {
	let payload = with_table("backend", |backend| {
		backend.insert("warehouse".to_string(), Value::String("  ".to_string()));
	});

	assert_eq!(validation_message(load_payload(payload)), "backend.warehouse must be non-empty.");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut value = sample_value();
	let headers = value
		.get_mut("backend")
		.and_then(|backend| backend.get_mut("default_headers"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [backend.default_headers].");

	headers.insert("X-Retry".to_string(), Value::Integer(3));

	let payload = toml::to_string(&value).expect("Failed to render template config.");

	assert_eq!(
		validation_message(load_payload(payload)),
		"backend.default_headers values must be strings."
	);
}

#[test]
fn rejects_default_limit_out_of_range() {
	let payload = with_table("results", |results| {
		results.insert("default_limit".to_string(), Value::Integer(25));
	});

	assert_eq!(
		validation_message(load_payload(payload)),
		"results.default_limit must be within results.min_limit and results.max_limit."
	);
}

#[test]
fn rejects_zero_search_quota() {
	let payload = with_table("search", |search| {
		search.insert("max_searches_per_session".to_string(), Value::Integer(0));
	});

	assert_eq!(
		validation_message(load_payload(payload)),
		"search.max_searches_per_session must be greater than zero."
	);
}

#[test]
fn rejects_unknown_default_model() {
	let payload = with_table("chat", |chat| {
		chat.insert("default_model".to_string(), Value::String("gpt-9".to_string()));
	});

	assert_eq!(
		validation_message(load_payload(payload)),
		"chat.default_model must be one of chat.models."
	);
}

#[test]
fn requires_password_unless_bypassed() {
	let locked = with_table("chat", |chat| {
		chat.insert("chat_password".to_string(), Value::String(String::new()));
	});

	assert_eq!(
		validation_message(load_payload(locked)),
		"chat.chat_password must be non-empty unless chat.by_pass_password is true."
	);

	let open = with_table("chat", |chat| {
		chat.insert("chat_password".to_string(), Value::String(String::new()));
		chat.insert("by_pass_password".to_string(), Value::Boolean(true));
	});

	assert!(load_payload(open).is_ok());
}

#[test]
fn rejects_zero_session_ttl() {
	let payload = with_table("service", |service| {
		service.insert("session_ttl_secs".to_string(), Value::Integer(0));
	});

	assert_eq!(
		validation_message(load_payload(payload)),
		"service.session_ttl_secs must be greater than zero."
	);
}
