mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Chat, ChatModel, Config, Results, Search, Security, Service};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	if cfg.service.session_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "service.session_ttl_secs must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("backend.api_base", &cfg.backend.api_base),
		("backend.api_key", &cfg.backend.api_key),
		("backend.database_name", &cfg.backend.database_name),
		("backend.schema_name", &cfg.backend.schema_name),
		("backend.search_service_name", &cfg.backend.search_service_name),
		("backend.warehouse", &cfg.backend.warehouse),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.backend.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.backend.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "backend.default_headers values must be strings.".to_string(),
		});
	}
	if cfg.search.max_searches_per_session == 0 {
		return Err(Error::Validation {
			message: "search.max_searches_per_session must be greater than zero.".to_string(),
		});
	}
	if cfg.search.candidate_limit == 0 {
		return Err(Error::Validation {
			message: "search.candidate_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.columns.is_empty() {
		return Err(Error::Validation {
			message: "search.columns must be non-empty.".to_string(),
		});
	}

	let results = &cfg.results;

	if results.min_limit == 0 {
		return Err(Error::Validation {
			message: "results.min_limit must be greater than zero.".to_string(),
		});
	}
	if !(results.min_limit..=results.max_limit).contains(&results.default_limit) {
		return Err(Error::Validation {
			message: "results.default_limit must be within results.min_limit and results.max_limit."
				.to_string(),
		});
	}
	if cfg.chat.context_char_limit == 0 {
		return Err(Error::Validation {
			message: "chat.context_char_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.models.is_empty() {
		return Err(Error::Validation { message: "chat.models must be non-empty.".to_string() });
	}

	let mut seen = HashSet::new();

	for model in &cfg.chat.models {
		if model.id.trim().is_empty() {
			return Err(Error::Validation {
				message: "chat.models.id must be non-empty.".to_string(),
			});
		}
		if !seen.insert(model.id.as_str()) {
			return Err(Error::Validation {
				message: format!("chat.models contains duplicate id {}.", model.id),
			});
		}
		if model.context_window == 0 {
			return Err(Error::Validation {
				message: format!("chat.models.{} context_window must be greater than zero.", model.id),
			});
		}
	}

	if !seen.contains(cfg.chat.default_model.as_str()) {
		return Err(Error::Validation {
			message: "chat.default_model must be one of chat.models.".to_string(),
		});
	}
	if !cfg.chat.by_pass_password && cfg.chat.chat_password.trim().is_empty() {
		return Err(Error::Validation {
			message: "chat.chat_password must be non-empty unless chat.by_pass_password is true."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.backend.api_base.trim().trim_end_matches('/').to_string();

	cfg.backend.api_base = trimmed;
	cfg.chat.default_model = cfg.chat.default_model.trim().to_string();
}
