//! Completions and token counts, executed as SQL statements on the backend warehouse.

use serde_json::Value;

use crate::{Error, Result};

const TRY_COMPLETE: &str = "select SNOWFLAKE.CORTEX.TRY_COMPLETE(?, ?) as response";
const COUNT_TOKENS: &str = "select SNOWFLAKE.CORTEX.COUNT_TOKENS(?, ?) as token_count";

/// Runs a completion. `None` means the model produced nothing, which the backend does when
/// the prompt exceeds the model's context window.
pub async fn try_complete(
	cfg: &tissues_config::Backend,
	model: &str,
	prompt: &str,
) -> Result<Option<String>> {
	let json = execute(cfg, TRY_COMPLETE, model, prompt).await?;

	Ok(first_cell(&json)?.filter(|text| !text.is_empty()))
}

/// Counts the tokens `text` occupies for `model`.
pub async fn count_tokens(cfg: &tissues_config::Backend, model: &str, text: &str) -> Result<i64> {
	let json = execute(cfg, COUNT_TOKENS, model, text).await?;
	let cell = first_cell(&json)?.ok_or_else(|| Error::InvalidResponse {
		message: "Token count response is empty.".to_string(),
	})?;

	cell.trim().parse().map_err(|_| Error::InvalidResponse {
		message: format!("Token count '{cell}' is not an integer."),
	})
}

async fn execute(
	cfg: &tissues_config::Backend,
	statement: &str,
	model: &str,
	text: &str,
) -> Result<Value> {
	let client = crate::client(cfg)?;
	let url = format!("{}/api/v2/statements", cfg.api_base);
	let body = statement_body(cfg, statement, model, text);
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;

	crate::read_json(res).await
}

fn statement_body(
	cfg: &tissues_config::Backend,
	statement: &str,
	model: &str,
	text: &str,
) -> Value {
	serde_json::json!({
		"statement": statement,
		"timeout": cfg.timeout_ms.div_ceil(1_000),
		"database": cfg.database_name,
		"schema": cfg.schema_name,
		"warehouse": cfg.warehouse,
		"bindings": {
			"1": { "type": "TEXT", "value": model },
			"2": { "type": "TEXT", "value": text },
		},
	})
}

/// The SQL API returns every cell as a string (or null) in `data[row][column]`.
fn first_cell(json: &Value) -> Result<Option<String>> {
	let cell = json
		.get("data")
		.and_then(Value::as_array)
		.and_then(|rows| rows.first())
		.and_then(Value::as_array)
		.and_then(|row| row.first())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Statement response is missing data[0][0].".to_string(),
		})?;

	match cell {
		Value::Null => Ok(None),
		Value::String(text) => Ok(Some(text.clone())),
		other => Ok(Some(other.to_string())),
	}
}
