use serde_json::Value;

use crate::{Error, Result};

/// Queries the hosted search service and returns its rows in relevance order.
pub async fn query(
	cfg: &tissues_config::Backend,
	query: &str,
	columns: &[String],
	limit: u32,
) -> Result<Vec<Value>> {
	let client = crate::client(cfg)?;
	let url = service_url(cfg);
	let body = serde_json::json!({ "query": query, "columns": columns, "limit": limit });
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json = crate::read_json(res).await?;

	tracing::debug!(%url, "Search service responded.");

	parse_search_response(json)
}

fn service_url(cfg: &tissues_config::Backend) -> String {
	format!(
		"{}/api/v2/databases/{}/schemas/{}/cortex-search-services/{}:query",
		cfg.api_base, cfg.database_name, cfg.schema_name, cfg.search_service_name
	)
}

fn parse_search_response(json: Value) -> Result<Vec<Value>> {
	match json {
		Value::Object(mut map) => match map.remove("results") {
			Some(Value::Array(rows)) => Ok(rows),
			Some(Value::Null) | None => Ok(Vec::new()),
			Some(_) => Err(Error::InvalidResponse {
				message: "Search response results must be an array.".to_string(),
			}),
		},
		_ => Err(Error::InvalidResponse {
			message: "Search response must be a JSON object.".to_string(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_rows_in_backend_order() {
		let json = serde_json::json!({
			"results": [{ "number": 2 }, { "number": 1 }],
			"request_id": "abc"
		});
		let rows = parse_search_response(json).expect("parse failed");

		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0]["number"], 2);
	}

	#[test]
	fn missing_results_is_empty() {
		assert!(parse_search_response(serde_json::json!({})).expect("parse failed").is_empty());
		assert!(parse_search_response(serde_json::json!({ "results": 3 })).is_err());
		assert!(parse_search_response(serde_json::json!([])).is_err());
	}
}
