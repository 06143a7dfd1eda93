pub mod completion;
pub mod search;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client, Response, StatusCode,
	header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

/// SQL API error code for a statement that has no running warehouse to execute on.
const NO_ACTIVE_WAREHOUSE: &str = "000606";

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn client(cfg: &tissues_config::Backend) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?)
}

/// Turns a non-success response into a classified error, otherwise decodes the JSON body.
async fn read_json(res: Response) -> Result<Value> {
	let status = res.status();

	if status.is_success() {
		return Ok(res.json().await?);
	}

	let body = res.text().await.unwrap_or_default();

	Err(classify_failure(status, &body))
}

fn classify_failure(status: StatusCode, body: &str) -> Error {
	let parsed: Option<Value> = serde_json::from_str(body).ok();
	let code = parsed.as_ref().and_then(|json| json.get("code")).and_then(Value::as_str);
	let message = parsed
		.as_ref()
		.and_then(|json| json.get("message"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| body.trim().to_string());
	let unavailable = matches!(
		status,
		StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
	) || code == Some(NO_ACTIVE_WAREHOUSE);

	if unavailable {
		Error::Unavailable { status: status.as_u16(), message }
	} else {
		Error::Rejected { status: status.as_u16(), message }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_capacity_failures_as_unavailable() {
		let err = classify_failure(StatusCode::SERVICE_UNAVAILABLE, "busy");

		assert!(err.is_unavailable());

		let err = classify_failure(
			StatusCode::UNPROCESSABLE_ENTITY,
			r#"{"code":"000606","message":"No active warehouse selected in the current session."}"#,
		);

		assert!(err.is_unavailable());
		assert_eq!(
			err.to_string(),
			"Backend unavailable (422): No active warehouse selected in the current session."
		);
	}

	#[test]
	fn classifies_other_failures_as_rejected() {
		let err = classify_failure(StatusCode::BAD_REQUEST, r#"{"code":"002003","message":"missing"}"#);

		assert!(!err.is_unavailable());
		assert!(matches!(err, Error::Rejected { status: 400, .. }));
	}
}
