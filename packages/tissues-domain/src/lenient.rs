use std::{collections::BTreeSet, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::{
	OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
	macros::format_description,
};

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::String(text)) => text,
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	})
}

pub(crate) fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(raw.as_ref().map(coerce_count).unwrap_or(0))
}

pub(crate) fn facet<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: FromStr,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::String(text)) => text.parse().ok(),
		_ => None,
	})
}

pub(crate) fn label_categories<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::String(text)) => crate::labels::parse_label_categories(&text),
		Some(Value::Array(items)) => items
			.iter()
			.filter_map(Value::as_str)
			.flat_map(crate::labels::parse_label_categories)
			.collect(),
		_ => BTreeSet::new(),
	})
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::String(text)) => parse_timestamp(&text),
		Some(Value::Number(number)) =>
			number.as_i64().and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok()),
		_ => None,
	})
}

/// Non-numeric and negative values count as zero.
fn coerce_count(value: &Value) -> u64 {
	match value {
		Value::Number(number) => number.as_u64().unwrap_or_else(|| {
			number.as_f64().filter(|value| value.is_finite() && *value > 0.0).unwrap_or(0.0) as u64
		}),
		Value::String(text) => {
			let text = text.trim();

			text.parse::<u64>().ok().unwrap_or_else(|| {
				text.parse::<f64>()
					.ok()
					.filter(|value| value.is_finite() && *value > 0.0)
					.unwrap_or(0.0) as u64
			})
		},
		_ => 0,
	}
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(ts);
	}

	// Warehouse exports drop the `T` separator and the offset.
	let naive = raw.trim_end_matches('Z').trim_end_matches(" UTC").trim();
	let with_fraction =
		format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
	let without_fraction = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

	PrimitiveDateTime::parse(naive, &with_fraction)
		.or_else(|_| PrimitiveDateTime::parse(naive, &without_fraction))
		.ok()
		.map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coerces_counts() {
		assert_eq!(coerce_count(&serde_json::json!(12)), 12);
		assert_eq!(coerce_count(&serde_json::json!("7")), 7);
		assert_eq!(coerce_count(&serde_json::json!(" 3.0 ")), 3);
		assert_eq!(coerce_count(&serde_json::json!(-4)), 0);
		assert_eq!(coerce_count(&serde_json::json!("many")), 0);
		assert_eq!(coerce_count(&serde_json::json!(null)), 0);
	}

	#[test]
	fn parses_warehouse_timestamps() {
		let ts = parse_timestamp("2024-03-09 17:45:02.000 Z").expect("timestamp");

		assert_eq!(ts.unix_timestamp(), 1_710_006_302);
		assert!(parse_timestamp("2024-03-09T17:45:02Z").is_some());
		assert!(parse_timestamp("yesterday").is_none());
	}
}
