//! Offline conversion of raw GitHub issue dumps into rows the search service can index.

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use serde_json::{Map, Value};

use tissues_domain::labels;

#[derive(Debug, Parser)]
#[command(
	version = tissues_cli::VERSION,
	rename_all = "kebab",
	styles = tissues_cli::styles(),
)]
pub struct Args {
	/// JSON array of issues as returned by the GitHub REST API.
	#[arg(long, short = 'i', value_name = "FILE")]
	pub input: PathBuf,
	#[arg(long, short = 'o', value_name = "FILE")]
	pub output: PathBuf,
	#[arg(long, default_value = "info")]
	pub log_level: String,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	tissues_cli::init_tracing(&args.log_level);

	let raw = fs::read_to_string(&args.input)?;
	let dump: Value = serde_json::from_str(&raw)?;
	let rows = process_dump(&dump)?;

	fs::write(&args.output, serde_json::to_string_pretty(&rows)?)?;

	tracing::info!(
		input = %args.input.display(),
		output = %args.output.display(),
		rows = rows.len(),
		"Issue dump processed."
	);

	Ok(())
}

/// Converts every issue object in the dump. Entries that are not objects are skipped.
pub fn process_dump(dump: &Value) -> color_eyre::Result<Vec<Value>> {
	let Some(issues) = dump.as_array() else {
		return Err(eyre::eyre!("Issue dump must be a JSON array."));
	};
	let rows: Vec<Value> = issues.iter().filter_map(process_issue).collect();

	if rows.len() < issues.len() {
		tracing::warn!(skipped = issues.len() - rows.len(), "Skipped entries that are not objects.");
	}

	Ok(rows)
}

/// Builds one indexable row: label names, their encoded categories, the issue type, and
/// the reaction total.
pub fn process_issue(raw: &Value) -> Option<Value> {
	let issue = raw.as_object()?;
	let label_names = issue.get("labels").map(labels::extract_label_names).unwrap_or_default();
	let categories = labels::categorize_labels(&label_names);
	let is_pull_request = issue
		.get("pull_request")
		.and_then(|pr| pr.get("html_url"))
		.is_some_and(|url| !url.is_null());
	let reaction_total_count = issue
		.get("reactions")
		.and_then(|reactions| reactions.get("total_count"))
		.and_then(Value::as_u64)
		.unwrap_or(0);
	let mut row = Map::new();

	for key in ["number", "title", "state", "html_url", "created_at", "updated_at", "closed_at"] {
		row.insert(key.to_string(), issue.get(key).cloned().unwrap_or(Value::Null));
	}

	row.insert(
		"body".to_string(),
		Value::String(issue.get("body").and_then(Value::as_str).unwrap_or_default().to_string()),
	);
	row.insert(
		"labels".to_string(),
		Value::Array(label_names.into_iter().map(Value::String).collect()),
	);
	row.insert(
		"label_categories".to_string(),
		Value::String(labels::encode_label_categories(&categories)),
	);
	row.insert(
		"type".to_string(),
		Value::String(if is_pull_request { "pull_request" } else { "issue" }.to_string()),
	);
	row.insert("reaction_total_count".to_string(), Value::from(reaction_total_count));

	Some(Value::Object(row))
}
