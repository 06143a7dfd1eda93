use crate::{issue::IssueRecord, labels};

pub const DEFAULT_CONTEXT_CHAR_LIMIT: usize = 13_000;

const PROMPT_PREAMBLE: &str = "\
You are a slightly snarky but highly competent assistant specializing in software development, \
particularly in Python and Streamlit. You help users understand and resolve problems in their \
Streamlit projects using the GitHub issues provided in the context. You are tired of answering \
the same questions all day, yet you still do the job remarkably well. Answer with a touch of dry \
humor, but always be accurate and helpful.

Only answer from the facts in the context. If the answer cannot be found in the context, say so \
and do not make anything up. When relevant, tell the user what additional information would help.";

/// Renders the fields of one record that are handed to the model.
pub fn record_block(record: &IssueRecord) -> String {
	format!(
		"<title>: {}\n<label_categories>: {}\n<state>: {}\n<type>: {}\n<reaction_total_count>: {}\n<body>: {}",
		record.title,
		labels::encode_label_categories(&record.label_categories),
		record.state.map(|state| state.as_str()).unwrap_or_default(),
		record.issue_type.map(|kind| kind.as_str()).unwrap_or_default(),
		record.reaction_total_count,
		record.body,
	)
}

/// Joins per-record blocks with newlines under a total character budget.
///
/// At most `max_records` records are used (all when `None`). Each block is cut to
/// `budget_chars / included` characters, so the result never exceeds
/// `included * (budget_chars / included) + included - 1` characters.
pub fn assemble_context(
	records: &[&IssueRecord],
	budget_chars: usize,
	max_records: Option<usize>,
) -> String {
	let included = max_records.map_or(records.len(), |max| max.min(records.len()));

	if included == 0 {
		return String::new();
	}

	let per_record = budget_chars / included;
	let blocks: Vec<String> = records[..included]
		.iter()
		.map(|record| truncate_chars(record_block(record), per_record))
		.collect();

	blocks.join("\n")
}

/// Embeds the context and the user's question under the fixed instruction preamble.
pub fn build_prompt(question: &str, context: &str) -> String {
	format!("{PROMPT_PREAMBLE}\n\nContext: {context}\n\nQuestion: {question}\n\nAnswer:")
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
	if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
		text.truncate(byte_index);
	}

	text
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_on_char_boundaries() {
		assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
		assert_eq!(truncate_chars("hi".to_string(), 5), "hi");
		assert_eq!(truncate_chars("hi".to_string(), 0), "");
	}

	#[test]
	fn prompt_places_context_before_question() {
		let prompt = build_prompt("Why?", "<title>: A");
		let context_at = prompt.find("Context: <title>: A").expect("context");
		let question_at = prompt.find("Question: Why?").expect("question");

		assert!(context_at < question_at);
		assert!(prompt.ends_with("Answer:"));
	}
}
