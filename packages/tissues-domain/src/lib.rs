pub mod context;
pub mod issue;
pub mod labels;
pub mod view;

mod lenient;
mod time_serde;

pub use context::{DEFAULT_CONTEXT_CHAR_LIMIT, assemble_context, build_prompt, record_block};
pub use issue::{IssueRecord, IssueState, IssueType, UnknownVariant};
pub use labels::{LabelCategory, categorize_label, encode_label_categories, parse_label_categories};
pub use view::{FacetSelection, SortKey, View, ViewSpec};
