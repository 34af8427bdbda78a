use serde::Serialize;

/// Why a structured menu could not be accepted.
///
/// `Decode` means the text was not JSON at all, `Schema` means it was JSON
/// but did not have the shape of a menu.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuError {
	#[error("invalid json at line {line} column {column}: {message}")]
	Decode {
		line: usize,
		column: usize,
		message: String,
		snippet: String,
	},
	#[error("invalid menu at {path}: {message}")]
	Schema { path: String, message: String },
}

impl MenuError {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Decode { .. } => "decode",
			Self::Schema { .. } => "schema",
		}
	}

	/// Builds a decode error, capturing the text around the failing position.
	pub(crate) fn decode(text: &str, err: &serde_json::Error) -> Self {
		Self::Decode {
			line: err.line(),
			column: err.column(),
			message: strip_position(err),
			snippet: snippet(text, err.line(), err.column()),
		}
	}

	pub(crate) fn schema(path: impl Into<String>, err: &serde_json::Error) -> Self {
		Self::Schema {
			path: path.into(),
			message: strip_position(err),
		}
	}
}

/// serde_json appends " at line X column Y" to its messages; the position is
/// already carried separately.
fn strip_position(err: &serde_json::Error) -> String {
	let message = err.to_string();
	let suffix = format!(" at line {} column {}", err.line(), err.column());

	match message.strip_suffix(&suffix) {
		Some(stripped) => stripped.to_string(),
		None => message,
	}
}

const SNIPPET_RADIUS: usize = 20;

fn snippet(text: &str, line: usize, column: usize) -> String {
	let Some(source_line) = text.lines().nth(line.saturating_sub(1)) else {
		return String::new();
	};

	let chars: Vec<char> = source_line.chars().collect();
	let center = column.saturating_sub(1).min(chars.len());
	let start = center.saturating_sub(SNIPPET_RADIUS);
	let end = (center + SNIPPET_RADIUS).min(chars.len());

	chars[start..end].iter().collect()
}
