use serde::{Deserialize, Serialize};

use crate::CategoryMap;

/// Section names that mark a header even when the line is not shouted.
pub const CATEGORY_KEYWORDS: &[&str] = &[
	"APPETIZERS",
	"ENTREES",
	"DESSERTS",
	"DRINKS",
	"SIDES",
	"SALADS AND SOUPS",
	"STEAK CUTS",
	"PRIX FIXE",
	"MENU",
];

const DOT_LEADER: &str = "..";

/// One item line of an OCR'd menu. The price is left as the raw text after
/// the dot leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLine {
	pub name: String,
	pub price: String,
}

/// Best-effort grouping of OCR text into categories of `{name, price}` lines.
///
/// Lines before the first header are dropped, and a header with no item lines
/// does not appear in the result. This never fails.
pub fn parse_free_text(text: &str) -> CategoryMap<MenuLine> {
	let mut menu = CategoryMap::new();
	let mut current: Option<&str> = None;

	for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
		if is_category_header(line) {
			current = Some(line);
			continue;
		}

		match current {
			Some(category) => menu.push(category, split_item_line(line)),
			None => tracing::trace!(line, "dropping line before first category"),
		}
	}

	menu
}

/// A header is either a shouted line or one naming a known section.
pub fn is_category_header(line: &str) -> bool {
	if is_shouted(line) {
		return true;
	}

	let upper = line.to_uppercase();
	CATEGORY_KEYWORDS.iter().any(|keyword| upper.contains(keyword))
}

/// True when the line has at least one cased letter and none in lower case.
fn is_shouted(line: &str) -> bool {
	let mut cased = false;
	for c in line.chars() {
		if c.is_lowercase() {
			return false;
		}
		cased |= c.is_uppercase();
	}
	cased
}

fn split_item_line(line: &str) -> MenuLine {
	if !line.contains(DOT_LEADER) {
		return MenuLine {
			name: line.to_string(),
			price: String::new(),
		};
	}

	let mut segments = line.split(DOT_LEADER);
	let name = segments.next().unwrap_or_default().trim();
	let price = segments.last().unwrap_or_default();

	MenuLine {
		name: name.to_string(),
		price: price.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string(),
	}
}
