//! Turns menu text pulled out of images into typed, categorized menus.
//!
//! Two paths are offered. [`parse_free_text`] groups plain OCR text with a
//! header heuristic and never fails. [`validate_structured_menu`] checks JSON
//! produced by a vision model against a fixed schema and rejects anything
//! that does not fit. [`structure`] dispatches between them.

mod category_map;
mod errors;
mod free_text;
mod price;
mod structured;

use serde::{Deserialize, Serialize};

pub use crate::category_map::CategoryMap;
pub use crate::errors::MenuError;
pub use crate::free_text::{is_category_header, parse_free_text, MenuLine, CATEGORY_KEYWORDS};
pub use crate::price::Price;
pub use crate::structured::{
	validate_structured_menu, validate_structured_value, Addon, MenuItem, Restaurant, Size, StructuredMenu, ValidatedMenu,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSource {
	/// Plain OCR text.
	FreeText,
	/// JSON following the menu schema.
	Structured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StructuredResult {
	FreeText { menu: CategoryMap<MenuLine> },
	Structured(ValidatedMenu),
}

pub fn structure(source: MenuSource, text: &str) -> Result<StructuredResult, MenuError> {
	match source {
		MenuSource::FreeText => Ok(StructuredResult::FreeText {
			menu: parse_free_text(text),
		}),
		MenuSource::Structured => validate_structured_menu(text).map(StructuredResult::Structured),
	}
}

#[cfg(test)]
mod tests;
