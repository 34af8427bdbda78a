use serde::{Deserialize, Deserializer, Serialize};
use serde_json::error::Category;

use crate::price::{self, Price};
use crate::{CategoryMap, MenuError};

/// A menu as returned by the vision service in JSON mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredMenu {
	#[serde(default)]
	pub restaurant: Option<Restaurant>,
	pub menu: CategoryMap<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
	pub name: Option<String>,
	pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
	pub name: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub sizes: Vec<Size>,
	pub description: Option<String>,
	pub spiciness: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub allergens: Vec<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub dietary_info: Vec<String>,
	pub calories: Option<String>,
	pub popularity: Option<String>,
	pub availability: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub addons: Vec<Addon>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
	pub size: Option<String>,
	#[serde(default, deserialize_with = "price::optional")]
	pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
	pub name: Option<String>,
	#[serde(default, deserialize_with = "price::optional")]
	pub price: Option<Price>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A menu that passed validation, along with the input fields that were not
/// part of the schema and got dropped.
///
/// Serializes flat, so a validated menu is itself valid input: the top level
/// `ignored_fields` key is accepted on the way back in and not reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMenu {
	#[serde(flatten)]
	pub menu: StructuredMenu,
	pub ignored_fields: Vec<String>,
}

/// Validates the raw text returned by the vision service.
///
/// A surrounding markdown code fence is removed first. Text that is not JSON
/// fails with [`MenuError::Decode`], JSON that does not match the schema with
/// [`MenuError::Schema`].
pub fn validate_structured_menu(text: &str) -> Result<ValidatedMenu, MenuError> {
	let body = unwrap_code_fence(text);

	let mut ignored = Vec::new();
	let mut de = serde_json::Deserializer::from_str(body);

	let result: Result<StructuredMenu, _> = {
		let mut cb = |path: serde_ignored::Path| record_ignored(&mut ignored, &path);
		serde_path_to_error::deserialize(serde_ignored::Deserializer::new(&mut de, &mut cb))
	};

	let menu = match result {
		Ok(menu) => menu,
		Err(err) => {
			let path = render_path(err.path());
			let err = err.into_inner();
			return Err(match err.classify() {
				Category::Data => schema_error(path, &err),
				Category::Syntax | Category::Eof | Category::Io => MenuError::decode(body, &err),
			});
		}
	};

	de.end().map_err(|err| MenuError::decode(body, &err))?;

	Ok(finish(menu, ignored))
}

/// Validates an already decoded JSON value.
pub fn validate_structured_value(value: serde_json::Value) -> Result<ValidatedMenu, MenuError> {
	let mut ignored = Vec::new();

	let result: Result<StructuredMenu, _> = {
		let mut cb = |path: serde_ignored::Path| record_ignored(&mut ignored, &path);
		serde_path_to_error::deserialize(serde_ignored::Deserializer::new(value, &mut cb))
	};

	match result {
		Ok(menu) => Ok(finish(menu, ignored)),
		Err(err) => {
			let path = render_path(err.path());
			Err(schema_error(path, err.inner()))
		}
	}
}

fn finish(menu: StructuredMenu, ignored_fields: Vec<String>) -> ValidatedMenu {
	if !ignored_fields.is_empty() {
		tracing::debug!("fields ignored while validating menu, {}", ignored_fields.join(", "));
	}

	ValidatedMenu { menu, ignored_fields }
}

/// Missing fields are reported by serde on the parent, so the field name is
/// appended to make the path point at what is absent.
fn schema_error(path: String, err: &serde_json::Error) -> MenuError {
	let message = err.to_string();
	let missing = message
		.strip_prefix("missing field `")
		.and_then(|rest| rest.split('`').next());

	let path = match missing {
		Some(field) if path.is_empty() => field.to_string(),
		Some(field) => format!("{path}.{field}"),
		None => path,
	};

	MenuError::schema(path, err)
}

fn render_path(path: &serde_path_to_error::Path) -> String {
	// the root path renders as "."
	let rendered = path.to_string();
	if rendered == "." {
		String::new()
	} else {
		rendered
	}
}

const IGNORED_FIELDS_KEY: &str = "ignored_fields";

fn record_ignored(ignored: &mut Vec<String>, path: &serde_ignored::Path) {
	let field = render_ignored(path);
	if field != IGNORED_FIELDS_KEY {
		ignored.push(field);
	}
}

fn render_ignored(path: &serde_ignored::Path) -> String {
	fn walk(path: &serde_ignored::Path, out: &mut String) {
		use serde_ignored::Path;

		match path {
			Path::Root => {}
			Path::Seq { parent, index } => {
				walk(parent, out);
				out.push_str(&format!("[{index}]"));
			}
			Path::Map { parent, key } => {
				walk(parent, out);
				if !out.is_empty() {
					out.push('.');
				}
				out.push_str(key);
			}
			Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => walk(parent, out),
		}
	}

	let mut out = String::new();
	walk(path, &mut out);
	out
}

fn unwrap_code_fence(text: &str) -> &str {
	let trimmed = text.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};

	// skip the info string, e.g. "json"
	let body = match rest.find('\n') {
		Some(idx) => &rest[idx + 1..],
		None => rest,
	};

	body.strip_suffix("```").unwrap_or(body).trim()
}
