use std::collections::HashMap;

use menu_structure::{CategoryMap, MenuItem, Restaurant, StructuredMenu, ValidatedMenu};

use crate::database::CatalogEntry;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CatalogItem {
	#[serde(flatten)]
	pub item: MenuItem,
	pub dish_id: Option<i64>,
	pub model_id: Option<String>,
}

/// A validated menu whose items are linked to the restaurant's dishes.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CatalogMenu {
	pub restaurant: Option<Restaurant>,
	pub menu: CategoryMap<CatalogItem>,
	pub ignored_fields: Vec<String>,
}

fn normalize(name: &str) -> String {
	name.trim().to_lowercase()
}

/// Attaches `dish_id` and the best rated `model_id` to every item whose name
/// matches a catalog dish, ignoring case and surrounding whitespace. The first
/// catalog entry wins when several dishes share a name.
pub fn cross_reference(validated: ValidatedMenu, catalog: &[CatalogEntry]) -> CatalogMenu {
	let mut by_name = HashMap::<String, &CatalogEntry>::new();
	for entry in catalog {
		by_name.entry(normalize(&entry.name)).or_insert(entry);
	}

	let ValidatedMenu {
		menu: StructuredMenu { restaurant, menu },
		ignored_fields,
	} = validated;

	let menu = menu.map_items(|_, item| {
		let entry = item.name.as_deref().and_then(|name| by_name.get(&normalize(name)));

		CatalogItem {
			dish_id: entry.map(|entry| entry.dish_id),
			model_id: entry.and_then(|entry| entry.model_id.clone()),
			item,
		}
	});

	CatalogMenu {
		restaurant,
		menu,
		ignored_fields,
	}
}
