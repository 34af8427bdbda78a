use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{validate_structured_menu, validate_structured_value, MenuError, Price};

fn price(s: &str) -> Option<Price> {
	Some(Price::new(Decimal::from_str(s).unwrap()))
}

#[test]
fn test_minimal_item_gets_defaults() {
	let validated =
		validate_structured_menu(r#"{"menu": {"DRINKS":[{"name":"Coke","sizes":[{"size":"12 oz","price":2.5}]}]}}"#)
			.unwrap();

	assert!(validated.ignored_fields.is_empty());
	assert_eq!(validated.menu.restaurant, None);

	let drinks = validated.menu.menu.get("DRINKS").unwrap();
	assert_eq!(drinks.len(), 1);

	let coke = &drinks[0];
	assert_eq!(coke.name.as_deref(), Some("Coke"));
	assert_eq!(coke.sizes.len(), 1);
	assert_eq!(coke.sizes[0].size.as_deref(), Some("12 oz"));
	assert_eq!(coke.sizes[0].price, price("2.50"));
	assert!(coke.allergens.is_empty());
	assert!(coke.dietary_info.is_empty());
	assert!(coke.addons.is_empty());

	let json = serde_json::to_value(&validated).unwrap();
	assert_eq!(json["menu"]["DRINKS"][0]["allergens"], serde_json::json!([]));
	assert_eq!(json["menu"]["DRINKS"][0]["dietary_info"], serde_json::json!([]));
	assert_eq!(json["menu"]["DRINKS"][0]["addons"], serde_json::json!([]));
	assert_eq!(json["menu"]["DRINKS"][0]["sizes"][0]["price"], serde_json::json!(2.5));
}

#[test]
fn test_null_sequences_become_empty() {
	let validated = validate_structured_menu(
		r#"{"restaurant": null, "menu": {"MAINS": [{"name": "Pad Thai", "sizes": null, "allergens": null, "addons": null}]}}"#,
	)
	.unwrap();

	let item = &validated.menu.menu.get("MAINS").unwrap()[0];
	assert!(item.sizes.is_empty());
	assert!(item.allergens.is_empty());
	assert!(item.addons.is_empty());
}

#[test]
fn test_missing_menu() {
	let err = validate_structured_menu(r#"{"restaurant": {"name": "Luigi's", "address": null}}"#).unwrap_err();

	match err {
		MenuError::Schema { path, message } => {
			assert_eq!(path, "menu");
			assert!(message.contains("missing field `menu`"), "{message}");
		}
		err => panic!("expected schema error, got {err:?}"),
	}
}

#[test]
fn test_numeric_name() {
	let err = validate_structured_menu(r#"{"menu": {"DRINKS": [{"name": "Coke"}, {"name": 7}]}}"#).unwrap_err();

	match err {
		MenuError::Schema { path, message } => {
			assert_eq!(path, "menu.DRINKS[1].name");
			assert!(message.contains("expected a string"), "{message}");
		}
		err => panic!("expected schema error, got {err:?}"),
	}
}

#[test]
fn test_wrong_shapes_are_rejected() {
	let err = validate_structured_menu(r#"{"menu": ["DRINKS"]}"#).unwrap_err();
	assert!(matches!(err, MenuError::Schema { ref path, .. } if path == "menu"), "{err:?}");

	let err = validate_structured_menu(r#"{"menu": {"DRINKS": [{"name": "Tea", "allergens": "none"}]}}"#).unwrap_err();
	assert!(
		matches!(err, MenuError::Schema { ref path, .. } if path == "menu.DRINKS[0].allergens"),
		"{err:?}"
	);

	let err =
		validate_structured_menu(r#"{"menu": {"DRINKS": [{"name": "Tea", "sizes": [{"price": "ask"}]}]}}"#).unwrap_err();
	assert!(
		matches!(err, MenuError::Schema { ref path, .. } if path == "menu.DRINKS[0].sizes[0].price"),
		"{err:?}"
	);
}

#[test]
fn test_decode_error_is_distinct() {
	let err = validate_structured_menu("{\"menu\": {\"DRINKS\": [}").unwrap_err();

	match err {
		MenuError::Decode { line, column, snippet, .. } => {
			assert_eq!(line, 1);
			assert!(column > 0);
			assert!(snippet.contains("DRINKS"), "{snippet}");
		}
		err => panic!("expected decode error, got {err:?}"),
	}

	let err = validate_structured_menu("I could not read this menu.").unwrap_err();
	assert_eq!(err.kind(), "decode");

	let err = validate_structured_menu(r#"{"menu": {}} trailing"#).unwrap_err();
	assert_eq!(err.kind(), "decode");
}

#[test]
fn test_string_prices_are_extracted() {
	let validated = validate_structured_menu(
		r#"{"menu": {"MAINS": [{"name": "Burger", "sizes": [{"size": "regular", "price": "$12.99 (450-600 cal)"}, {"size": "large", "price": ""}], "addons": [{"name": "Bacon", "price": 1.259}]}]}}"#,
	)
	.unwrap();

	let burger = &validated.menu.menu.get("MAINS").unwrap()[0];
	assert_eq!(burger.sizes[0].price, price("12.99"));
	assert_eq!(burger.sizes[1].price, None);
	assert_eq!(burger.addons[0].price, price("1.26"));
}

#[test]
fn test_code_fence_is_unwrapped() {
	let text = "```json\n{\"menu\": {\"SIDES\": [{\"name\": \"Fries\"}]}}\n```";
	let validated = validate_structured_menu(text).unwrap();

	assert_eq!(validated.menu.menu.get("SIDES").unwrap()[0].name.as_deref(), Some("Fries"));
}

#[test]
fn test_unknown_fields_are_reported() {
	let validated = validate_structured_menu(
		r#"{"currency": "USD", "menu": {"MAINS": [{"name": "Ramen", "chef_note": "house special", "sizes": [{"size": "bowl", "price": 14, "unit": "each"}]}]}}"#,
	)
	.unwrap();

	assert_eq!(
		validated.ignored_fields,
		vec!["currency", "menu.MAINS[0].chef_note", "menu.MAINS[0].sizes[0].unit"]
	);
}

#[test]
fn test_name_is_kept_verbatim() {
	let validated = validate_structured_menu(r#"{"menu": {"Soups": [{"name": "  Tom Yum  (hot!) "}]}}"#).unwrap();

	assert_eq!(
		validated.menu.menu.get("Soups").unwrap()[0].name.as_deref(),
		Some("  Tom Yum  (hot!) ")
	);
}

#[test]
fn test_revalidation_is_idempotent() {
	let first = validate_structured_menu(
		r#"{
			"restaurant": {"name": "Luigi's", "address": "1 Main St"},
			"menu": {
				"PASTA": [
					{"name": "Carbonara", "sizes": [{"size": "full", "price": "16.5"}], "allergens": ["egg", "gluten"], "spiciness": "mild", "extra": 1},
					{"name": "Arrabbiata", "dietary_info": ["vegan"], "addons": [{"name": "Chili", "price": 0.999}]}
				],
				"DESSERTS": [{"name": "Tiramisu", "calories": "450", "availability": "daily"}]
			}
		}"#,
	)
	.unwrap();

	assert_eq!(first.ignored_fields, vec!["menu.PASTA[0].extra".to_string()]);

	// the whole validated object, ignored_fields included, goes back in
	let canonical = serde_json::to_value(&first).unwrap();
	let second = validate_structured_value(canonical).unwrap();

	assert_eq!(second.menu, first.menu);
	assert!(second.ignored_fields.is_empty(), "{:?}", second.ignored_fields);

	let third = validate_structured_menu(&serde_json::to_string(&second).unwrap()).unwrap();
	assert_eq!(third, second);
	assert_eq!(serde_json::to_value(&third).unwrap(), serde_json::to_value(&second).unwrap());
}

#[test]
fn test_nested_ignored_fields_key_is_reported() {
	let validated = validate_structured_menu(
		r#"{"ignored_fields": [], "menu": {"SIDES": [{"name": "Fries", "ignored_fields": ["x"]}]}}"#,
	)
	.unwrap();

	assert_eq!(validated.ignored_fields, vec!["menu.SIDES[0].ignored_fields".to_string()]);
}

#[test]
fn test_thousands_separated_price() {
	let validated = validate_structured_menu(
		r#"{"menu": {"STEAK CUTS": [{"name": "Wagyu", "sizes": [{"size": "32 oz", "price": "$1,250.00"}]}]}}"#,
	)
	.unwrap();

	let wagyu = &validated.menu.menu.get("STEAK CUTS").unwrap()[0];
	assert_eq!(wagyu.sizes[0].price, price("1250.00"));
}

#[test]
fn test_value_errors_are_schema_errors() {
	let err = validate_structured_value(serde_json::json!({ "menu": { "DRINKS": [{ "name": 5 }] } })).unwrap_err();

	assert_eq!(
		err,
		MenuError::Schema {
			path: "menu.DRINKS[0].name".to_string(),
			message: "invalid type: integer `5`, expected a string".to_string(),
		}
	);
}
