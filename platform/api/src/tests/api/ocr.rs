use hyper::StatusCode;
use serde_json::json;

use super::{json_request, multipart_request, send};
use crate::config::{ApiConfig, AppConfig};
use crate::tests::global::{mock_global_state, VisionReply};

const JPEG: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

#[tokio::test]
async fn test_extract_free_text() {
	let reply = VisionReply::Text("APPETIZERS\nSoup .... 5\nSalad\n\nDESSERTS\nCake .. 7.50".to_string());
	let (global, _handler) = mock_global_state(AppConfig::default(), reply).await;

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;

	assert_eq!(res.status, StatusCode::OK, "{}", res.body);
	assert_eq!(res.body["text"], "APPETIZERS\nSoup .... 5\nSalad\n\nDESSERTS\nCake .. 7.50");
	assert_eq!(
		res.body["menu"],
		json!({
			"APPETIZERS": [{ "name": "Soup", "price": "5" }, { "name": "Salad", "price": "" }],
			"DESSERTS": [{ "name": "Cake", "price": "7.50" }],
		})
	);
	assert_eq!(*global.vision.content_types.lock().unwrap(), ["image/jpeg"]);
}

#[tokio::test]
async fn test_extract_menu() {
	let reply = VisionReply::Text(
		"```json\n{\"restaurant\": {\"name\": \"Cafe\"}, \"menu\": {\"DRINKS\": [{\"name\": \"Coke\", \"sizes\": [{\"size\": \"L\", \"price\": \"$2.50\"}]}]}}\n```"
			.to_string(),
	);
	let (global, _handler) = mock_global_state(AppConfig::default(), reply).await;

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract-menu", &[("image", Some("image/png"), JPEG)]),
	)
	.await;

	assert_eq!(res.status, StatusCode::OK, "{}", res.body);
	assert_eq!(res.body["restaurant"]["name"], "Cafe");
	assert_eq!(res.body["menu"]["DRINKS"][0]["name"], "Coke");
	assert_eq!(res.body["menu"]["DRINKS"][0]["sizes"][0]["price"], 2.5);
	assert_eq!(res.body["menu"]["DRINKS"][0]["allergens"], json!([]));
	assert_eq!(res.body["ignored_fields"], json!([]));
	assert!(res.body["menu"]["DRINKS"][0].get("dish_id").is_none());
}

#[tokio::test]
async fn test_extract_menu_rejects_bad_json() {
	let reply = VisionReply::Text(r#"{"menu": {"DRINKS": [{"name": 7}]}}"#.to_string());
	let (global, _handler) = mock_global_state(AppConfig::default(), reply).await;

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract-menu", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;

	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["success"], false);
	assert_eq!(res.body["error"]["kind"], "schema");
	assert_eq!(res.body["error"]["path"], "menu.DRINKS[0].name");

	let reply = VisionReply::Text("Sorry, I could not read the menu.".to_string());
	let (global, _handler) = mock_global_state(AppConfig::default(), reply).await;

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract-menu", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;

	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["error"]["kind"], "decode");
	assert_eq!(res.body["error"]["line"], 1);
}

#[tokio::test]
async fn test_vision_failures() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Blocked).await;
	let res = send(
		&global,
		multipart_request("/v1/ocr/extract", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(res.body["message"], "content_blocked");

	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;
	let res = send(
		&global,
		multipart_request("/v1/ocr/extract-menu", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_GATEWAY);
	assert_eq!(res.body["message"], "vision_failed");
}

#[tokio::test]
async fn test_upload_validation() {
	let config = AppConfig {
		api: ApiConfig {
			max_upload_size: 16,
			..Default::default()
		},
		..Default::default()
	};
	let (global, _handler) = mock_global_state(config, VisionReply::Text("unused".to_string())).await;

	let res = send(&global, multipart_request("/v1/ocr/extract", &[("restaurant_id", None, b"r1")])).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "missing image");

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract", &[("image", Some("application/pdf"), JPEG)]),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "invalid image format");

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract", &[("image", Some("image/jpeg"), &[0u8; 64])]),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract", &[("file", Some("image/jpeg"), JPEG)]),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = send(&global, json_request("POST", "/v1/ocr/extract", &json!({}))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	assert!(global.vision.content_types.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_structure_modes() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/ocr/structure",
			&json!({ "mode": "free_text", "text": "MAINS\nBurger .... 12" }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(
		res.body,
		json!({ "mode": "free_text", "menu": { "MAINS": [{ "name": "Burger", "price": "12" }] } })
	);

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/ocr/structure",
			&json!({ "mode": "structured", "text": r#"{"menu": {"MAINS": [{"name": "Burger", "chef": "Ann"}]}}"# }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["mode"], "structured");
	assert_eq!(res.body["menu"]["MAINS"][0]["name"], "Burger");
	assert_eq!(res.body["ignored_fields"], json!(["menu.MAINS[0].chef"]));

	let res = send(
		&global,
		json_request("POST", "/v1/ocr/structure", &json!({ "mode": "structured", "text": "{}" })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["error"]["kind"], "schema");
	assert_eq!(res.body["error"]["path"], "menu");

	let res = send(
		&global,
		json_request("POST", "/v1/ocr/structure", &json!({ "mode": "poetry", "text": "" })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "invalid json body");
}

#[tokio::test]
async fn test_extract_menu_with_user_path() {
	let reply = VisionReply::Text(r#"{"menu": {"SIDES": [{"name": "Fries"}]}}"#.to_string());
	let (global, _handler) = mock_global_state(AppConfig::default(), reply).await;

	let res = send(
		&global,
		multipart_request("/v1/ocr/extract-menu/42", &[("image", Some("image/jpeg"), JPEG)]),
	)
	.await;

	assert_eq!(res.status, StatusCode::OK, "{}", res.body);
	assert_eq!(res.body["menu"]["SIDES"][0]["name"], "Fries");
}
