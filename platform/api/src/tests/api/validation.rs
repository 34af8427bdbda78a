use hyper::{Body, Request, StatusCode};
use serde_json::json;

use super::{json_request, send};
use crate::config::AppConfig;
use crate::tests::global::{mock_global_state, VisionReply};

#[tokio::test]
async fn test_vote_rejects_unknown_direction() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(&global, json_request("POST", "/v1/ar/model/m1/vote", &json!({ "vote": "sideways" }))).await;

	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body, json!({ "message": "invalid json body", "success": false }));
}

#[tokio::test]
async fn test_login_requires_identifier() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request("POST", "/v1/user/login", &json!({ "user_name": "  ", "password": "hunter2" })),
	)
	.await;

	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "user_name or email is required");
}

#[tokio::test]
async fn test_signup_requires_fields() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/user/signup",
			&json!({ "user_name": "ann", "email": "", "hashed_password": "x" }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "email is required");

	let res = send(
		&global,
		json_request("POST", "/v1/user/signup", &json!({ "user_name": "ann" })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_path_parameters_are_typed() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(&global, Request::get("/v1/ar/dish/soup").body(Body::empty()).unwrap()).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "invalid path parameter: id");

	let res = send(&global, Request::get("/v1/user/me").body(Body::empty()).unwrap()).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ar_bodies_are_validated() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request("POST", "/v1/ar/restaurant", &json!({ "restaurant_id": "r1", "name": " " })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "name is required");

	let res = send(
		&global,
		json_request("POST", "/v1/ar/model/m1/report", &json!({ "reported_by": 1, "reason": "" })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "reason is required");

	let res = send(
		&global,
		json_request("PUT", "/v1/ar/report/1", &json!({ "status": "ignored" })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = send(
		&global,
		json_request("POST", "/v1/ar/restaurant/r1/dish", &json!({ "name": "", "price": 9.5 })),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_path_validates_like_signup() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/user/create",
			&json!({ "user_name": "ann", "email": "ann@example.com", "hashed_password": " " }),
		),
	)
	.await;

	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "hashed_password is required");
}

#[tokio::test]
async fn test_dish_with_model_is_validated() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/ar/dish_with_model",
			&json!({ "restaurant_id": "r1", "dish_name": " ", "price": "9.99", "model_id": "m1", "uploaded_by": 1 }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "dish_name is required");

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/ar/dish_with_model",
			&json!({ "restaurant_id": "r1", "dish_name": "Tacos", "model_id": "", "uploaded_by": 1 }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "model_id is required");

	let res = send(
		&global,
		json_request(
			"POST",
			"/v1/ar/dish_with_model",
			&json!({ "restaurant_id": "r1", "dish_name": "Tacos", "model_id": "m1", "uploaded_by": "me" }),
		),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "invalid json body");
}
