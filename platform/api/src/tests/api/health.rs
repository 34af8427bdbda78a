use hyper::{Body, Request, StatusCode};
use serde_json::json;

use super::send;
use crate::config::AppConfig;
use crate::tests::global::{mock_global_state, VisionReply};

#[tokio::test]
async fn test_health() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(&global, Request::get("/v1/health").body(Body::empty()).unwrap()).await;

	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body, json!({ "status": "ok" }));
	assert_eq!(res.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_unknown_route() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(&global, Request::get("/v1/nothing-here").body(Body::empty()).unwrap()).await;

	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.body["success"], false);
	assert_eq!(res.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_preflight() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		Request::options("/v1/ar/model/abc/vote")
			.header("Origin", "http://localhost:3000")
			.header("Access-Control-Request-Method", "POST")
			.header("Access-Control-Request-Headers", "content-type")
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(res.status, StatusCode::NO_CONTENT);
	assert_eq!(res.body, serde_json::Value::Null);
	assert_eq!(res.headers["access-control-allow-origin"], "*");
	assert!(res.headers["access-control-allow-methods"].to_str().unwrap().contains("POST"));
	assert_eq!(res.headers["access-control-allow-headers"], "Content-Type");
}
