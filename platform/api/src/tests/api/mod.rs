use std::sync::Arc;
use std::time::Duration;

use common::prelude::FutureTimeout;
use hyper::service::Service;
use hyper::{Body, HeaderMap, Request, StatusCode};
use routerify::RequestServiceBuilder;
use serde_json::Value;

use super::global::GlobalState;
use crate::api;

mod general;
mod health;
mod ocr;
mod validation;

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

/// Runs a single request through the full router, middleware and error
/// handler included.
pub async fn send(global: &Arc<GlobalState>, req: Request<Body>) -> TestResponse {
	let router = api::routes(global).expect("failed to build router");
	let builder = RequestServiceBuilder::new(router).expect("failed to build request service");
	let mut service = builder.build("127.0.0.1:0".parse().unwrap());

	let res = service
		.call(req)
		.timeout(Duration::from_secs(5))
		.await
		.expect("request timed out")
		.expect("request failed");
	let (parts, body) = res.into_parts();
	let body = hyper::body::to_bytes(body).await.expect("failed to read body");

	TestResponse {
		status: parts.status,
		headers: parts.headers,
		body: serde_json::from_slice(&body).unwrap_or(Value::Null),
	}
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header("Content-Type", "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

pub const BOUNDARY: &str = "menuvision-test-boundary";

/// Builds a multipart upload. Each part is `(name, content_type, data)`, a
/// `None` content type makes a plain text field.
pub fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
	let mut body = Vec::new();
	for (name, content_type, data) in parts {
		body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
		match content_type {
			Some(content_type) => body.extend_from_slice(
				format!(
					"Content-Disposition: form-data; name=\"{name}\"; filename=\"menu.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
				)
				.as_bytes(),
			),
			None => body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes()),
		}
		body.extend_from_slice(data);
		body.extend_from_slice(b"\r\n");
	}
	body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

	Request::post(uri)
		.header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
		.body(Body::from(body))
		.unwrap()
}
