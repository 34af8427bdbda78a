use std::str::FromStr;

use common::http::ext::ResultExt;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::ext::RequestExt as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, Result};

/// Reads the whole body and decodes it as JSON.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request<Body>) -> Result<T> {
	let body = hyper::body::to_bytes(req.body_mut())
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

	serde_json::from_slice(&body).map_err_route((StatusCode::BAD_REQUEST, "invalid json body"))
}

/// A path parameter parsed into `T`, 400 when absent or malformed.
pub fn param<T: FromStr>(req: &Request<Body>, name: &str) -> Result<T> {
	req.param(name)
		.and_then(|value| value.parse().ok())
		.ok_or_else(|| RouteError::from((StatusCode::BAD_REQUEST, format!("invalid path parameter: {name}"))))
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>> {
	let body = serde_json::to_string(body).map_err(|err| {
		RouteError::<ApiError>::from((StatusCode::INTERNAL_SERVER_ERROR, "failed to serialize response", err))
	})?;

	Ok(make_response!(status, body))
}
