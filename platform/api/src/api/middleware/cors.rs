use std::sync::Arc;
use std::time::Duration;

use common::http::RouteError;
use hyper::http::header;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::global::ApiGlobal;

pub fn cors_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::post(|mut resp| async move {
		let headers = resp.headers_mut();

		headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, header::HeaderValue::from_static("*"));
		headers.insert(
			header::ACCESS_CONTROL_ALLOW_METHODS,
			header::HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
		);
		headers.insert(
			header::ACCESS_CONTROL_ALLOW_HEADERS,
			header::HeaderValue::from_static("Content-Type"),
		);
		headers.insert(header::ACCESS_CONTROL_MAX_AGE, header::HeaderValue::from(Duration::from_secs(86400).as_secs()));

		Ok(resp)
	})
}

/// Answers browser preflight requests for every path, the headers come from
/// [`cors_middleware`].
pub async fn preflight(_: Request<Body>) -> Result<Response<Body>, RouteError<ApiError>> {
	let mut resp = Response::new(Body::empty());
	*resp.status_mut() = StatusCode::NO_CONTENT;

	Ok(resp)
}
