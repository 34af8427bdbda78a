use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::Router;

use super::error::ApiError;
use crate::global::ApiGlobal;

pub mod ar;
pub mod general;
pub mod health;
pub mod ocr;
pub mod user;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.scope("/health", health::routes(global)?)
		.scope("/user", user::routes(global)?)
		.scope("/ar", ar::routes(global)?)
		.scope("/ocr", ocr::routes(global)?)
		.scope("/general", general::routes(global)?)
		.build()
}
