use std::sync::Arc;

use common::http::ext::RequestGlobalExt;
use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;

use crate::api::error::{places_error, ApiError, Result};
use crate::api::ext::{json_response, param};
use crate::global::ApiGlobal;

fn check_coordinates(longitude: f64, latitude: f64) -> Result<()> {
	if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
		return Err((StatusCode::BAD_REQUEST, "coordinates out of range").into());
	}

	Ok(())
}

#[tracing::instrument(skip_all)]
async fn nearby<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let longitude: f64 = param(&req, "longitude")?;
	let latitude: f64 = param(&req, "latitude")?;
	check_coordinates(longitude, latitude)?;

	let places = global.places().nearby(longitude, latitude).await.map_err(places_error)?;

	json_response(StatusCode::OK, &places)
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.post("/nearby/:longitude/:latitude", nearby::<G>)
		.post("/nearby-restaurants/:longitude/:latitude", nearby::<G>)
		.build()
}
