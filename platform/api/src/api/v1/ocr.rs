use std::sync::Arc;

use bytes::Bytes;
use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use menu_structure::{parse_free_text, structure, validate_structured_menu, MenuSource};
use multer::{Constraints, SizeLimit};
use routerify::Router;
use serde_json::json;

use crate::api::error::{database_error, menu_error, vision_error, ApiError, Result};
use crate::api::ext::{json_body, json_response};
use crate::catalog::cross_reference;
use crate::config::ApiConfig;
use crate::database::CatalogEntry;
use crate::global::ApiGlobal;

/// An uploaded menu photo.
#[derive(Debug)]
struct MenuUpload {
	image: Bytes,
	content_type: String,
	restaurant_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct StructureRequest {
	pub mode: MenuSource,
	pub text: String,
}

async fn read_upload(req: Request<Body>, max_size: u64) -> Result<MenuUpload> {
	let content_type = req
		.headers()
		.get(hyper::header::CONTENT_TYPE)
		.map_err_route((StatusCode::BAD_REQUEST, "missing content-type header"))?
		.to_str()
		.map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

	let boundary = multer::parse_boundary(content_type)
		.map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

	let constraints = Constraints::new()
		.allowed_fields(vec!["image", "restaurant_id"])
		.size_limit(
			SizeLimit::new()
				.for_field("image", max_size)
				.for_field("restaurant_id", 1024),
		);

	let mut multipart = multer::Multipart::with_constraints(req.into_body(), boundary, constraints);

	let mut image = None;
	let mut restaurant_id = None;

	while let Some(field) = multipart
		.next_field()
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?
	{
		match field.name() {
			Some("image") => {
				let content_type = field
					.content_type()
					.map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body, missing image content-type"))?;

				if content_type.type_().as_str() != "image" {
					return Err((StatusCode::BAD_REQUEST, "invalid image format").into());
				}

				let content_type = content_type.essence_str().to_owned();
				let data = field
					.bytes()
					.await
					.map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
				image = Some((data, content_type));
			}
			Some("restaurant_id") => {
				let text = field
					.text()
					.await
					.map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
				let text = text.trim();
				restaurant_id = (!text.is_empty()).then(|| text.to_owned());
			}
			_ => return Err((StatusCode::BAD_REQUEST, "invalid multipart body").into()),
		}
	}

	let (image, content_type) = image.map_err_route((StatusCode::BAD_REQUEST, "missing image"))?;
	if image.is_empty() {
		return Err((StatusCode::BAD_REQUEST, "empty image").into());
	}

	Ok(MenuUpload {
		image,
		content_type,
		restaurant_id,
	})
}

#[tracing::instrument(skip_all)]
async fn extract<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let upload = read_upload(req, global.config::<ApiConfig>().max_upload_size).await?;

	let text = global
		.vision()
		.extract_text(upload.image, &upload.content_type)
		.await
		.map_err(vision_error)?;

	let menu = parse_free_text(&text);
	tracing::debug!(categories = menu.len(), "free text menu parsed");

	json_response(StatusCode::OK, &json!({ "text": text, "menu": menu }))
}

#[tracing::instrument(skip_all)]
async fn extract_menu<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let upload = read_upload(req, global.config::<ApiConfig>().max_upload_size).await?;

	let text = global
		.vision()
		.extract_menu(upload.image, &upload.content_type)
		.await
		.map_err(vision_error)?;

	let validated = validate_structured_menu(&text).map_err(menu_error)?;
	if !validated.ignored_fields.is_empty() {
		tracing::debug!(ignored = ?validated.ignored_fields, "vision output carried unknown fields");
	}

	match upload.restaurant_id {
		Some(restaurant_id) => {
			let catalog = CatalogEntry::by_restaurant(global.db(), &restaurant_id)
				.await
				.map_err(database_error)?;

			json_response(StatusCode::OK, &cross_reference(validated, &catalog))
		}
		None => json_response(StatusCode::OK, &validated),
	}
}

async fn structure_text<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let request: StructureRequest = json_body(&mut req).await?;

	let result = structure(request.mode, &request.text).map_err(menu_error)?;

	json_response(StatusCode::OK, &result)
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.post("/extract", extract::<G>)
		.post("/extract-menu", extract_menu::<G>)
		.post("/extract-menu/:user_id", extract_menu::<G>)
		.post("/structure", structure_text::<G>)
		.build()
}
