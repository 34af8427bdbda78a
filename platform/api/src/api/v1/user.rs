use std::sync::Arc;

use common::http::ext::{OptionExt, RequestGlobalExt};
use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{credential_error, database_error, ApiError, Result};
use crate::api::ext::{json_body, json_response, param};
use crate::database::{NewUser, User, UserUpdate};
use crate::global::ApiGlobal;

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
	pub user_name: Option<String>,
	pub email: Option<String>,
	pub password: String,
}

impl LoginRequest {
	/// The user name wins when both identifiers are given.
	pub fn login(&self) -> Option<&str> {
		[self.user_name.as_deref(), self.email.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.find(|login| !login.is_empty())
	}
}

fn validate_new_user(user: &NewUser) -> Result<()> {
	let missing = [
		("user_name", &user.user_name),
		("email", &user.email),
		("hashed_password", &user.hashed_password),
	]
	.into_iter()
	.find(|(_, value)| value.trim().is_empty());

	match missing {
		Some((field, _)) => Err((StatusCode::BAD_REQUEST, format!("{field} is required")).into()),
		None => Ok(()),
	}
}

#[tracing::instrument(skip_all)]
async fn signup<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let user: NewUser = json_body(&mut req).await?;
	validate_new_user(&user)?;

	let user = User::create(global.db(), &user).await.map_err(database_error)?;
	tracing::debug!(user_id = user.id, "user created");

	json_response(StatusCode::CREATED, &json!({ "user_id": user.id }))
}

#[tracing::instrument(skip_all)]
async fn login<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let request: LoginRequest = json_body(&mut req).await?;
	let login = request
		.login()
		.map_err_route((StatusCode::BAD_REQUEST, "user_name or email is required"))?;

	let user = User::by_login(global.db(), login)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::UNAUTHORIZED, "invalid credentials"))?;

	let valid = global
		.credentials()
		.verify(&request.password, &user.hashed_password)
		.await
		.map_err(credential_error)?;

	if !valid {
		return Err((StatusCode::UNAUTHORIZED, "invalid credentials").into());
	}

	json_response(StatusCode::OK, &json!({ "user_id": user.id }))
}

async fn get<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;

	let user = User::by_id(global.db(), id)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

	json_response(StatusCode::OK, &user)
}

async fn update<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;
	let update: UserUpdate = json_body(&mut req).await?;

	let user = User::update(global.db(), id, &update)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

	json_response(StatusCode::OK, &user)
}

async fn delete<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;

	if !User::delete(global.db(), id).await.map_err(database_error)? {
		return Err((StatusCode::NOT_FOUND, "user not found").into());
	}

	json_response(StatusCode::OK, &json!({ "success": true }))
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.post("/signup", signup::<G>)
		.post("/create", signup::<G>)
		.post("/login", login::<G>)
		.get("/:id", get::<G>)
		.put("/:id", update::<G>)
		.delete("/:id", delete::<G>)
		.build()
}
