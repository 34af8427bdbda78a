use std::collections::HashMap;
use std::sync::Arc;

use common::http::ext::{OptionExt, RequestGlobalExt};
use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{database_error, ApiError, Result};
use crate::api::ext::{json_body, json_response, param};
use crate::database::{ArModel, Dish, DishUpdate, ModelReport, NewDish, ReportStatus, Restaurant, Vote};
use crate::global::ApiGlobal;

#[derive(Debug, serde::Deserialize)]
pub struct NewRestaurant {
	pub restaurant_id: String,
	pub name: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct NewModel {
	pub model_id: String,
	pub uploaded_by: i64,
}

/// A new dish uploaded together with its first model.
#[derive(Debug, serde::Deserialize)]
pub struct NewDishWithModel {
	pub restaurant_id: String,
	pub dish_name: String,
	pub description: Option<String>,
	pub ingredients: Option<String>,
	#[serde(default, with = "rust_decimal::serde::float_option")]
	pub price: Option<rust_decimal::Decimal>,
	pub nutritional_info: Option<String>,
	pub allergens: Option<String>,
	pub model_id: String,
	pub uploaded_by: i64,
}

impl NewDishWithModel {
	/// Blank optional text is stored as absent.
	pub fn dish(&self) -> NewDish {
		fn non_blank(value: &Option<String>) -> Option<String> {
			value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
		}

		NewDish {
			name: self.dish_name.trim().to_owned(),
			description: non_blank(&self.description),
			ingredients: non_blank(&self.ingredients),
			price: self.price,
			nutritional_info: non_blank(&self.nutritional_info),
			allergens: non_blank(&self.allergens),
		}
	}
}

#[derive(Debug, serde::Deserialize)]
pub struct VoteRequest {
	pub vote: Vote,
}

#[derive(Debug, serde::Deserialize)]
pub struct NewReport {
	pub reported_by: i64,
	pub reason: String,
	pub additional_comments: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ReportUpdate {
	pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DishWithModels {
	#[serde(flatten)]
	pub dish: Dish,
	pub models: Vec<ArModel>,
}

/// Pairs every dish with its models. The relative order of `models` is kept,
/// so a rating ordered input stays rating ordered per dish.
pub fn group_models(dishes: Vec<Dish>, models: Vec<ArModel>) -> Vec<DishWithModels> {
	let mut by_dish = HashMap::<i64, Vec<ArModel>>::new();
	for model in models {
		by_dish.entry(model.dish_id).or_default().push(model);
	}

	dishes
		.into_iter()
		.map(|dish| DishWithModels {
			models: by_dish.remove(&dish.id).unwrap_or_default(),
			dish,
		})
		.collect()
}

fn require_text(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err((StatusCode::BAD_REQUEST, format!("{field} is required")).into());
	}

	Ok(())
}

async fn ensure_restaurant(db: &sqlx::PgPool, id: &str) -> Result<Restaurant> {
	Restaurant::by_id(db, id)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "restaurant not found"))
}

async fn ensure_dish(db: &sqlx::PgPool, id: i64) -> Result<Dish> {
	Dish::by_id(db, id)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "dish not found"))
}

async fn ensure_model(db: &sqlx::PgPool, id: &str) -> Result<ArModel> {
	ArModel::by_id(db, id)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "model not found"))
}

async fn create_restaurant<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let restaurant: NewRestaurant = json_body(&mut req).await?;
	require_text("restaurant_id", &restaurant.restaurant_id)?;
	require_text("name", &restaurant.name)?;

	let restaurant = Restaurant::create(global.db(), &restaurant.restaurant_id, &restaurant.name)
		.await
		.map_err(database_error)?;

	json_response(StatusCode::OK, &restaurant)
}

async fn get_restaurant<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;

	json_response(StatusCode::OK, &ensure_restaurant(global.db(), &id).await?)
}

async fn restaurant_dishes<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;
	ensure_restaurant(global.db(), &id).await?;

	let dishes = Dish::by_restaurant(global.db(), &id).await.map_err(database_error)?;

	json_response(StatusCode::OK, &dishes)
}

async fn restaurant_models<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;
	ensure_restaurant(global.db(), &id).await?;

	let dishes = Dish::by_restaurant(global.db(), &id).await.map_err(database_error)?;
	let models = ArModel::by_restaurant(global.db(), &id).await.map_err(database_error)?;

	json_response(StatusCode::OK, &group_models(dishes, models))
}

async fn create_dish<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let restaurant_id: String = param(&req, "id")?;
	let dish: NewDish = json_body(&mut req).await?;
	require_text("name", &dish.name)?;

	let dish = Dish::create(global.db(), &restaurant_id, &dish)
		.await
		.map_err(database_error)?;

	json_response(StatusCode::CREATED, &dish)
}

#[tracing::instrument(skip_all)]
async fn create_dish_with_model<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let request: NewDishWithModel = json_body(&mut req).await?;
	require_text("restaurant_id", &request.restaurant_id)?;
	require_text("dish_name", &request.dish_name)?;
	require_text("model_id", &request.model_id)?;
	ensure_restaurant(global.db(), &request.restaurant_id).await?;

	let (dish, model) = Dish::create_with_model(
		global.db(),
		&request.restaurant_id,
		&request.dish(),
		&request.model_id,
		request.uploaded_by,
		chrono::Utc::now(),
	)
	.await
	.map_err(database_error)?;
	tracing::debug!(dish_id = dish.id, model_id = %model.id, "dish added with model");

	json_response(
		StatusCode::CREATED,
		&DishWithModels {
			dish,
			models: vec![model],
		},
	)
}

async fn get_dish<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;

	json_response(StatusCode::OK, &ensure_dish(global.db(), id).await?)
}

async fn update_dish<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;
	let update: DishUpdate = json_body(&mut req).await?;
	if let Some(name) = &update.name {
		require_text("name", name)?;
	}

	let dish = Dish::update(global.db(), id, &update)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "dish not found"))?;

	json_response(StatusCode::OK, &dish)
}

async fn delete_dish<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;

	if !Dish::delete(global.db(), id).await.map_err(database_error)? {
		return Err((StatusCode::NOT_FOUND, "dish not found").into());
	}

	json_response(StatusCode::OK, &json!({ "success": true }))
}

#[tracing::instrument(skip_all)]
async fn add_model<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let dish_id: i64 = param(&req, "id")?;
	let model: NewModel = json_body(&mut req).await?;
	require_text("model_id", &model.model_id)?;

	let model = ArModel::create(global.db(), &model.model_id, dish_id, model.uploaded_by, chrono::Utc::now())
		.await
		.map_err(database_error)?;
	tracing::debug!(model_id = %model.id, dish_id, "model added");

	json_response(StatusCode::CREATED, &model)
}

async fn dish_models<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;
	ensure_dish(global.db(), id).await?;

	let models = ArModel::by_dish(global.db(), id).await.map_err(database_error)?;

	json_response(StatusCode::OK, &models)
}

async fn get_model<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;

	json_response(StatusCode::OK, &ensure_model(global.db(), &id).await?)
}

async fn delete_model<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;

	if !ArModel::delete(global.db(), &id).await.map_err(database_error)? {
		return Err((StatusCode::NOT_FOUND, "model not found").into());
	}

	json_response(StatusCode::OK, &json!({ "success": true }))
}

#[tracing::instrument(skip_all)]
async fn vote<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;
	let VoteRequest { vote } = json_body(&mut req).await?;

	let model = ArModel::vote(global.db(), &id, vote, chrono::Utc::now())
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "model not found"))?;
	tracing::debug!(model_id = %model.id, ?vote, rating = model.rating, "vote counted");

	json_response(StatusCode::OK, &model)
}

async fn report_model<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;
	let report: NewReport = json_body(&mut req).await?;
	require_text("reason", &report.reason)?;

	let report = ModelReport::create(
		global.db(),
		&id,
		report.reported_by,
		&report.reason,
		report.additional_comments.as_deref(),
	)
	.await
	.map_err(database_error)?;

	json_response(StatusCode::CREATED, &report)
}

async fn model_reports<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: String = param(&req, "id")?;
	ensure_model(global.db(), &id).await?;

	let reports = ModelReport::by_model(global.db(), &id).await.map_err(database_error)?;

	json_response(StatusCode::OK, &reports)
}

async fn update_report<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let id: i64 = param(&req, "id")?;
	let ReportUpdate { status } = json_body(&mut req).await?;

	let report = ModelReport::set_status(global.db(), id, status)
		.await
		.map_err(database_error)?
		.map_err_route((StatusCode::NOT_FOUND, "report not found"))?;

	json_response(StatusCode::OK, &report)
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.post("/restaurant", create_restaurant::<G>)
		.get("/restaurant/:id", get_restaurant::<G>)
		.get("/restaurant/:id/dishes", restaurant_dishes::<G>)
		.get("/restaurant/:id/models", restaurant_models::<G>)
		.post("/restaurant/:id/dish", create_dish::<G>)
		.post("/dish_with_model", create_dish_with_model::<G>)
		.get("/dish/:id", get_dish::<G>)
		.put("/dish/:id", update_dish::<G>)
		.delete("/dish/:id", delete_dish::<G>)
		.post("/dish/:id/add_model", add_model::<G>)
		.get("/dish/:id/models", dish_models::<G>)
		.get("/model/:id", get_model::<G>)
		.delete("/model/:id", delete_model::<G>)
		.post("/model/:id/vote", vote::<G>)
		.post("/model/:id/report", report_model::<G>)
		.get("/model/:id/reports", model_reports::<G>)
		.put("/report/:id", update_report::<G>)
		.build()
}
