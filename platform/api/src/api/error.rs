use common::http::RouteError;
use hyper::StatusCode;
use menu_structure::MenuError;

use crate::credentials::CredentialError;
use crate::places::PlacesError;
use crate::vision::VisionError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to parse http body: {0}")]
	ParseHttpBody(#[from] hyper::Error),
	#[error("failed to parse json body: {0}")]
	ParseJson(#[from] serde_json::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("vision service error: {0}")]
	Vision(#[from] VisionError),
	#[error("credential service error: {0}")]
	Credential(#[from] CredentialError),
	#[error("places service error: {0}")]
	Places(#[from] PlacesError),
	#[error("invalid menu: {0}")]
	Menu(#[from] MenuError),
	#[error("invalid multipart body: {0}")]
	Multipart(#[from] multer::Error),
}

/// Unique violations become 409, dangling references 404, everything else 500.
#[track_caller]
pub fn database_error(err: sqlx::Error) -> RouteError<ApiError> {
	let (status, message) = match &err {
		sqlx::Error::Database(db) if db.is_unique_violation() => (StatusCode::CONFLICT, "already exists"),
		sqlx::Error::Database(db) if db.is_foreign_key_violation() => (StatusCode::NOT_FOUND, "referenced entity not found"),
		_ => (StatusCode::INTERNAL_SERVER_ERROR, "database error"),
	};

	RouteError::from((status, message, err))
}

#[track_caller]
pub fn menu_error(err: MenuError) -> RouteError<ApiError> {
	let details = serde_json::to_value(&err).unwrap_or_default();

	RouteError::with_details(StatusCode::BAD_REQUEST, "invalid menu", details).with_source(Some(err.into()))
}

#[track_caller]
pub fn vision_error(err: VisionError) -> RouteError<ApiError> {
	match err {
		VisionError::ContentBlocked(_) => RouteError::from((StatusCode::UNPROCESSABLE_ENTITY, "content_blocked", err)),
		err => RouteError::from((StatusCode::BAD_GATEWAY, "vision_failed", err)),
	}
}

#[track_caller]
pub fn credential_error(err: CredentialError) -> RouteError<ApiError> {
	RouteError::from((StatusCode::BAD_GATEWAY, "credential_service_failed", err))
}

#[track_caller]
pub fn places_error(err: PlacesError) -> RouteError<ApiError> {
	RouteError::from((StatusCode::BAD_GATEWAY, "places_failed", err))
}
