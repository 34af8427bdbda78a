use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use common::context::Context;
use common::{logging, signal};
use platform_api::config::{ApiConfig, AppConfig};
use platform_api::credentials::{CredentialVerifier, HttpCredentialVerifier};
use platform_api::places::{HttpPlacesClient, PlacesClient};
use platform_api::vision::{HttpVisionClient, VisionClient};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use tokio::signal::unix::SignalKind;
use tokio::{select, time};

struct GlobalState {
	ctx: Context,
	config: AppConfig,
	db: sqlx::PgPool,
	vision: HttpVisionClient,
	credentials: HttpCredentialVerifier,
	places: HttpPlacesClient,
}

impl common::global::GlobalCtx for GlobalState {
	#[inline(always)]
	fn ctx(&self) -> &Context {
		&self.ctx
	}
}

impl common::global::GlobalDb for GlobalState {
	#[inline(always)]
	fn db(&self) -> &sqlx::PgPool {
		&self.db
	}
}

impl common::global::GlobalConfig for GlobalState {}

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &ApiConfig {
		&self.config.api
	}
}

impl platform_api::global::ApiState for GlobalState {
	#[inline(always)]
	fn vision(&self) -> &dyn VisionClient {
		&self.vision
	}

	#[inline(always)]
	fn credentials(&self) -> &dyn CredentialVerifier {
		&self.credentials
	}

	#[inline(always)]
	fn places(&self) -> &dyn PlacesClient {
		&self.places
	}
}

impl GlobalState {
	async fn new(ctx: Context, config: AppConfig) -> Result<Self> {
		let db = PgPoolOptions::new()
			.max_connections(config.database.max_connections)
			.connect_with(PgConnectOptions::from_str(&config.database.uri)?.disable_statement_logging())
			.await
			.context("failed to connect to database")?;

		let vision = HttpVisionClient::with_config(config.vision.clone()).context("failed to build vision client")?;
		let credentials =
			HttpCredentialVerifier::with_config(config.credentials.clone()).context("failed to build credential client")?;
		let places = HttpPlacesClient::with_config(config.places.clone()).context("failed to build places client")?;

		Ok(Self {
			ctx,
			config,
			db,
			vision,
			credentials,
			places,
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let config = AppConfig::parse()?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::info!(name = %config.name, "starting");

	let (ctx, handler) = Context::new();

	let global = Arc::new(GlobalState::new(ctx, config).await?);

	let api_future = tokio::spawn(platform_api::api::run(global.clone()));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())
		.with_signal(SignalKind::terminate());

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
