use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::{Body, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::config::ApiConfig;
use crate::global::ApiGlobal;

pub mod error;
pub mod ext;
mod middleware;
pub mod v1;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.middleware(middleware::cors::cors_middleware(global))
		.scope("/v1", v1::routes(global)?)
		.options("/*", middleware::cors::preflight)
		.any(|_| async move {
			Ok(make_response!(
				StatusCode::NOT_FOUND,
				json!({
					"message": "not_found",
					"success": false,
				})
			))
		})
		.build()
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();
	tracing::info!("API listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router only holds a Weak reference to the global state, so an open
	// keep-alive connection does not keep it alive during shutdown.
	let router = routes(&global).map_err(|err| anyhow::anyhow!("failed to build router: {err}"))?;
	let request_service =
		RequestServiceBuilder::new(router).map_err(|err| anyhow::anyhow!("failed to build request service: {err}"))?;

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = request_service.build(addr);

				tracing::debug!("Accepted connection from {}", addr);

				tokio::spawn(async move {
					Http::new().serve_connection(socket, service).await.ok();
				});
			},
		}
	}
}
