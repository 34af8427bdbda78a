use async_trait::async_trait;
use serde_json::json;

use crate::config::PlacesConfig;

const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,places.rating";

#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("places service returned {status}: {body}")]
	Status { status: u16, body: String },
}

/// Looks up restaurants around a point.
#[async_trait]
pub trait PlacesClient: Send + Sync {
	async fn nearby(&self, longitude: f64, latitude: f64) -> Result<serde_json::Value, PlacesError>;
}

#[derive(Debug, Clone)]
pub struct HttpPlacesClient {
	http_client: reqwest::Client,
	config: PlacesConfig,
}

impl HttpPlacesClient {
	pub fn with_config(config: PlacesConfig) -> Result<Self, PlacesError> {
		let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;
		Ok(Self { http_client, config })
	}
}

#[async_trait]
impl PlacesClient for HttpPlacesClient {
	async fn nearby(&self, longitude: f64, latitude: f64) -> Result<serde_json::Value, PlacesError> {
		let body = json!({
			"includedTypes": ["restaurant"],
			"maxResultCount": self.config.max_results,
			"locationRestriction": {
				"circle": {
					"center": { "latitude": latitude, "longitude": longitude },
					"radius": self.config.radius,
				},
			},
		});

		let res = self
			.http_client
			.post(self.config.url.as_str())
			.header("X-Goog-Api-Key", &self.config.api_key)
			.header("X-Goog-FieldMask", FIELD_MASK)
			.json(&body)
			.send()
			.await?;

		let status = res.status();
		if !status.is_success() {
			return Err(PlacesError::Status {
				status: status.as_u16(),
				body: res.text().await.unwrap_or_default(),
			});
		}

		Ok(res.json().await?)
	}
}
