use async_trait::async_trait;
use serde::de::Error as _;
use serde_json::json;

use crate::config::CredentialsConfig;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("credential service returned {0}")]
	Status(u16),
	#[error("json error: {0}")]
	SerdeJson(#[from] serde_json::Error),
}

/// Checks a plaintext password against a stored hash. The hash format is
/// opaque to this service.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
	async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError>;
}

#[derive(Debug, Clone)]
pub struct HttpCredentialVerifier {
	http_client: reqwest::Client,
	config: CredentialsConfig,
}

impl HttpCredentialVerifier {
	pub fn with_config(config: CredentialsConfig) -> Result<Self, CredentialError> {
		let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;
		Ok(Self { http_client, config })
	}
}

#[async_trait]
impl CredentialVerifier for HttpCredentialVerifier {
	async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError> {
		let body = json!({
			"password": plaintext,
			"hash": hash,
		});

		let res = self
			.http_client
			.post(self.config.url.as_str())
			.header("Content-Type", "application/json")
			.json(&body)
			.send()
			.await?;

		if !res.status().is_success() {
			return Err(CredentialError::Status(res.status().as_u16()));
		}

		let body = res.json::<serde_json::Value>().await?;

		Ok(body["valid"].as_bool().ok_or(serde_json::Error::missing_field("valid"))?)
	}
}
