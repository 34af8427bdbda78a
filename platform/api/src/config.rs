use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use common::config::{DatabaseConfig, LoggingConfig};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the MenuVision app
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	///  The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,

	/// Vision service used for menu OCR
	pub vision: VisionConfig,

	/// Credential validation service
	pub credentials: CredentialsConfig,

	/// Nearby restaurant lookup
	pub places: PlacesConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Largest accepted menu image, in bytes
	pub max_upload_size: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
			max_upload_size: 10 * 1024 * 1024,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct VisionConfig {
	/// OpenAI compatible chat completions endpoint
	pub url: String,

	/// Bearer token sent to the endpoint
	pub api_key: String,

	/// Model that reads the images, it must accept image input
	pub model: String,

	/// Upper bound on the completion length
	pub max_tokens: u32,

	/// Request timeout
	#[serde(with = "humantime_serde")]
	pub timeout: Duration,
}

impl Default for VisionConfig {
	fn default() -> Self {
		Self {
			url: "https://api.openai.com/v1/chat/completions".to_string(),
			api_key: String::new(),
			model: "gpt-4o".to_string(),
			max_tokens: 4096,
			timeout: Duration::from_secs(60),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
	/// Endpoint that checks a password against a stored hash
	pub url: String,

	/// Request timeout
	#[serde(with = "humantime_serde")]
	pub timeout: Duration,
}

impl Default for CredentialsConfig {
	fn default() -> Self {
		Self {
			url: "http://localhost:4100/verify".to_string(),
			timeout: Duration::from_secs(5),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
	/// Google Places `searchNearby` endpoint
	pub url: String,

	/// Google Maps API key
	pub api_key: String,

	/// Search radius in meters
	pub radius: f64,

	/// Maximum number of places returned
	pub max_results: u32,

	/// Request timeout
	#[serde(with = "humantime_serde")]
	pub timeout: Duration,
}

impl Default for PlacesConfig {
	fn default() -> Self {
		Self {
			url: "https://places.googleapis.com/v1/places:searchNearby".to_string(),
			api_key: String::new(),
			radius: 500.0,
			max_results: 20,
			timeout: Duration::from_secs(10),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config".to_string()),
			name: "menuvision-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
			vision: VisionConfig::default(),
			credentials: CredentialsConfig::default(),
			places: PlacesConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		let (mut config, config_file) = common::config::parse::<Self>(Self::default().config_file)?;

		config.config_file = config_file;

		Ok(config)
	}
}
