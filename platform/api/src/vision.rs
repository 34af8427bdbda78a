use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use serde_json::json;

use crate::config::VisionConfig;

const TEXT_PROMPT: &str = "Extract all of the text visible in this menu image. \
Keep the original line breaks and section headers, write one menu item per line and \
separate each item name from its price with a dot leader (for example `Caesar Salad .... 9.50`). \
Return only the text.";

const MENU_PROMPT: &str = r#"Read this restaurant menu image and return a single JSON object with this shape:
{"restaurant": {"name": string|null, "address": string|null} | null,
 "menu": {"<category as printed>": [{"name": string,
   "sizes": [{"size": string|null, "price": number|null}],
   "description": string|null, "spiciness": string|null,
   "allergens": [string], "dietary_info": [string],
   "calories": string|null, "popularity": string|null, "availability": string|null,
   "addons": [{"name": string, "price": number|null}]}]}}
Prices must be plain numbers without currency symbols, calorie counts or other text. Use an empty list when an item has no sizes, allergens, dietary info or addons. Return only the JSON object."#;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("vision service returned {status}: {body}")]
	Status { status: u16, body: String },
	#[error("vision service refused the image: {0}")]
	ContentBlocked(String),
	#[error("vision service returned no content")]
	Empty,
}

/// Reads menu images.
#[async_trait]
pub trait VisionClient: Send + Sync {
	/// Returns the raw text found in the image.
	async fn extract_text(&self, image: Bytes, content_type: &str) -> Result<String, VisionError>;

	/// Returns the menu in the image as (hopefully) schema shaped JSON text.
	async fn extract_menu(&self, image: Bytes, content_type: &str) -> Result<String, VisionError>;
}

#[derive(Debug, serde::Deserialize)]
struct ChatResponse {
	#[serde(default)]
	choices: Vec<ChatChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoice {
	message: ChatMessage,
	finish_reason: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatMessage {
	content: Option<String>,
	refusal: Option<String>,
}

/// [`VisionClient`] backed by an OpenAI compatible chat completions API.
#[derive(Debug, Clone)]
pub struct HttpVisionClient {
	http_client: reqwest::Client,
	config: VisionConfig,
}

impl HttpVisionClient {
	pub fn with_config(config: VisionConfig) -> Result<Self, VisionError> {
		let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;
		Ok(Self { http_client, config })
	}

	#[tracing::instrument(skip(self, prompt, image), fields(model = %self.config.model, size = image.len()))]
	async fn complete(&self, prompt: &str, image: Bytes, content_type: &str, json_mode: bool) -> Result<String, VisionError> {
		let data_url = format!(
			"data:{};base64,{}",
			content_type,
			base64::engine::general_purpose::STANDARD.encode(&image)
		);

		let mut body = json!({
			"model": self.config.model,
			"max_tokens": self.config.max_tokens,
			"messages": [{
				"role": "user",
				"content": [
					{ "type": "text", "text": prompt },
					{ "type": "image_url", "image_url": { "url": data_url } },
				],
			}],
		});

		if json_mode {
			body["response_format"] = json!({ "type": "json_object" });
		}

		let res = self
			.http_client
			.post(self.config.url.as_str())
			.bearer_auth(&self.config.api_key)
			.json(&body)
			.send()
			.await?;

		let status = res.status();
		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();
			if body.contains("content_policy_violation") {
				return Err(VisionError::ContentBlocked(body));
			}

			return Err(VisionError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let response = res.json::<ChatResponse>().await?;
		let choice = response.choices.into_iter().next().ok_or(VisionError::Empty)?;

		if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
			return Err(VisionError::ContentBlocked(refusal));
		}

		if choice.finish_reason.as_deref() == Some("content_filter") {
			return Err(VisionError::ContentBlocked("content filter".to_string()));
		}

		match choice.message.content {
			Some(content) if !content.trim().is_empty() => Ok(content),
			_ => Err(VisionError::Empty),
		}
	}
}

#[async_trait]
impl VisionClient for HttpVisionClient {
	async fn extract_text(&self, image: Bytes, content_type: &str) -> Result<String, VisionError> {
		self.complete(TEXT_PROMPT, image, content_type, false).await
	}

	async fn extract_menu(&self, image: Bytes, content_type: &str) -> Result<String, VisionError> {
		self.complete(MENU_PROMPT, image, content_type, true).await
	}
}
