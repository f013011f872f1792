//! OpenAI client used to come up with the words and draw the image.

pub mod chat;
pub mod images;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::config::OpenAiSettings;
use crate::constants::{CHAT_COMPLETIONS_PATH, IMAGE_GENERATIONS_PATH, SEED_RANGE};
use crate::error::BotError;
use crate::relay::Upstream;

use chat::{ChatCompletionResponse, build_chat_request};
use images::{GeneratedImage, ImageGenerationResponse, build_image_request};

/// Talks to the chat completion and image generation endpoints.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    /// Builds the shared HTTP client with the configured timeout.
    pub fn new(settings: OpenAiSettings) -> Result<Self, BotError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    async fn post_json<B, R>(&self, endpoint: &'static str, body: &B) -> Result<R, BotError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.settings.base_url.join(endpoint)?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| BotError::UpstreamHttp { endpoint, source })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| BotError::UpstreamHttp { endpoint, source })?;
        debug!("{endpoint} payload: {}", String::from_utf8_lossy(&bytes));
        if !status.is_success() {
            return Err(BotError::UpstreamStatus {
                endpoint,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| BotError::Decode { endpoint, source })
    }
}

impl Upstream for OpenAiClient {
    async fn compose_words(&self, count: usize) -> Result<String, BotError> {
        let seed = rand::random_range(SEED_RANGE);
        debug!("Requesting words for a {count} word roll with seed {seed}");
        let request = build_chat_request(&self.settings, seed);
        let response: ChatCompletionResponse =
            self.post_json(CHAT_COMPLETIONS_PATH, &request).await?;
        let text = response.into_text()?;
        info!("Response from OpenAI: {text:?}");
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, BotError> {
        let request = build_image_request(&self.settings, prompt);
        let response: ImageGenerationResponse =
            self.post_json(IMAGE_GENERATIONS_PATH, &request).await?;
        response.into_image()
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, BotError> {
        let parsed =
            Url::parse(url).map_err(|_| BotError::InvalidImageUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BotError::InvalidImageUrl(url.to_string()));
        }
        let bytes = self
            .http
            .get(parsed)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!("Downloaded {} image bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
