//! Image generation request/response.

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::OpenAiSettings;
use crate::error::BotError;

/// Request body for POST /v1/images/generations
#[derive(Serialize, Debug)]
pub struct ImageGenerationRequest<'a> {
    /// Model name
    pub model: &'a str,
    /// Full instruction including the composed prompt
    pub prompt: String,
    /// Number of images
    pub n: u8,
    /// Resolution, eg `1024x1024`
    pub size: &'a str,
}

/// Response body for POST /v1/images/generations
#[derive(Deserialize, Debug)]
pub struct ImageGenerationResponse {
    /// Unix timestamp
    #[serde(default)]
    pub created: i64,
    /// Generated images
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// One generated image.
#[derive(Deserialize, Debug)]
pub struct ImageData {
    /// Hosted image URL
    pub url: Option<String>,
    /// Inline base64 image, returned instead of `url` for some models
    pub b64_json: Option<String>,
    /// The prompt after the model rewrote it
    pub revised_prompt: Option<String>,
}

/// Where to get the image bytes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratedImage {
    /// Needs downloading
    Url(String),
    /// Already decoded
    Inline(Vec<u8>),
}

impl ImageGenerationResponse {
    /// Picks the first image.
    pub fn into_image(self) -> Result<GeneratedImage, BotError> {
        let first = self
            .data
            .into_iter()
            .next()
            .ok_or(BotError::EmptyImageData)?;

        if let Some(revised_prompt) = first.revised_prompt {
            info!("Revised prompt from OpenAI: {revised_prompt}");
        }

        if let Some(url) = first.url {
            info!("Generated Image URL: {url}");
            Ok(GeneratedImage::Url(url))
        } else if let Some(b64_json) = first.b64_json {
            Ok(GeneratedImage::Inline(general_purpose::STANDARD.decode(b64_json)?))
        } else {
            Err(BotError::MissingImageSource)
        }
    }
}

/// Wraps the composed prompt in the image instruction.
pub fn image_instruction(prompt: &str) -> String {
    format!("Make a single image that combines the following dungeons and dragons related things: {prompt}")
}

/// Builds the image request for a composed prompt.
pub fn build_image_request<'a>(
    settings: &'a OpenAiSettings,
    prompt: &str,
) -> ImageGenerationRequest<'a> {
    ImageGenerationRequest {
        model: &settings.image_model,
        prompt: image_instruction(prompt),
        n: 1,
        size: &settings.image_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn request_wraps_prompt_in_template() {
        let settings = OpenAiSettings {
            api_key: "key".to_string(),
            base_url: url::Url::parse("https://api.openai.com/").expect("url"),
            text_model: "gpt-4".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            max_tokens: 60,
            temperature: 0.7,
            timeout: Duration::from_secs(5),
        };
        let value =
            serde_json::to_value(build_image_request(&settings, "Dragon and Dice")).expect("json");
        assert_eq!(
            value,
            json!({
                "model": "dall-e-3",
                "prompt": "Make a single image that combines the following dungeons and dragons related things: Dragon and Dice",
                "n": 1,
                "size": "1024x1024"
            })
        );
    }

    #[test]
    fn first_url_is_used() {
        let response: ImageGenerationResponse = serde_json::from_value(json!({
            "created": 1700000000,
            "data": [
                {"url": "https://images.example/1.png", "revised_prompt": "a dragon rolling dice"},
                {"url": "https://images.example/2.png"}
            ]
        }))
        .expect("parse");
        assert_eq!(
            response.into_image().expect("image"),
            GeneratedImage::Url("https://images.example/1.png".to_string())
        );
    }

    #[test]
    fn inline_data_is_decoded() {
        let response: ImageGenerationResponse =
            serde_json::from_value(json!({"data": [{"b64_json": "iVBORw0K"}]})).expect("parse");
        assert_eq!(
            response.into_image().expect("image"),
            GeneratedImage::Inline(vec![0x89, b'P', b'N', b'G', b'\r', b'\n'])
        );
    }

    #[test]
    fn empty_or_sourceless_data_is_an_error() {
        let response: ImageGenerationResponse =
            serde_json::from_value(json!({"created": 1, "data": []})).expect("parse");
        assert!(matches!(response.into_image(), Err(BotError::EmptyImageData)));

        let response: ImageGenerationResponse =
            serde_json::from_value(json!({"data": [{"revised_prompt": "x"}]})).expect("parse");
        assert!(matches!(response.into_image(), Err(BotError::MissingImageSource)));
    }
}
