//! Config handling

use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;
use crate::error::BotError;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info)
            .with_module_level("tungstenite", LevelFilter::Info)
            .with_module_level("serenity::gateway", LevelFilter::Warn);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Settings shared by the two generation API calls and the image download.
#[derive(Clone)]
pub struct OpenAiSettings {
    /// Bearer token for the API
    pub api_key: String,
    /// Origin the endpoint paths are joined onto
    pub base_url: Url,
    /// Completion model
    pub text_model: String,
    /// Image model
    pub image_model: String,
    /// Image resolution, eg `1024x1024`
    pub image_size: String,
    /// Completion `max_tokens`
    pub max_tokens: u32,
    /// Completion `temperature`
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// How the relay behaves in the cases the trigger format leaves open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayPolicy {
    /// Count used for unrecognised roll labels; `None` drops the event.
    pub unknown_roll_count: Option<usize>,
    /// Post the prompt text even when the upload failed.
    pub prompt_after_upload_failure: bool,
    /// Tell the channel when a generation API fails.
    pub notify_upstream_errors: bool,
}

impl Default for RelayPolicy {
    fn default() -> Self {
        Self {
            unknown_roll_count: None,
            prompt_after_upload_failure: true,
            notify_upstream_errors: true,
        }
    }
}

/// Everything the running bot needs, built once at startup.
#[derive(Clone)]
pub struct BotConfig {
    /// Discord bot token
    pub discord_token: String,
    /// Generation API settings
    pub openai: OpenAiSettings,
    /// Relay behaviour
    pub policy: RelayPolicy,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &"<redacted>")
            .field("openai", &self.openai)
            .field("policy", &self.policy)
            .finish()
    }
}

impl BotConfig {
    /// Validates the CLI options and builds the config.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, BotError> {
        let discord_token = cli.discord_bot_token.trim();
        if discord_token.is_empty() {
            return Err(BotError::Config(
                "DISCORD_BOT_TOKEN must not be empty".to_string(),
            ));
        }
        let api_key = cli.openai_api_key.trim();
        if api_key.is_empty() {
            return Err(BotError::Config("OPENAI_API_KEY must not be empty".to_string()));
        }

        let base_url = Url::parse(&cli.openai_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BotError::Config(format!(
                "OPENAI_BASE_URL is not a usable base URL: {base_url}"
            )));
        }

        Ok(Self {
            discord_token: discord_token.to_string(),
            openai: OpenAiSettings {
                api_key: api_key.to_string(),
                base_url,
                text_model: cli.text_model.clone(),
                image_model: cli.image_model.clone(),
                image_size: cli.image_size.clone(),
                max_tokens: cli.max_tokens,
                temperature: cli.temperature,
                timeout: Duration::from_secs(cli.http_timeout_secs),
            },
            policy: RelayPolicy {
                unknown_roll_count: cli.unknown_roll_count.map(usize::from),
                prompt_after_upload_failure: !cli.skip_prompt_on_upload_failure,
                notify_upstream_errors: !cli.quiet_upstream_errors,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliOptions {
        let mut full = vec!["dreamroll"];
        full.extend_from_slice(args);
        CliOptions::try_parse_from(full).expect("parse cli")
    }

    #[test]
    fn empty_token_is_rejected() {
        let options = cli(&["--discord-bot-token", " ", "--openai-api-key", "key"]);
        let err = BotConfig::from_cli(&options).expect_err("empty token");
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let options = cli(&["--discord-bot-token", "token", "--openai-api-key", ""]);
        assert!(matches!(
            BotConfig::from_cli(&options),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn flags_map_onto_policy() {
        let options = cli(&[
            "--discord-bot-token",
            "token",
            "--openai-api-key",
            "key",
            "--unknown-roll-count",
            "1",
            "--skip-prompt-on-upload-failure",
            "--quiet-upstream-errors",
        ]);
        let config = BotConfig::from_cli(&options).expect("config");
        assert_eq!(
            config.policy,
            RelayPolicy {
                unknown_roll_count: Some(1),
                prompt_after_upload_failure: false,
                notify_upstream_errors: false,
            }
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let options = cli(&[
            "--discord-bot-token",
            "very-secret-token",
            "--openai-api-key",
            "sk-very-secret",
        ]);
        let config = BotConfig::from_cli(&options).expect("config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret-token"));
        assert!(!rendered.contains("sk-very-secret"));
        assert_eq!(config.openai.base_url.as_str(), "https://api.openai.com/");
    }
}
