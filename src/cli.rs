//! CLI parser
use clap::Parser;

use crate::constants::DEFAULT_OPENAI_BASE_URL;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "DREAMROLL_DEBUG")]
    /// Enable debug logging. Env: DREAMROLL_DEBUG
    pub debug: bool,

    #[clap(long, required = true, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    /// Discord bot token. Env: DISCORD_BOT_TOKEN
    pub discord_bot_token: String,

    #[clap(long, required = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    /// OpenAI API key. Env: OPENAI_API_KEY
    pub openai_api_key: String,

    #[clap(long, default_value = DEFAULT_OPENAI_BASE_URL, env = "OPENAI_BASE_URL")]
    /// Origin the generation endpoints live under.
    /// Env: OPENAI_BASE_URL
    pub openai_base_url: String,

    #[clap(long, default_value = "gpt-4", env = "DREAMROLL_TEXT_MODEL")]
    /// Model used to come up with the words
    pub text_model: String,

    #[clap(long, default_value = "dall-e-3", env = "DREAMROLL_IMAGE_MODEL")]
    /// Model used to draw the image
    pub image_model: String,

    #[clap(long, default_value = "1024x1024", env = "DREAMROLL_IMAGE_SIZE")]
    /// Requested image resolution
    pub image_size: String,

    #[clap(long, default_value_t = 60)]
    /// max_tokens for the completion request
    pub max_tokens: u32,

    #[clap(long, default_value_t = 0.7)]
    /// temperature for the completion request
    pub temperature: f32,

    #[clap(long, default_value_t = 120, env = "DREAMROLL_HTTP_TIMEOUT_SECS")]
    /// Timeout for each outbound HTTP request, in seconds.
    /// Env: DREAMROLL_HTTP_TIMEOUT_SECS
    pub http_timeout_secs: u64,

    #[clap(
        long,
        env = "DREAMROLL_UNKNOWN_ROLL_COUNT",
        value_parser = clap::value_parser!(u8).range(1..=4)
    )]
    /// Word count to use when the roll label isn't recognised. Unset means such rolls are ignored.
    /// Env: DREAMROLL_UNKNOWN_ROLL_COUNT
    pub unknown_roll_count: Option<u8>,

    #[clap(long, env = "DREAMROLL_SKIP_PROMPT_ON_UPLOAD_FAILURE")]
    /// Only post the prompt text when the image upload succeeded.
    /// Env: DREAMROLL_SKIP_PROMPT_ON_UPLOAD_FAILURE
    pub skip_prompt_on_upload_failure: bool,

    #[clap(long, env = "DREAMROLL_QUIET_UPSTREAM_ERRORS")]
    /// Don't tell the channel when a generation API fails, just log it.
    /// Env: DREAMROLL_QUIET_UPSTREAM_ERRORS
    pub quiet_upstream_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_bot() {
        let cli = CliOptions::try_parse_from([
            "dreamroll",
            "--discord-bot-token",
            "token",
            "--openai-api-key",
            "key",
        ])
        .expect("parse");
        assert_eq!(cli.text_model, "gpt-4");
        assert_eq!(cli.image_model, "dall-e-3");
        assert_eq!(cli.image_size, "1024x1024");
        assert_eq!(cli.max_tokens, 60);
        assert_eq!(cli.unknown_roll_count, None);
        assert!(!cli.skip_prompt_on_upload_failure);
        assert!(!cli.quiet_upstream_errors);
    }

    #[test]
    fn unknown_roll_count_is_bounded() {
        let result = CliOptions::try_parse_from([
            "dreamroll",
            "--discord-bot-token",
            "token",
            "--openai-api-key",
            "key",
            "--unknown-roll-count",
            "5",
        ]);
        assert!(result.is_err());
    }
}
