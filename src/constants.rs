//! Shared constants for the trigger filter and the generation APIs
//!

use std::ops::RangeInclusive;

/// Display name of the dice-rolling bot whose messages we react to.
pub const TRIGGER_AUTHOR: &str = "Beyond 20";

/// Slash command name on the triggering message's interaction.
pub const TRIGGER_INTERACTION: &str = "roll";

/// Title of the first embed on a triggering message.
pub const TRIGGER_EMBED_TITLE: &str = "Ds";

/// Known roll labels and how many words each one asks for.
pub const ROLL_LABELS: [(&str, usize); 4] = [
    (":one: :red_circle:", 1),
    (":two:", 2),
    (":three:", 3),
    (":four: :green_circle:", 4),
];

/// Separator placed between words in the composed prompt.
pub const PROMPT_SEPARATOR: &str = " and ";

/// Range the completion seed is drawn from. The seed doubles as the word count in the request.
pub const SEED_RANGE: RangeInclusive<u32> = 4..=103;

/// Path of the chat completions endpoint, relative to the API base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

/// Path of the image generation endpoint, relative to the API base URL.
pub const IMAGE_GENERATIONS_PATH: &str = "v1/images/generations";

/// Default OpenAI API origin.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/";

/// Attachment name used when posting the image.
pub const IMAGE_FILENAME: &str = "image.png";

/// Messages posted to the channel when handling a roll fails.
pub mod notices {
    /// The generated image could not be fetched.
    pub const DOWNLOAD_FAILED: &str = "Failed to download the image.";
    /// The temporary buffer could not be created.
    pub const TEMPFILE_FAILED: &str = "Failed to create a temporary file.";
    /// The image bytes could not be written to the temporary buffer.
    pub const SAVE_FAILED: &str = "Failed to save the image.";
    /// The platform rejected the attachment.
    pub const UPLOAD_FAILED: &str = "Failed to upload the image.";
    /// Either generation API failed.
    pub const GENERATION_FAILED: &str = "Failed to generate the image.";
}
