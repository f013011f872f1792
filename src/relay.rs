//! Turns a matched roll into a posted image.
//!
//! For each accepted [`TriggerEvent`] the relay asks the text model for words,
//! composes them into a prompt, has the image model draw it, downloads the
//! result into a temporary file and uploads it to the originating channel,
//! followed by the prompt text. Any failure ends only the current event.

use std::fs::File;
use std::future::Future;
use std::io::{Seek, SeekFrom, Write};

use tracing::{debug, error, info, warn};

use crate::config::RelayPolicy;
use crate::constants::{IMAGE_FILENAME, notices};
use crate::error::BotError;
use crate::openai::images::GeneratedImage;
use crate::roll::{RollLookup, compose_prompt};
use crate::trigger::{Rejection, TriggerEvent};

/// The generation side of a roll: words, image, and fetching the image.
pub trait Upstream: Send + Sync {
    /// Asks the text model for D words, one per line.
    fn compose_words(&self, count: usize)
    -> impl Future<Output = Result<String, BotError>> + Send;

    /// Asks the image model to draw the composed prompt.
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<GeneratedImage, BotError>> + Send;

    /// Fetches a generated image's bytes.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, BotError>> + Send;
}

/// The channel a roll came from.
pub trait ChannelSink: Send + Sync {
    /// Posts a plain text message.
    fn say(&self, text: &str) -> impl Future<Output = Result<(), BotError>> + Send;

    /// Posts `file`, positioned at its start, as an attachment named `filename`.
    fn upload(
        &self,
        filename: &str,
        file: File,
    ) -> impl Future<Output = Result<(), BotError>> + Send;
}

/// What happened to one message.
#[derive(Debug)]
pub enum Outcome {
    /// Not a roll we handle
    Ignored(Rejection),
    /// Image uploaded and prompt posted
    Posted {
        /// The composed prompt
        prompt: String,
    },
    /// Handling stopped part way through
    Failed(BotError),
}

/// Event filter and relay.
#[derive(Clone, Debug)]
pub struct Relay<U> {
    upstream: U,
    policy: RelayPolicy,
    scratch: fn() -> std::io::Result<File>,
}

impl<U: Upstream> Relay<U> {
    /// Creates a relay over the given generation backend.
    pub fn new(upstream: U, policy: RelayPolicy) -> Self {
        Self {
            upstream,
            policy,
            scratch: tempfile::tempfile,
        }
    }

    #[cfg(test)]
    fn with_scratch(mut self, scratch: fn() -> std::io::Result<File>) -> Self {
        self.scratch = scratch;
        self
    }

    /// Handles one inbound message. `own_id` is the bot's user id.
    pub async fn handle<S: ChannelSink>(
        &self,
        event: &TriggerEvent,
        own_id: u64,
        sink: &S,
    ) -> Outcome {
        let label = match event.roll_label(own_id) {
            Ok(label) => label,
            Err(rejection) => {
                debug!("Ignoring message: {rejection}");
                return Outcome::Ignored(rejection);
            }
        };
        debug!("Roll event: {event:?}");

        let count = match (RollLookup::from_label(label), self.policy.unknown_roll_count) {
            (RollLookup::Found(count), _) => count,
            (RollLookup::NotFound, Some(fallback)) => {
                warn!("Unknown roll label {label:?}, using {fallback} words");
                fallback
            }
            (RollLookup::NotFound, None) => {
                warn!("Ignoring roll with unknown label {label:?}");
                return Outcome::Ignored(Rejection::UnknownRollLabel);
            }
        };

        let prompt = match self.generate(count).await {
            Ok(prompt) => prompt,
            Err(err) => return self.upstream_failed(sink, err).await,
        };
        let image = match self.upstream.generate_image(&prompt).await {
            Ok(image) => image,
            Err(err) => return self.upstream_failed(sink, err).await,
        };

        let bytes = match image {
            GeneratedImage::Url(url) => match self.upstream.download(&url).await {
                Ok(bytes) => bytes,
                Err(err) => return notify_failed(sink, notices::DOWNLOAD_FAILED, err).await,
            },
            GeneratedImage::Inline(bytes) => bytes,
        };

        let file = match (self.scratch)() {
            Ok(file) => file,
            Err(err) => return notify_failed(sink, notices::TEMPFILE_FAILED, err.into()).await,
        };
        let file = match stage_image(file, &bytes) {
            Ok(file) => file,
            Err(err) => return notify_failed(sink, notices::SAVE_FAILED, err.into()).await,
        };

        let uploaded = sink.upload(IMAGE_FILENAME, file).await;
        if uploaded.is_ok() || self.policy.prompt_after_upload_failure {
            if let Err(err) = sink.say(&prompt).await {
                error!("Failed to send prompt message: {err}");
            }
        }
        if let Err(err) = uploaded {
            return notify_failed(sink, notices::UPLOAD_FAILED, err).await;
        }

        info!("Posted image for {prompt:?}");
        Outcome::Posted { prompt }
    }

    async fn generate(&self, count: usize) -> Result<String, BotError> {
        let words = self.upstream.compose_words(count).await?;
        let prompt = compose_prompt(&words, count);
        if prompt.is_empty() {
            return Err(BotError::EmptyPrompt);
        }
        debug!("Composed prompt: {prompt}");
        Ok(prompt)
    }

    async fn upstream_failed<S: ChannelSink>(&self, sink: &S, err: BotError) -> Outcome {
        if self.policy.notify_upstream_errors {
            notify_failed(sink, notices::GENERATION_FAILED, err).await
        } else {
            error!("Generation failed (upstream: {}): {err}", err.is_upstream());
            Outcome::Failed(err)
        }
    }
}

async fn notify_failed<S: ChannelSink>(sink: &S, notice: &str, err: BotError) -> Outcome {
    error!("{notice} {err}");
    if let Err(send_err) = sink.say(notice).await {
        error!("Failed to send error message: {send_err}");
    }
    Outcome::Failed(err)
}

/// Writes the image into the temporary file and rewinds it for upload.
fn stage_image(mut file: File, bytes: &[u8]) -> std::io::Result<File> {
    file.write_all(bytes)?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}
