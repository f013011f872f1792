//! Error handling

use reqwest::StatusCode;

/// Errors raised while configuring the bot or handling a roll.
#[derive(Debug)]
pub enum BotError {
    /// Startup configuration is missing or invalid
    Config(String),
    /// Transport failure fetching the generated image
    Http(reqwest::Error),
    /// Transport failure (refused, timed out, body cut short) on a generation endpoint
    UpstreamHttp {
        /// Path of the endpoint that failed
        endpoint: &'static str,
        /// Client error
        source: reqwest::Error,
    },
    /// A generation endpoint answered with a non-success status
    UpstreamStatus {
        /// Path of the endpoint that failed
        endpoint: &'static str,
        /// Status it returned
        status: StatusCode,
        /// Raw response body
        body: String,
    },
    /// A generation endpoint returned JSON we could not parse
    Decode {
        /// Path of the endpoint that failed
        endpoint: &'static str,
        /// Parser error
        source: serde_json::Error,
    },
    /// The completion response had no choices
    EmptyChoices,
    /// The first choice's message content was missing or not a string
    ContentNotString,
    /// The image response had no entries
    EmptyImageData,
    /// The first image entry carried neither a URL nor inline data
    MissingImageSource,
    /// The completion produced no usable words
    EmptyPrompt,
    /// The image URL was not an http(s) URL
    InvalidImageUrl(String),
    /// Inline image data was not valid base64
    Base64(base64::DecodeError),
    /// Local IO failure, eg on the temporary buffer
    Io(std::io::Error),
    /// The chat platform rejected a request
    Discord(Box<serenity::Error>),
}

impl BotError {
    /// True when the failure came from one of the generation APIs.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. }
                | Self::UpstreamHttp { .. }
                | Self::Decode { .. }
                | Self::EmptyChoices
                | Self::ContentNotString
                | Self::EmptyImageData
                | Self::MissingImageSource
                | Self::EmptyPrompt
                | Self::Base64(_)
        )
    }
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "Configuration error: {message}"),
            Self::Http(err) => write!(f, "HTTP request failed: {err}"),
            Self::UpstreamHttp { endpoint, source } => {
                write!(f, "Request to {endpoint} failed: {source}")
            }
            Self::UpstreamStatus {
                endpoint,
                status,
                body,
            } => write!(f, "{endpoint} returned {status}: {body}"),
            Self::Decode { endpoint, source } => {
                write!(f, "Failed to parse {endpoint} response: {source}")
            }
            Self::EmptyChoices => write!(f, "Completion response contained no choices"),
            Self::ContentNotString => {
                write!(f, "Completion message content was missing or not a string")
            }
            Self::EmptyImageData => write!(f, "Image response contained no data"),
            Self::MissingImageSource => {
                write!(f, "Image response missing both url and b64_json fields")
            }
            Self::EmptyPrompt => write!(f, "Completion produced no words to build a prompt from"),
            Self::InvalidImageUrl(url) => write!(f, "Refusing to download image from {url}"),
            Self::Base64(err) => write!(f, "Failed to base64-decode image: {err}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Discord(err) => write!(f, "Discord error: {err}"),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::UpstreamHttp { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Base64(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Discord(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Http(err)
    }
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::Io(err)
    }
}

impl From<url::ParseError> for BotError {
    fn from(err: url::ParseError) -> Self {
        BotError::Config(err.to_string())
    }
}

impl From<base64::DecodeError> for BotError {
    fn from(err: base64::DecodeError) -> Self {
        BotError::Base64(err)
    }
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_classification() {
        assert!(BotError::EmptyChoices.is_upstream());
        assert!(BotError::ContentNotString.is_upstream());
        assert!(
            BotError::UpstreamStatus {
                endpoint: "v1/chat/completions",
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }
            .is_upstream()
        );
        assert!(!BotError::InvalidImageUrl("ftp://x".to_string()).is_upstream());
        assert!(!BotError::Config("missing".to_string()).is_upstream());
        assert!(!BotError::Io(std::io::Error::other("disk")).is_upstream());
    }

    #[test]
    fn status_error_mentions_endpoint() {
        let err = BotError::UpstreamStatus {
            endpoint: "v1/images/generations",
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("v1/images/generations"));
        assert!(text.contains("429"));
        assert!(text.contains("slow down"));
    }
}
