//! Local stand-in for the OpenAI endpoints.
#![allow(dead_code)]

use std::fs::File;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use dreamroll::config::OpenAiSettings;
use dreamroll::error::BotError;
use dreamroll::relay::ChannelSink;
use url::Url;

pub const API_KEY: &str = "test-key";

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_mock(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock");
    });
    Url::parse(&format!("http://{addr}/")).expect("mock url")
}

pub fn settings(base_url: Url) -> OpenAiSettings {
    OpenAiSettings {
        api_key: API_KEY.to_string(),
        base_url,
        text_model: "gpt-4".to_string(),
        image_model: "dall-e-3".to_string(),
        image_size: "1024x1024".to_string(),
        max_tokens: 60,
        temperature: 0.7,
        timeout: Duration::from_secs(10),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    File(String, Vec<u8>),
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub sent: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("lock").clone()
    }
}

impl ChannelSink for RecordingSink {
    async fn say(&self, text: &str) -> Result<(), BotError> {
        self.sent
            .lock()
            .expect("lock")
            .push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn upload(&self, filename: &str, mut file: File) -> Result<(), BotError> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        self.sent
            .lock()
            .expect("lock")
            .push(Sent::File(filename.to_string(), bytes));
        Ok(())
    }
}
