//! Discord side of the bot

use std::sync::Arc;

use serenity::all::{
    ChannelId, Context, CreateAttachment, CreateMessage, EventHandler, GatewayIntents, Http,
    Message, Ready,
};
use serenity::{Client, async_trait};
use tracing::{debug, error, info};

use crate::config::BotConfig;
use crate::error::BotError;
use crate::openai::OpenAiClient;
use crate::relay::{ChannelSink, Relay};
use crate::trigger::TriggerEvent;

/// A channel messages can be posted to.
#[derive(Clone)]
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordChannel {
    /// Wraps a channel id with the HTTP client to post through.
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

impl ChannelSink for DiscordChannel {
    async fn say(&self, text: &str) -> Result<(), BotError> {
        self.channel_id.say(&*self.http, text).await?;
        Ok(())
    }

    async fn upload(&self, filename: &str, file: std::fs::File) -> Result<(), BotError> {
        let file = tokio::fs::File::from_std(file);
        let attachment = CreateAttachment::file(&file, filename).await?;
        self.channel_id
            .send_message(&*self.http, CreateMessage::new().add_file(attachment))
            .await?;
        Ok(())
    }
}

/// Gateway event handler. Serenity runs each event on its own task.
pub struct Handler {
    relay: Relay<OpenAiClient>,
}

impl Handler {
    /// Creates the handler.
    pub fn new(relay: Relay<OpenAiClient>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let own_id = ctx.cache.current_user().id.get();
        let event = TriggerEvent::from_message(&msg);
        let sink = DiscordChannel::new(ctx.http.clone(), msg.channel_id);
        let outcome = self.relay.handle(&event, own_id, &sink).await;
        debug!("Message {} in {}: {outcome:?}", msg.id, msg.channel_id);
    }
}

/// Connects to Discord and relays rolls until Ctrl-C.
pub async fn run_bot(config: BotConfig) -> Result<(), BotError> {
    let upstream = OpenAiClient::new(config.openai)?;
    let handler = Handler::new(Relay::new(upstream, config.policy));

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {err}");
            return;
        }
        info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    info!("Bot is now running. Press CTRL+C to exit.");
    client.start().await?;
    Ok(())
}
