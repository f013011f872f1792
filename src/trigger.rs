//! Inbound message model and the trigger filter

use serenity::model::channel::Message;

use crate::constants::{TRIGGER_AUTHOR, TRIGGER_EMBED_TITLE, TRIGGER_INTERACTION};

/// The parts of an embed the filter looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerEmbed {
    /// Embed title, if any
    pub title: Option<String>,
    /// Names of the embed's fields, in order
    pub field_names: Vec<String>,
}

/// A chat message reduced to what the trigger filter needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Author's user id
    pub author_id: u64,
    /// Author's username
    pub author_name: String,
    /// Slash command name, when the message answers an interaction
    pub interaction_name: Option<String>,
    /// Embeds on the message
    pub embeds: Vec<TriggerEmbed>,
}

/// Why a message did not start a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// We sent it ourselves
    SelfAuthored,
    /// Not a response to an interaction
    NoInteraction,
    /// Someone other than the dice bot posted it
    WrongAuthor,
    /// Response to a different command
    WrongInteraction,
    /// No embeds at all
    NoEmbeds,
    /// First embed had no fields
    NoFields,
    /// First embed's title wasn't the D roll title
    WrongTitle,
    /// The roll label isn't one we know and no fallback count is configured
    UnknownRollLabel,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::SelfAuthored => "self-authored message",
            Self::NoInteraction => "no interaction metadata",
            Self::WrongAuthor => "author is not the dice bot",
            Self::WrongInteraction => "interaction is not a roll",
            Self::NoEmbeds => "no embeds",
            Self::NoFields => "first embed has no fields",
            Self::WrongTitle => "first embed title mismatch",
            Self::UnknownRollLabel => "unknown roll label",
        };
        f.write_str(reason)
    }
}

impl TriggerEvent {
    /// Copies the relevant parts of a serenity message.
    #[allow(deprecated)]
    pub fn from_message(msg: &Message) -> Self {
        Self {
            author_id: msg.author.id.get(),
            author_name: msg.author.name.clone(),
            interaction_name: msg
                .interaction
                .as_ref()
                .map(|interaction| interaction.name.clone()),
            embeds: msg
                .embeds
                .iter()
                .map(|embed| TriggerEmbed {
                    title: embed.title.clone(),
                    field_names: embed.fields.iter().map(|field| field.name.clone()).collect(),
                })
                .collect(),
        }
    }

    /// Returns the roll label (first field name of the first embed) when
    /// this message is a D roll from the dice bot.
    pub fn roll_label(&self, own_id: u64) -> Result<&str, Rejection> {
        if self.author_id == own_id {
            return Err(Rejection::SelfAuthored);
        }
        let Some(interaction) = self.interaction_name.as_deref() else {
            return Err(Rejection::NoInteraction);
        };
        if self.author_name != TRIGGER_AUTHOR {
            return Err(Rejection::WrongAuthor);
        }
        if interaction != TRIGGER_INTERACTION {
            return Err(Rejection::WrongInteraction);
        }
        let embed = self.embeds.first().ok_or(Rejection::NoEmbeds)?;
        let label = embed.field_names.first().ok_or(Rejection::NoFields)?;
        if embed.title.as_deref() != Some(TRIGGER_EMBED_TITLE) {
            return Err(Rejection::WrongTitle);
        }
        Ok(label)
    }
}

#[cfg(test)]
pub(crate) fn sample_event(label: &str) -> TriggerEvent {
    TriggerEvent {
        author_id: 42,
        author_name: TRIGGER_AUTHOR.to_string(),
        interaction_name: Some(TRIGGER_INTERACTION.to_string()),
        embeds: vec![TriggerEmbed {
            title: Some(TRIGGER_EMBED_TITLE.to_string()),
            field_names: vec![label.to_string(), "Total".to_string()],
        }],
    }
}
