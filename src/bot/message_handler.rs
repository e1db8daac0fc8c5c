//! Message Handler module for routing incoming Telegram messages to the controller

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Me, UserId};
use tracing::{debug, error};

use crate::controller::{ConversationController, OutboundMessage, INITIATE_COMMAND};

use super::ui_builder::{create_choice_keyboard, split_message, TELEGRAM_MESSAGE_LIMIT};

/// What an incoming text asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundEvent<'a> {
    Start,
    Help,
    /// The initiating command with its raw argument text
    Initiate(&'a str),
    /// Anything else, including unknown commands
    Reply(&'a str),
    /// A command addressed to some other bot in a group chat
    ForOtherBot,
}

/// Classify a text message.
///
/// Commands may carry an `@botname` suffix. A suffix naming anyone other than
/// `own_username` (compared case-insensitively, as Telegram does) marks the
/// message as not ours.
pub fn classify_text<'a>(text: &'a str, own_username: Option<&str>) -> InboundEvent<'a> {
    let Some(command_line) = text.strip_prefix('/') else {
        return InboundEvent::Reply(text);
    };

    let (token, argument) = match command_line.split_once(char::is_whitespace) {
        Some((token, argument)) => (token, argument),
        None => (command_line, ""),
    };
    let command = match (token.split_once('@'), own_username) {
        (Some((_, addressee)), Some(own)) if !addressee.eq_ignore_ascii_case(own) => {
            return InboundEvent::ForOtherBot;
        }
        (Some((command, _)), _) => command,
        (None, _) => token,
    };

    match command {
        "start" => InboundEvent::Start,
        "help" => InboundEvent::Help,
        c if c == INITIATE_COMMAND => InboundEvent::Initiate(argument),
        _ => InboundEvent::Reply(text),
    }
}

/// Render an outbound message; only the last chunk carries the keyboard
pub async fn send_outbound(bot: &Bot, chat_id: ChatId, outbound: OutboundMessage) -> Result<()> {
    let chunks = split_message(&outbound.text, TELEGRAM_MESSAGE_LIMIT);
    let last = chunks.len().saturating_sub(1);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let request = bot.send_message(chat_id, chunk);
        let sent = match (&outbound.choices, i == last) {
            (Some(choices), true) => request.reply_markup(create_choice_keyboard(choices)).await,
            _ => request.await,
        };

        if let Err(e) = sent {
            error!(chat_id = %chat_id, error = %e, "Failed to send message");
            return Err(e.into());
        }
    }

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    own_username: Option<&str>,
    controller: &ConversationController,
) -> Result<()> {
    // Private chats share the user's id; fall back to it for anonymous senders
    let user_id = msg
        .from
        .as_ref()
        .map(|user| user.id)
        .unwrap_or(UserId(msg.chat.id.0.unsigned_abs()));

    let event = classify_text(text, own_username);
    debug!(user_id = %user_id, event = ?event, "Received text message from user");

    let outbound = match event {
        InboundEvent::ForOtherBot => return Ok(()),
        InboundEvent::Start => controller.welcome_message(),
        InboundEvent::Help => controller.help_message(),
        InboundEvent::Initiate(argument) => controller.on_initiate_command(user_id, argument).await,
        InboundEvent::Reply(text) => controller.on_reply(user_id, text).await,
    };

    send_outbound(bot, msg.chat.id, outbound).await
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    controller: Arc<ConversationController>,
) -> Result<()> {
    match msg.text() {
        Some(text) => {
            let own_username = me.user.username.as_deref();
            handle_text_message(&bot, &msg, text, own_username, &controller).await
        }
        None => {
            debug!(chat_id = %msg.chat.id, "Received non-text message");
            send_outbound(&bot, msg.chat.id, controller.text_only_message()).await
        }
    }
}
