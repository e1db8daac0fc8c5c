//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: turns incoming messages into controller events and sends the replies
//! - `ui_builder`: reply keyboards and message splitting

pub mod message_handler;
pub mod ui_builder;

use teloxide::types::BotCommand;

use crate::controller::INITIATE_COMMAND;
use crate::localization::LocalizationManager;

pub use message_handler::{classify_text, message_handler, send_outbound, InboundEvent};
pub use ui_builder::{create_choice_keyboard, split_message};

/// Commands shown in the Telegram command menu
pub fn command_menu(localization: &LocalizationManager, language: &str) -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", localization.get_message_in_language("command-start", language, None)),
        BotCommand::new("help", localization.get_message_in_language("command-help", language, None)),
        BotCommand::new(
            INITIATE_COMMAND,
            localization.get_message_in_language("command-search", language, None),
        ),
    ]
}
