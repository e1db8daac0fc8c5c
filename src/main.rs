use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Me;
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recipe_roulette::bot;
use recipe_roulette::catalog::MealDbClient;
use recipe_roulette::config::{BotConfig, LogFormat};
use recipe_roulette::controller::ConversationController;
use recipe_roulette::localization::LocalizationManager;
use recipe_roulette::session::InMemSessionStore;
use recipe_roulette::translation::GoogleTranslator;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Recipe Roulette Telegram Bot");
    info!(
        catalog_url = %config.catalog_url,
        target_language = %config.target_language,
        bot_language = %config.bot_language,
        "Configuration loaded"
    );

    let localization = Arc::new(LocalizationManager::new()?);

    let sessions = Arc::new(InMemSessionStore::new());
    let controller = Arc::new(ConversationController::new(
        Arc::new(MealDbClient::new(config.catalog_url.clone())),
        Arc::new(GoogleTranslator::new(config.translate_url.clone())),
        sessions.clone(),
        Arc::clone(&localization),
        config.target_language.clone(),
        config.bot_language.clone(),
    ));

    let bot = Bot::new(config.bot_token.clone());

    if let Err(e) = bot
        .set_my_commands(bot::command_menu(&localization, &config.bot_language))
        .await
    {
        warn!(error = %e, "Failed to register command menu");
    }

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let controller = Arc::clone(&controller);
        move |bot: Bot, msg: Message, me: Me| {
            let controller = Arc::clone(&controller);
            async move { bot::message_handler(bot, msg, me, controller).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!(users = sessions.user_count().await, "Bot stopped");

    Ok(())
}
