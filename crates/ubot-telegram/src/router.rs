use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, update_listeners};

use ubot_core::{config::Config, dispatch, messaging::port::MessagingPort};

use crate::error_handler::BackoffErrorHandler;
use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: dispatch::Dispatcher,
    pub messenger: Arc<dyn MessagingPort>,
}

/// Run long polling until Ctrl-C.
///
/// Polling and send failures are logged by [`BackoffErrorHandler`] and never stop
/// the loop. Only polling failures pause before the next attempt.
pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => tracing::info!("Bot started: @{}", me.username()),
        Err(e) => tracing::warn!("getMe failed, polling anyway: {e}"),
    }
    tracing::info!(
        "Blank input policy: {:?}, error backoff: {}s",
        cfg.blank_input_policy,
        cfg.error_backoff.as_secs()
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState {
        dispatcher: dispatch::Dispatcher::new(cfg.blank_input_policy),
        messenger,
    });

    let error_handler = BackoffErrorHandler::new(cfg.error_backoff);
    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));
    let listener = update_listeners::polling_default(bot.clone()).await;

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!(update_id = ?upd.id, "ignoring non-message update");
        })
        .error_handler(error_handler.clone())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(listener, error_handler)
        .await;

    Ok(())
}
