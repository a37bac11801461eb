//! Telegram bot.
//!
//! Turns messages and button presses into router events and renders the
//! resulting screens. The bot keeps no state of its own besides the
//! per-owner conversation held by the router.

use chrono_tz::Tz;
use engine::Ledger;
use teloxide::{prelude::*, utils::command::BotCommands};

mod callbacks;
mod commands;
mod handlers;
mod router;
mod state;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    router: router::Router,
    username: String,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    router: router::Router,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        let username = match bot.get_me().await {
            Ok(me) => me.user.username.clone().unwrap_or_default(),
            Err(err) => {
                tracing::error!("failed to fetch the bot identity: {err}");
                return;
            }
        };
        if let Err(err) = bot.set_my_commands(commands::Command::bot_commands()).await {
            tracing::warn!("failed to publish the command list: {err}");
        }

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            router: self.router.clone(),
            username,
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    timezone: Option<Tz>,
    list_limit: Option<usize>,
    ledger: Option<Ledger>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Restricts the bot to these telegram user ids. An empty list serves
    /// everyone.
    pub fn allowed_users(mut self, allowed_users: Vec<u64>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users.into_iter().map(UserId).collect());
        }
        self
    }

    /// Zone used to stamp new records with the local wall-clock time.
    pub fn timezone(mut self, timezone: Tz) -> BotBuilder {
        self.timezone = Some(timezone);
        self
    }

    /// Maximum number of records shown on one list screen.
    pub fn list_limit(mut self, limit: usize) -> BotBuilder {
        self.list_limit = Some(limit);
        self
    }

    pub fn ledger(mut self, ledger: Ledger) -> BotBuilder {
        self.ledger = Some(ledger);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err("missing telegram token".to_string());
        }
        let Some(ledger) = self.ledger else {
            return Err("missing ledger".to_string());
        };

        let mut router = router::Router::new(ledger);
        if let Some(timezone) = self.timezone {
            router = router.timezone(timezone);
        }
        if let Some(limit) = self.list_limit {
            router = router.list_limit(limit);
        }

        Ok(Bot {
            token: self.token,
            allowed_users: self.allowed_users,
            router,
        })
    }
}
