use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, MessageId, User},
};

use crate::{
    ConfigParameters,
    callbacks::Action,
    commands::Command,
    router::Event,
    ui::{self, Screen},
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let owner = owner_of(from);

    // Stickers, photos and the like count as an empty answer.
    let text = msg.text().unwrap_or_default();
    let event = match Command::from_text(text, &cfg.username) {
        Some(cmd) => Event::Command(cmd),
        None => Event::FreeText(text.to_string()),
    };

    let screen = cfg.router.dispatch(&owner, event).await;
    send_screen(&bot, msg.chat.id, screen).await
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, Some(&q.from)) {
        return Ok(());
    }

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();
    let owner = owner_of(&q.from);

    let data = q.data.as_deref().unwrap_or_default();
    let screen = match data.parse::<Action>() {
        Ok(action) => cfg.router.dispatch(&owner, Event::Button(action)).await,
        Err(err) => {
            tracing::warn!(owner = %owner, "rejected callback token: {err}");
            ui::unknown_action()
        }
    };

    edit_or_send(&bot, chat_id, message_id, screen).await
}

async fn send_screen(bot: &Bot, chat_id: ChatId, screen: Screen) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, screen.text.clone());
    match screen.keyboard() {
        Some(kb) => request.reply_markup(kb).await?,
        None => request.await?,
    };
    Ok(())
}

/// Replaces the pressed message with `screen`, or sends a new one when the
/// message can no longer be edited.
async fn edit_or_send(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    screen: Screen,
) -> ResponseResult<()> {
    let request = bot.edit_message_text(chat_id, message_id, screen.text.clone());
    let edited = match screen.keyboard() {
        Some(kb) => request.reply_markup(kb).await,
        None => request.await,
    };
    if let Err(err) = edited {
        tracing::debug!("falling back to a new message: {err}");
        send_screen(bot, chat_id, screen).await?;
    }
    Ok(())
}

fn owner_of(user: &User) -> String {
    user.id.0.to_string()
}

fn is_allowed(cfg: &ConfigParameters, from: Option<&User>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match &cfg.allowed_users {
        None => true,
        Some(ids) => ids.contains(&from.id),
    }
}
