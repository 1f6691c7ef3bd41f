use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler, prelude::*, utils::command::BotCommands,
};
use tracing::{error, info};

use crate::{gateway::FileFetcher, state::AppState};

const MSG_GREETING: &str = "Привет! Отправь фото, а потом отдельным сообщением — имя файла.";
const MSG_PHOTO_RECEIVED: &str = "Фото получено! Теперь отправь мне имя для файла.";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "start working with the bot")]
    Start,
    #[command(description = "show usage instructions")]
    Help,
}

/// Dispatcher tree: commands first, then photos, then naming texts.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(handle_photo),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(is_naming_text))
                .endpoint(handle_text),
        )
}

/// Only plain text counts as a file name. Command-shaped messages that the
/// command branch did not recognize (e.g. /delete) are ignored entirely.
fn is_naming_text(text: &str) -> bool {
    !text.starts_with('/')
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start | Command::Help => {
            bot.send_message(msg.chat.id, MSG_GREETING).await?;
        }
    }
    Ok(())
}

/// Fetch the incoming photo and remember it until the user names it.
async fn handle_photo(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    // Telegram sends several sizes of the same photo; take the largest.
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        return Ok(());
    };

    match state.fetcher.fetch_file(&photo.file.id).await {
        Ok(content) => {
            info!("Received photo ({} bytes) from user {}", content.len(), user.id);
            state.tracker.record_photo(user.id.0, content).await;
            bot.send_message(msg.chat.id, MSG_PHOTO_RECEIVED).await?;
        }
        Err(e) => {
            // Nothing was recorded; the user gets no confirmation and resends.
            error!("Failed to fetch photo from user {}: {}", user.id, e);
        }
    }

    Ok(())
}

/// Treat a plain text message as the name for the user's pending photo.
async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match state.tracker.complete_upload(user.id.0, text).await {
        Ok(object_name) => {
            bot.send_message(msg.chat.id, format!("✅ Фото загружено как: {}", object_name))
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, e.user_message()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_shaped_text_is_not_a_name() {
        assert!(!is_naming_text("/delete"));
        assert!(!is_naming_text("/start"));
        assert!(is_naming_text("cat"));
        assert!(is_naming_text("my vacation"));
    }
}
