use async_trait::async_trait;
use bytes::Bytes;
use teloxide::{net::Download, prelude::*};

use crate::error::AppError;

/// The one capability the photo handler needs from the messaging side:
/// resolving a file reference to its bytes.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch_file(&self, file_id: &str) -> Result<Bytes, AppError>;
}

/// Fetches files through the Telegram Bot API (get_file + download).
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl FileFetcher for TelegramFetcher {
    async fn fetch_file(&self, file_id: &str) -> Result<Bytes, AppError> {
        let file = self
            .bot
            .get_file(file_id)
            .await
            .map_err(|e| AppError::FetchFailure(e.to_string()))?;

        let mut content = Vec::new();
        self.bot
            .download_file(&file.path, &mut content)
            .await
            .map_err(|e| AppError::FetchFailure(e.to_string()))?;

        Ok(Bytes::from(content))
    }
}
