mod config;
mod error;
mod gateway;
mod handlers;
mod state;
mod storage;
mod tracker;
mod utils;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use crate::{
    config::Config,
    gateway::TelegramFetcher,
    state::AppState,
    storage::init_storage,
    tracker::PendingUploads,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()
        .expect("Failed to load configuration");

    let storage = init_storage(&config)
        .await
        .expect("Failed to initialize storage");

    let bot = Bot::from_env();

    let app_state = Arc::new(AppState {
        tracker: PendingUploads::new(storage, config.upload_folder.clone()),
        fetcher: TelegramFetcher::new(bot.clone()),
    });

    info!("Starting photo relay bot, uploading into {:?}", config.upload_folder);

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![app_state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
