use crate::gateway::TelegramFetcher;
use crate::storage::StorageBackend;
use crate::tracker::PendingUploads;

/// Central application state shared across all bot handlers.
pub struct AppState {
    /// Per-user pending-upload tracker, backed by the configured storage.
    pub tracker: PendingUploads<StorageBackend>,

    /// Resolves Telegram file references to bytes.
    pub fetcher: TelegramFetcher,
}
