use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No pending upload for this user")]
    NoPendingUpload,

    #[error("Empty file name")]
    EmptyName,

    #[error("File name contains path components")]
    InvalidName,

    #[error("Upload failed: {0}")]
    UploadFailure(#[from] StorageError),

    #[error("File fetch failed: {0}")]
    FetchFailure(String),
}

impl AppError {
    /// Map application errors to the reply text shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::NoPendingUpload => "Сначала пришли фото.",
            AppError::EmptyName => "Имя не может быть пустым. Отправь имя для файла.",
            AppError::InvalidName => "Такое имя не подходит. Отправь имя без '/', '\\' и '..'.",
            AppError::UploadFailure(_) => "Не удалось загрузить фото. Пришли его ещё раз.",
            AppError::FetchFailure(_) => "Не удалось получить фото. Пришли его ещё раз.",
        }
    }
}
