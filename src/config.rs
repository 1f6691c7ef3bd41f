use std::env;

use dotenvy::dotenv;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// Destination folder/prefix every named photo is uploaded into.
    #[validate(length(min = 1))]
    pub upload_folder: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub s3_bucket: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub local_storage_dir: String,
    pub use_s3: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The bot token itself is read by teloxide from `TELOXIDE_TOKEN`.
    pub fn from_env() -> Result<Self, env::VarError> {
        // Load environment variables from `.env` file (if it exists)
        dotenv().ok();

        let config = Config {
            upload_folder: env::var("UPLOAD_FOLDER")?,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "photo-relay".to_string()),
            s3_access_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            s3_secret_key: env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            local_storage_dir: env::var("LOCAL_STORAGE_DIR")
                .unwrap_or_else(|_| "uploads".to_string()),
            use_s3: env::var("USE_S3")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        // Validate configuration values (e.g. non-empty upload folder)
        config.validate().expect("Invalid Configuration");
        Ok(config)
    }
}
