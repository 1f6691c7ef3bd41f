use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::{Client, primitives::ByteStream};
use aws_types::region::Region;
use bytes::Bytes;
use tracing::info;

use crate::{
    config::Config,
    storage::{ObjectCreator, StorageError},
};

// AWS S3 Storage backend
#[derive(Clone)]
pub struct S3Storage {
    client: Client, // AWS S3 client
    bucket: String, // S3 bucket name
}

impl S3Storage {
    /// Initialize the S3 client and verify the bucket is usable.
    /// An unreachable bucket or rejected credentials fail startup.
    pub async fn new(config: &Config) -> Result<Self, StorageError> {
        let region_provider = RegionProviderChain::first_try(Region::new(config.s3_region.clone()))
            .or_default_provider()
            .or_else(Region::new("us-east-1"));

        let mut aws_config_builder = aws_config::from_env().region(region_provider);

        // Custom endpoint (e.g., for MinIO)
        if let Some(endpoint) = &config.s3_endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);

            let credentials = Credentials::new(
                config.s3_access_key.clone(),
                config.s3_secret_key.clone(),
                None,
                None,
                "custom",
            );

            aws_config_builder = aws_config_builder.credentials_provider(credentials);
        }

        let aws_config = aws_config_builder.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true) // Required for MinIO
                .build(),
        );

        Self::verify_bucket(&client, &config.s3_bucket).await?;

        Ok(Self {
            client,
            bucket: config.s3_bucket.clone(),
        })
    }

    /// Ensure the S3 bucket exists, creating it when possible.
    async fn verify_bucket(client: &Client, bucket: &str) -> Result<(), StorageError> {
        if client.head_bucket().bucket(bucket).send().await.is_ok() {
            info!("Bucket {} exists", bucket);
            return Ok(());
        }

        match client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {
                info!("Bucket {} created successfully", bucket);
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("BucketAlreadyOwnedByYou")
                    || err_msg.contains("BucketAlreadyExists")
                {
                    info!("Bucket {} already exists", bucket);
                    Ok(())
                } else {
                    Err(StorageError::Unavailable(format!(
                        "bucket {} is not usable: {}",
                        bucket, err_msg
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl ObjectCreator for S3Storage {
    /// Uploads content to the S3 bucket under `container/name`.
    async fn create_object(
        &self,
        content: Bytes,
        name: &str,
        container: &str,
    ) -> Result<String, StorageError> {
        let key = format!("{}/{}", container, name);
        let body = ByteStream::from(content);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("image/jpeg")
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadError(e.to_string()))?;

        info!("Uploaded object to s3://{}/{}", self.bucket, key);
        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}
