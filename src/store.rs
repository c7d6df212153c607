use std::fs;
use std::io::Write;
use std::path::PathBuf;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::ManifestError;

/// Logical path of the manifest inside the destination store. Each run
/// fully replaces the object; there are no merge semantics.
pub const MANIFEST_KEY: &str = "melodi/datasets.json";

pub trait ManifestStore: Send + Sync {
    fn put(&self, key: &str, content: &[u8]) -> Result<(), ManifestError>;
}

/// S3-compatible destination. The SDK is async; a private current-thread
/// runtime bridges it into the otherwise blocking pipeline.
pub struct S3ManifestStore {
    runtime: tokio::runtime::Runtime,
    client: Client,
    bucket: String,
}

impl S3ManifestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ManifestError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ManifestError::StoreConfig(err.to_string()))?;

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "melodi-manifest",
        );
        let mut builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        let client = Client::from_conf(builder.build());

        Ok(Self {
            runtime,
            client,
            bucket: config.bucket.clone(),
        })
    }
}

impl ManifestStore for S3ManifestStore {
    fn put(&self, key: &str, content: &[u8]) -> Result<(), ManifestError> {
        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .content_type("application/json; charset=utf-8")
                    .body(ByteStream::from(content.to_vec()))
                    .send(),
            )
            .map_err(|err| ManifestError::StoreWrite(err.to_string()))?;
        info!(bucket = %self.bucket, key, bytes = content.len(), "manifest uploaded");
        Ok(())
    }
}

/// Filesystem destination for local runs and tests. Writes go through a
/// temp file in the target directory and an atomic rename, so a reader
/// never observes a half-written manifest.
pub struct FsManifestStore {
    root: PathBuf,
}

impl FsManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestStore for FsManifestStore {
    fn put(&self, key: &str, content: &[u8]) -> Result<(), ManifestError> {
        let destination = self.root.join(key);
        let parent = destination
            .parent()
            .ok_or_else(|| ManifestError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent).map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix("manifest")
            .tempfile_in(parent)
            .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        if destination.exists() {
            fs::remove_file(&destination)
                .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        }
        temp.persist(&destination)
            .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
