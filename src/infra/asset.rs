use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};

use crate::domain::asset::{Asset, media_type_for_extension};
use crate::error::{AppError, AppResult};
use crate::services::AssetSource;

const BUNDLED_LOGO: &[u8] = include_bytes!("../../assets/logo.svg");

/// The logo shipped inside the binary; used when no other source is configured.
pub struct BundledLogo;

#[async_trait]
impl AssetSource for BundledLogo {
    async fn fetch(&self) -> AppResult<Asset> {
        Ok(Asset::new(BUNDLED_LOGO.to_vec(), "image/svg+xml"))
    }
}

pub struct FileAsset {
    path: PathBuf,
}

impl FileAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AssetSource for FileAsset {
    async fn fetch(&self) -> AppResult<Asset> {
        let media_type = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(media_type_for_extension)
            .unwrap_or("application/octet-stream");
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(Asset::new(bytes, media_type))
    }
}

pub struct HttpAsset {
    http: Client,
    url: String,
}

impl HttpAsset {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }

    fn fallback_media_type(&self) -> &'static str {
        self.url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit_once('.'))
            .and_then(|(_, ext)| media_type_for_extension(ext))
            .unwrap_or("application/octet-stream")
    }
}

#[async_trait]
impl AssetSource for HttpAsset {
    async fn fetch(&self) -> AppResult<Asset> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| AppError::Asset(format!("failed to fetch {}: {err}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Asset(format!(
                "{} responded with {status}",
                self.url
            )));
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.fallback_media_type().to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::Asset(format!("failed to read {}: {err}", self.url)))?;

        Ok(Asset::new(bytes.to_vec(), media_type))
    }
}
