use async_trait::async_trait;

use crate::domain::asset::Asset;
use crate::error::AppResult;

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the branding image embedded in exported reports.
    async fn fetch(&self) -> AppResult<Asset>;
}
