pub mod asset_source;
pub mod blob_storage;
pub mod clock;

pub use asset_source::AssetSource;
pub use blob_storage::BlobStorage;
pub use clock::Clock;
