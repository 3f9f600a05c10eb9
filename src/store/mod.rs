pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub use s3::S3Store;

/// Trait over the object-storage backend.
///
/// The pipeline only ever overwrites whole objects; `get_object` exists for
/// the trigger adapter to fetch the archive it was invoked for. Tests
/// substitute an in-memory implementation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, overwriting anything already at that key.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()>;

    /// Fetch an entire object's contents.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}
