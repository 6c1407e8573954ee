//! Remote object storage access

pub mod credentials;
pub mod remote;
pub mod s3;
pub mod sigv4;

use anyhow::Result;

pub use credentials::{Credentials, EnvSource, ProcessEnv};
pub use remote::RemoteModel;
pub use s3::{S3Connector, S3Store};

/// Read-only view of a bucket-addressed object store
pub trait ObjectStore {
    /// Full object body
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool>;
}

/// Opens an object store once credentials are known
pub trait StoreConnector {
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn ObjectStore>>;
}

impl<F> StoreConnector for F
where
    F: Fn(Credentials) -> Result<Box<dyn ObjectStore>>,
{
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn ObjectStore>> {
        self(credentials)
    }
}
