//! S3-compatible object store over blocking HTTP

use crate::config::RemoteConfig;
use crate::error::ResolveError;
use crate::storage::credentials::Credentials;
use crate::storage::sigv4::{uri_encode, Signer};
use crate::storage::{ObjectStore, StoreConnector};
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info};

/// Path-style S3 client signing every request with SigV4
pub struct S3Store {
    client: Client,
    endpoint: String,
    region: String,
    credentials: Credentials,
}

impl S3Store {
    pub fn new(config: &RemoteConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vehicle-insurance-predictor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
            region: config.region.clone(),
            credentials,
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        let raw = format!(
            "{}/{}/{}",
            self.endpoint,
            uri_encode(bucket, true),
            uri_encode(key.trim_start_matches('/'), false)
        );
        Url::parse(&raw).with_context(|| format!("Invalid object URL {}", raw))
    }

    fn signed_request(&self, method: Method, bucket: &str, key: &str) -> Result<RequestBuilder> {
        let url = self.object_url(bucket, key)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("object URL {} has no host", url),
        };

        let headers = Signer::new(&self.credentials, &self.region, "s3").sign(
            method.as_str(),
            &host,
            url.path(),
            &[],
            Utc::now(),
        )?;

        debug!(method = %method, url = %url, "Signed object storage request");

        let mut request = self.client.request(method, url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        Ok(request)
    }
}

impl ObjectStore for S3Store {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .signed_request(Method::GET, bucket, key)?
            .send()
            .with_context(|| format!("Failed to fetch s3://{}/{}", bucket, key))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .with_context(|| format!("Failed to read body of s3://{}/{}", bucket, key))?;
                info!(bucket = %bucket, key = %key, bytes = body.len(), "Fetched object");
                Ok(body.to_vec())
            }
            StatusCode::NOT_FOUND => Err(ResolveError::RemoteModelMissing {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
            .into()),
            status => Err(ResolveError::RemoteFetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            }
            .into()),
        }
    }

    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let response = self
            .signed_request(Method::HEAD, bucket, key)?
            .send()
            .with_context(|| format!("Failed to query s3://{}/{}", bucket, key))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ResolveError::RemoteFetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            }
            .into()),
        }
    }
}

/// Builds an `S3Store` from the remote configuration
#[derive(Debug, Clone)]
pub struct S3Connector {
    config: RemoteConfig,
}

impl S3Connector {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }
}

impl StoreConnector for S3Connector {
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn ObjectStore>> {
        Ok(Box::new(S3Store::new(&self.config, credentials)?))
    }
}
