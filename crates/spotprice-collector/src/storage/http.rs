//! HTTP 오브젝트 스토어 (`PUT {endpoint}/{bucket}/{key}`).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::ObjectStore;
use crate::Result;

/// S3 호환 HTTP 엔드포인트에 객체를 업로드합니다.
pub struct HttpObjectStore {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<u16> {
        let url = self.object_url(bucket, key);
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(url = %url, status = status, "객체 업로드 응답");
        Ok(status)
    }
}
