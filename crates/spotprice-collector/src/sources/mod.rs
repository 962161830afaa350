//! 가격 이력 소스.
//!
//! 소스는 리전 하나 단위로 조회하며, 여러 리전 조합과 부분 실패 처리는
//! [`crate::modules::fetch::PriceFetcher`]가 담당합니다.

pub mod http;

use std::collections::HashMap;

use async_trait::async_trait;
use spotprice_core::{PriceRecord, TimeWindow};

use crate::error::CollectorError;
use crate::Result;

pub use http::HttpPriceSource;

/// 가격 이력 소스 trait.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// 리전 하나의 구간 내 가격 이력을 조회합니다.
    async fn fetch_region(&self, region: &str, window: &TimeWindow) -> Result<Vec<PriceRecord>>;
}

/// 미리 준비된 데이터를 돌려주는 소스 (테스트/드라이런용).
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    records: HashMap<String, Vec<PriceRecord>>,
    failures: HashMap<String, String>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 리전 데이터를 추가합니다.
    pub fn with_region(mut self, region: impl Into<String>, records: Vec<PriceRecord>) -> Self {
        self.records.insert(region.into(), records);
        self
    }

    /// 조회 시 실패할 리전을 지정합니다.
    pub fn with_failure(mut self, region: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(region.into(), message.into());
        self
    }
}

#[async_trait]
impl PriceHistorySource for StaticPriceSource {
    async fn fetch_region(&self, region: &str, _window: &TimeWindow) -> Result<Vec<PriceRecord>> {
        if let Some(message) = self.failures.get(region) {
            return Err(CollectorError::RemoteFetch {
                region: region.to_string(),
                message: message.clone(),
            });
        }
        Ok(self.records.get(region).cloned().unwrap_or_default())
    }
}
