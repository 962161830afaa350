//! HTTP 가격 이력 API 클라이언트.
//!
//! `GET {base_url}/spot-price-history?region=..&start_time=..&end_time=..&max_results=..`
//! 응답은 `{"SpotPriceHistory": [...], "NextToken": "..."}` 형식이며,
//! `NextToken`이 없을 때까지 페이지를 이어서 조회합니다.
//! 같은 토큰이 반복되거나 페이지 상한을 넘으면 해당 리전 조회를 실패로 처리합니다.

use std::time::Duration;

use async_trait::async_trait;
use spotprice_core::{utc_datetime, PriceHistory, PriceRecord, TimeWindow};
use tracing::debug;

use super::PriceHistorySource;
use crate::error::CollectorError;
use crate::Result;

/// 리전당 최대 조회 레코드 수 (페이지 상한 계산용)
pub const MAX_RECORDS_PER_REGION: u32 = 1_000_000;

/// HTTP 가격 이력 소스
pub struct HttpPriceSource {
    base_url: String,
    page_size: u32,
    max_pages: u32,
    client: reqwest::Client,
}

impl HttpPriceSource {
    /// 새 소스를 생성합니다.
    pub fn new(base_url: impl Into<String>, page_size: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let page_size = page_size.max(1);
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size,
            max_pages: MAX_RECORDS_PER_REGION.div_ceil(page_size),
            client,
        })
    }

    /// 리전당 페이지 상한
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn pagination_error(region: &str, message: String) -> CollectorError {
        CollectorError::RemoteFetch {
            region: region.to_string(),
            message,
        }
    }

    async fn fetch_page(
        &self,
        region: &str,
        window: &TimeWindow,
        next_token: Option<&str>,
    ) -> Result<PriceHistory> {
        let mut query = vec![
            ("region", region.to_string()),
            ("start_time", utc_datetime(&window.start())),
            ("end_time", utc_datetime(&window.end())),
            ("max_results", self.page_size.to_string()),
        ];
        if let Some(token) = next_token {
            query.push(("next_token", token.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/spot-price-history", self.base_url))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::RemoteFetch {
                region: region.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PriceHistorySource for HttpPriceSource {
    async fn fetch_region(&self, region: &str, window: &TimeWindow) -> Result<Vec<PriceRecord>> {
        let mut records = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            if pages >= self.max_pages {
                return Err(Self::pagination_error(
                    region,
                    format!("page limit {} exceeded", self.max_pages),
                ));
            }

            let page = self
                .fetch_page(region, window, next_token.as_deref())
                .await?;
            pages += 1;
            debug!(
                region = region,
                page = pages,
                page_records = page.spot_price_history.len(),
                "가격 이력 페이지 수신"
            );
            records.extend(page.spot_price_history);

            match page.next_token.filter(|t| !t.is_empty()) {
                Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                    return Err(Self::pagination_error(
                        region,
                        format!("NextToken '{}' repeated", token),
                    ));
                }
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(records)
    }
}
