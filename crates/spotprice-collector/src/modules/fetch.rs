//! 여러 리전의 가격 이력 조회.

use std::time::Instant;

use spotprice_core::{PriceRecord, RegionCatalog, TimeWindow};

use crate::error::CollectorError;
use crate::sources::PriceHistorySource;
use crate::Result;

/// 리전 하나의 조회 결과
#[derive(Debug, Clone)]
pub struct RegionPrices {
    pub region: String,
    pub records: Vec<PriceRecord>,
}

/// 조회 결과. 성공한 리전은 요청 순서를 유지합니다.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub regions: Vec<RegionPrices>,
    pub failed: Vec<(String, CollectorError)>,
}

impl FetchOutcome {
    /// 리전 순서대로 이어붙인 전체 레코드
    pub fn records(&self) -> Vec<PriceRecord> {
        self.regions
            .iter()
            .flat_map(|r| r.records.iter().cloned())
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.regions.iter().map(|r| r.records.len()).sum()
    }

    pub fn failed_regions(&self) -> Vec<String> {
        self.failed.iter().map(|(r, _)| r.clone()).collect()
    }
}

/// 가격 이력 조회기
pub struct PriceFetcher<'a> {
    source: &'a dyn PriceHistorySource,
    catalog: &'a dyn RegionCatalog,
}

impl<'a> PriceFetcher<'a> {
    pub fn new(source: &'a dyn PriceHistorySource, catalog: &'a dyn RegionCatalog) -> Self {
        Self { source, catalog }
    }

    /// 리전별로 조회합니다. 비어 있는 `regions`는 카탈로그 전체를 의미합니다.
    ///
    /// 리전 하나의 실패는 다른 리전 조회를 막지 않습니다.
    /// 카탈로그 조회 실패만 에러로 반환합니다.
    pub async fn fetch(&self, regions: &[String], window: &TimeWindow) -> Result<FetchOutcome> {
        let started = Instant::now();
        let targets = if regions.is_empty() {
            self.catalog.list_regions().await?
        } else {
            regions.to_vec()
        };

        tracing::info!(
            regions = targets.len(),
            start = %window.start(),
            end = %window.end(),
            "가격 이력 조회 시작"
        );

        let mut outcome = FetchOutcome::default();
        for region in targets {
            match self.source.fetch_region(&region, window).await {
                Ok(records) => {
                    tracing::debug!(region = %region, records = records.len(), "리전 조회 완료");
                    outcome.regions.push(RegionPrices { region, records });
                }
                Err(e) => {
                    tracing::error!(region = %region, error = %e, "리전 조회 실패");
                    outcome.failed.push((region, e));
                }
            }
        }

        tracing::info!(
            records = outcome.record_count(),
            failed_regions = outcome.failed.len(),
            elapsed = format!("{:.1}s", started.elapsed().as_secs_f64()),
            "가격 이력 조회 완료"
        );
        Ok(outcome)
    }
}
