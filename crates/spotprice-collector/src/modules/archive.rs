//! 리전별 원본 가격 이력 아카이브.
//!
//! 키 형식: `<region>/<start>_<end>_all-instance-spot-prices.json`
//! (시각은 `YYYY-MM-DDTHH:MM:SSZ`).

use serde::Serialize;
use spotprice_core::{PriceHistory, PriceRecord, TimeWindow};

use super::fetch::RegionPrices;
use crate::storage::ObjectStore;
use crate::Result;

/// 아카이브 파일명 접미어
pub const ARCHIVE_SUFFIX: &str = "all-instance-spot-prices.json";

/// 리전별 업로드 결과. 처리한 순서대로 하나씩 추가됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadStatus {
    entries: Vec<(String, bool)>,
}

impl UploadStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, region: impl Into<String>, uploaded: bool) {
        self.entries.push((region.into(), uploaded));
    }

    pub fn get(&self, region: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, ok)| *ok)
    }

    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.filter(true)
    }

    pub fn failed(&self) -> Vec<String> {
        self.filter(false)
    }

    fn filter(&self, wanted: bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, ok)| *ok == wanted)
            .map(|(r, _)| r.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 리전 아카이브 객체 키.
pub fn archive_key(region: &str, window: &TimeWindow) -> String {
    format!("{}/{}_{}", region, window.file_stem(), ARCHIVE_SUFFIX)
}

/// 로그용 키 표기 (`region/file`). 구분자가 없으면 그대로 반환합니다.
pub fn format_pricefile(key: &str) -> String {
    match key.split_once('/') {
        Some((region, file)) => format!("{}/{}", region, file.trim_start_matches('/')),
        None => key.to_string(),
    }
}

/// `{"SpotPriceHistory": [...]}` 문서를 4칸 들여쓰기 JSON으로 직렬화합니다.
pub fn encode_archive(records: &[PriceRecord]) -> Result<Vec<u8>> {
    let document = PriceHistory {
        spot_price_history: records.to_vec(),
        next_token: None,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    Ok(buf)
}

/// 리전 아카이브 업로더.
pub struct ArchiveUploader<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
}

impl<'a> ArchiveUploader<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &'a str) -> Self {
        Self { store, bucket }
    }

    /// 리전 하나를 업로드합니다. 2xx 응답일 때만 `true`입니다.
    ///
    /// 저장소 에러는 로그만 남기고 `false`를 반환합니다.
    pub async fn upload(&self, region: &str, records: &[PriceRecord], window: &TimeWindow) -> bool {
        let key = archive_key(region, window);

        let body = match encode_archive(records) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(region = region, error = %e, "아카이브 직렬화 실패");
                return false;
            }
        };

        match self.store.put(self.bucket, &key, body).await {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(
                    file = %format_pricefile(&key),
                    records = records.len(),
                    "아카이브 업로드 완료"
                );
                true
            }
            Ok(status) => {
                tracing::error!(file = %format_pricefile(&key), status = status, "아카이브 업로드 거부");
                false
            }
            Err(e) => {
                tracing::error!(file = %format_pricefile(&key), error = %e, "아카이브 업로드 실패");
                false
            }
        }
    }

    /// 조회된 리전을 순서대로 업로드하고, 조회 실패 리전은 `false`로 기록합니다.
    pub async fn upload_all(
        &self,
        regions: &[RegionPrices],
        fetch_failed: &[String],
        window: &TimeWindow,
    ) -> UploadStatus {
        let mut status = UploadStatus::new();
        for region in regions {
            let ok = self.upload(&region.region, &region.records, window).await;
            status.record(region.region.clone(), ok);
        }
        for region in fetch_failed {
            status.record(region.clone(), false);
        }
        status
    }
}
