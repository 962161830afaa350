//! 스팟 가격 레코드와 테이블 아이템.
//!
//! 필드 이름은 EC2 `DescribeSpotPriceHistory` 응답과 같은 PascalCase를 사용하며,
//! 가격과 시각은 모두 문자열로 직렬화됩니다.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OnDemandPrice 자리표시자 값
pub const ON_DEMAND_PRICE_PLACEHOLDER: &str = "0.12456789";

/// 가격 단위
pub const PRICE_UNIT: &str = "USD/ Hr";

/// 가져온 그대로의 스팟 가격 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceRecord {
    /// AvailabilityZone (예: "us-east-1a")
    pub availability_zone: String,
    /// 인스턴스 타입 (예: "m5.large")
    pub instance_type: String,
    /// 제품 설명 (예: "Linux/UNIX")
    pub product_description: String,
    /// 스팟 가격
    #[serde(with = "rust_decimal::serde::str")]
    pub spot_price: Decimal,
    /// 가격 기록 시각
    pub timestamp: DateTime<Utc>,
}

impl PriceRecord {
    /// 새 레코드를 생성합니다.
    pub fn new(
        availability_zone: impl Into<String>,
        instance_type: impl Into<String>,
        product_description: impl Into<String>,
        spot_price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            availability_zone: availability_zone.into(),
            instance_type: instance_type.into(),
            product_description: product_description.into(),
            spot_price,
            timestamp,
        }
    }

    /// 테이블 파티션 키로 쓰는 ISO-8601 시각 문자열.
    ///
    /// 초 미만 단위가 있으면 그대로 유지합니다.
    pub fn timestamp_key(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// 가격 이력 응답/아카이브 문서.
///
/// `NextToken`은 페이지네이션 응답에만 존재합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(rename = "SpotPriceHistory", default)]
    pub spot_price_history: Vec<PriceRecord>,
    #[serde(rename = "NextToken", default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// 키-값 테이블에 저장되는 아이템.
///
/// 파티션 키는 `Timestamp`, 정렬 키는 `SpotPrice`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceItem {
    pub region_name: String,
    pub availability_zone: String,
    pub instance_type: String,
    pub product_description: String,
    pub spot_price: String,
    pub timestamp: String,
    pub on_demand_price: String,
    pub unit: String,
    pub record_date: NaiveDate,
}

impl PriceItem {
    /// 레코드에 로드 시점 파생 필드를 붙여 아이템을 생성합니다.
    pub fn from_record(record: &PriceRecord, region_name: &str, record_date: NaiveDate) -> Self {
        Self {
            region_name: region_name.to_string(),
            availability_zone: record.availability_zone.clone(),
            instance_type: record.instance_type.clone(),
            product_description: record.product_description.clone(),
            spot_price: record.spot_price.to_string(),
            timestamp: record.timestamp_key(),
            on_demand_price: ON_DEMAND_PRICE_PLACEHOLDER.to_string(),
            unit: PRICE_UNIT.to_string(),
            record_date,
        }
    }

    /// 파티션 키 (Timestamp)
    pub fn partition_key(&self) -> &str {
        &self.timestamp
    }

    /// 정렬 키 (SpotPrice)
    pub fn sort_key(&self) -> &str {
        &self.spot_price
    }

    /// 복합 기본 키
    pub fn key(&self) -> (&str, &str) {
        (self.partition_key(), self.sort_key())
    }
}
