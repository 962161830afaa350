//! 저장소 추상화와 구현.
//!
//! - [`PriceTable`]: 가격 아이템 Upsert (파티션 키 Timestamp, 정렬 키 SpotPrice)
//! - [`StatusTable`]: 파티션 키 값으로 상태 레코드 조회
//! - [`ObjectStore`]: 아카이브 객체 저장 및 목록 조회

pub mod http;
pub mod local;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use spotprice_core::PriceItem;

use crate::error::CollectorError;
use crate::Result;

pub use http::HttpObjectStore;
pub use local::LocalObjectStore;
pub use memory::{MemoryObjectStore, MemoryPriceTable, MemoryStatusTable};
pub use postgres::{PgPriceTable, PgStatusTable};

/// 가격 테이블 trait.
#[async_trait]
pub trait PriceTable: Send + Sync {
    /// 아이템을 Upsert합니다. 같은 `(Timestamp, SpotPrice)` 키는 덮어씁니다.
    async fn upsert(&self, item: &PriceItem) -> Result<()>;
}

/// 상태 테이블 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusItem {
    /// 파티션 키 값
    pub partition_value: String,
    /// 정렬 키: `region|hostname`
    pub resource: String,
    /// 인스턴스 상태
    pub instance_status: String,
}

impl StatusItem {
    /// 정렬 키의 마지막 구간 (hostname)
    pub fn hostname(&self) -> &str {
        self.resource.rsplit('|').next().unwrap_or(&self.resource)
    }
}

/// 상태 테이블 trait.
#[async_trait]
pub trait StatusTable: Send + Sync {
    /// 파티션 키가 `value`인 레코드를 조회합니다.
    ///
    /// `region`이 주어지면 정렬 키가 `region|`로 시작하는 레코드만 반환합니다.
    async fn query(&self, value: &str, region: Option<&str>) -> Result<Vec<StatusItem>>;
}

/// 저장된 객체 요약.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// 오브젝트 스토어 trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 객체를 저장하고 HTTP 상태 코드를 반환합니다.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<u16>;

    /// 접두어로 객체 목록을 조회합니다.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let _ = (bucket, prefix);
        Err(CollectorError::Unsupported("object listing".to_string()))
    }
}

/// SQL 식별자(테이블 이름) 검증.
pub(crate) fn validate_identifier(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(name)
    } else {
        Err(CollectorError::Config(format!("invalid table name '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_item_hostname() {
        let item = StatusItem {
            partition_value: "2024-03-01".to_string(),
            resource: "us-east-1|web-01".to_string(),
            instance_status: "running".to_string(),
        };
        assert_eq!(item.hostname(), "web-01");
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("PriceData").is_ok());
        assert!(validate_identifier("price_data_2").is_ok());
        assert!(validate_identifier("price; DROP TABLE x").is_err());
        assert!(validate_identifier("1prices").is_err());
        assert!(validate_identifier("").is_err());
    }
}
