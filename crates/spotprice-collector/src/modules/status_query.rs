//! 상태 레코드 조회.
//!
//! 같은 `(value, region)` 조회는 [`StatusQuery`] 인스턴스 안에서 한 번만 테이블을 호출합니다.
//! 캐시는 인스턴스 수명(한 번의 실행)에 한정되며 [`StatusQuery::invalidate`]로 비울 수 있습니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::storage::StatusTable;
use crate::Result;

/// hostname → instance_status
pub type StatusMap = BTreeMap<String, String>;

type CacheKey = (String, Option<String>);

/// 캐시를 가진 상태 조회기
pub struct StatusQuery {
    table: Arc<dyn StatusTable>,
    cache: HashMap<CacheKey, StatusMap>,
}

impl StatusQuery {
    pub fn new(table: Arc<dyn StatusTable>) -> Self {
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// 파티션 키가 `value`인 레코드를 hostname별 상태로 반환합니다.
    pub async fn get(&mut self, value: &str, region: Option<&str>) -> Result<StatusMap> {
        let key = (value.to_string(), region.map(str::to_string));
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(value = value, region = ?region, "상태 조회 캐시 적중");
            return Ok(cached.clone());
        }

        let items = self.table.query(value, region).await?;
        let statuses: StatusMap = items
            .iter()
            .map(|item| (item.hostname().to_string(), item.instance_status.clone()))
            .collect();

        tracing::debug!(value = value, region = ?region, hosts = statuses.len(), "상태 조회 완료");
        self.cache.insert(key, statuses.clone());
        Ok(statuses)
    }

    /// 캐시를 비웁니다.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
