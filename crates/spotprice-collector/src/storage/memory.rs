//! 메모리 저장소 (테스트/드라이런용).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use spotprice_core::PriceItem;
use tokio::sync::Mutex;

use super::{ObjectStore, ObjectSummary, PriceTable, StatusItem, StatusTable};
use crate::error::CollectorError;
use crate::Result;

/// 메모리 가격 테이블.
#[derive(Debug, Default)]
pub struct MemoryPriceTable {
    items: Mutex<HashMap<(String, String), PriceItem>>,
    calls: AtomicUsize,
    failing_zones: HashSet<String>,
}

impl MemoryPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 해당 AvailabilityZone 아이템 쓰기를 항상 실패시킵니다.
    pub fn with_failing_zone(mut self, zone: impl Into<String>) -> Self {
        self.failing_zones.insert(zone.into());
        self
    }

    /// upsert 호출 횟수 (실패 포함)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 저장된 아이템 수
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 키로 아이템을 조회합니다.
    pub async fn get(&self, partition_key: &str, sort_key: &str) -> Option<PriceItem> {
        self.items
            .lock()
            .await
            .get(&(partition_key.to_string(), sort_key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl PriceTable for MemoryPriceTable {
    async fn upsert(&self, item: &PriceItem) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_zones.contains(&item.availability_zone) {
            return Err(CollectorError::TableWrite(format!(
                "ProvisionedThroughputExceeded for {}",
                item.availability_zone
            )));
        }

        let key = (item.partition_key().to_string(), item.sort_key().to_string());
        self.items.lock().await.insert(key, item.clone());
        Ok(())
    }
}

/// 메모리 상태 테이블.
#[derive(Debug, Default)]
pub struct MemoryStatusTable {
    items: Vec<StatusItem>,
    queries: AtomicUsize,
}

impl MemoryStatusTable {
    pub fn new(items: Vec<StatusItem>) -> Self {
        Self {
            items,
            queries: AtomicUsize::new(0),
        }
    }

    /// query 호출 횟수
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusTable for MemoryStatusTable {
    async fn query(&self, value: &str, region: Option<&str>) -> Result<Vec<StatusItem>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let prefix = region.map(|r| format!("{}|", r));
        Ok(self
            .items
            .iter()
            .filter(|item| item.partition_value == value)
            .filter(|item| {
                prefix
                    .as_deref()
                    .map_or(true, |p| item.resource.starts_with(p))
            })
            .cloned()
            .collect())
    }
}

/// 메모리 오브젝트 스토어.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    failing_prefixes: Vec<String>,
    reject_status: Option<u16>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 해당 접두어 키 저장 시 에러를 반환합니다.
    pub fn with_failing_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.failing_prefixes.push(prefix.into());
        self
    }

    /// 저장하지 않고 주어진 상태 코드를 반환합니다.
    pub fn rejecting_with(mut self, status: u16) -> Self {
        self.reject_status = Some(status);
        self
    }

    /// 저장된 객체 본문
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// 저장된 키 목록
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<u16> {
        if self.failing_prefixes.iter().any(|p| key.starts_with(p.as_str())) {
            return Err(CollectorError::ArchiveUpload {
                key: key.to_string(),
                message: "connection reset".to_string(),
            });
        }
        if let Some(status) = self.reject_status {
            return Ok(status);
        }

        self.objects
            .lock()
            .await
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(200)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        Ok(self
            .objects
            .lock()
            .await
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), body)| ObjectSummary {
                key: k.clone(),
                size: body.len() as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_table_filters_region_prefix() {
        let table = MemoryStatusTable::new(vec![
            StatusItem {
                partition_value: "run-1".to_string(),
                resource: "us-east-1|web-01".to_string(),
                instance_status: "running".to_string(),
            },
            StatusItem {
                partition_value: "run-1".to_string(),
                resource: "eu-west-1|web-02".to_string(),
                instance_status: "stopped".to_string(),
            },
            StatusItem {
                partition_value: "run-2".to_string(),
                resource: "us-east-1|web-03".to_string(),
                instance_status: "running".to_string(),
            },
        ]);

        assert_eq!(table.query("run-1", None).await.unwrap().len(), 2);

        let filtered = table.query("run-1", Some("us-east-1")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].hostname(), "web-01");
        assert_eq!(table.queries(), 2);
    }

    #[tokio::test]
    async fn test_object_store_list_by_prefix() {
        let store = MemoryObjectStore::new();
        store.put("b", "us-east-1/a.json", vec![0; 10]).await.unwrap();
        store.put("b", "us-east-2/b.json", vec![0; 5]).await.unwrap();
        store.put("other", "us-east-1/c.json", vec![0; 7]).await.unwrap();

        let listed = store.list("b", "us-east-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, 10);
        assert_eq!(store.keys("b").await.len(), 2);
    }
}
