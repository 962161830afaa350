//! 로컬 디렉터리 오브젝트 스토어.
//!
//! 객체는 `{root}/{bucket}/{key}` 경로에 저장됩니다.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{ObjectStore, ObjectSummary};
use crate::Result;

/// 파일 시스템 오브젝트 스토어.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<u16> {
        let path = self.bucket_dir(bucket).join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, body).await?;
        Ok(200)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let base = self.bucket_dir(bucket);
        let mut objects = Vec::new();
        if !fs::try_exists(&base).await? {
            return Ok(objects);
        }

        let mut pending = vec![base.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Ok(relative) = path.strip_prefix(&base) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    objects.push(ObjectSummary {
                        key,
                        size: meta.len(),
                    });
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());

        store
            .put("archive", "us-east-1/x.json", b"12345".to_vec())
            .await
            .unwrap();
        store
            .put("archive", "us-east-2/y.json", b"123".to_vec())
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("archive/us-east-1/x.json")).unwrap();
        assert_eq!(written, b"12345");

        let listed = store.list("archive", "us-east-1").await.unwrap();
        assert_eq!(
            listed,
            vec![ObjectSummary {
                key: "us-east-1/x.json".to_string(),
                size: 5
            }]
        );

        let all = store.list("archive", "").await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_missing_bucket_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        assert!(store.list("nothing", "").await.unwrap().is_empty());
    }
}
