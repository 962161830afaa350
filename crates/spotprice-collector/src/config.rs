//! 환경변수 기반 설정 모듈.
//!
//! 사용하는 환경변수와 기본값은 [`ENV_DEFAULTS`] 표에 모두 나열되어 있으며,
//! 실행 시작 시 한 번만 읽어 [`CollectorConfig`]로 변환합니다.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CollectorError;
use crate::Result;

/// 환경변수 이름과 기본값 (`None`이면 선택 항목)
pub const ENV_DEFAULTS: &[(&str, Option<&str>)] = &[
    ("DYNAMODB_TABLE", Some("PriceData")),
    ("STATUS_TABLE", Some("InstanceStatus")),
    ("S3_BUCKET", None),
    ("DEFAULT_DURATION", Some("1")),
    ("PAGE_SIZE", Some("700")),
    ("PARTITION_COUNT", Some("4")),
    ("DBUGMODE", Some("false")),
    ("SNS_TOPIC_ARN", None),
    ("PRICE_API_URL", None),
    ("DATABASE_URL", None),
    ("ARCHIVE_DIR", None),
    ("OBJECT_STORE_URL", None),
    ("NOTIFY_WEBHOOK_URL", None),
    ("NOTIFY_ENABLED", Some("true")),
    ("REGION_CODES", None),
    ("HTTP_TIMEOUT_SECS", Some("30")),
];

/// 한 번 해석된 환경변수 값.
#[derive(Debug, Clone, Default)]
pub struct EnvLookup {
    values: HashMap<&'static str, String>,
}

impl EnvLookup {
    /// 프로세스 환경에서 표에 있는 변수만 읽습니다.
    pub fn resolve() -> Self {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// 임의의 조회 함수로 해석합니다 (테스트용).
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let values = ENV_DEFAULTS
            .iter()
            .filter_map(|(name, default)| {
                lookup(*name)
                    .filter(|v| !v.trim().is_empty())
                    .or_else(|| default.map(str::to_string))
                    .map(|v| (*name, v))
            })
            .collect();
        Self { values }
    }

    /// 값 조회
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    fn parse<T: FromStr>(&self, name: &str) -> Result<T> {
        let raw = self
            .get(name)
            .ok_or_else(|| CollectorError::Config(format!("{} is not set", name)))?;
        raw.trim()
            .parse()
            .map_err(|_| CollectorError::Config(format!("{}: invalid value '{}'", name, raw)))
    }

    fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
    }
}

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 가격 테이블 이름
    pub table_name: String,
    /// 상태 테이블 이름
    pub status_table: String,
    /// 아카이브 버킷
    pub bucket: Option<String>,
    /// 수집 기간 (일)
    pub duration_days: u32,
    /// 가격 API 페이지 크기
    pub page_size: u32,
    /// 적재 파티션(워커) 수
    pub partitions: usize,
    /// 디버그 모드 (이벤트 원문 로그)
    pub debug_mode: bool,
    /// 알림 토픽
    pub sns_topic_arn: Option<String>,
    /// 가격 이력 API 주소
    pub price_api_url: Option<String>,
    /// Postgres 접속 URL
    pub database_url: Option<String>,
    /// 로컬 아카이브 디렉터리
    pub archive_dir: Option<PathBuf>,
    /// HTTP 오브젝트 스토어 주소
    pub object_store_url: Option<String>,
    /// 알림 Webhook 주소
    pub notify_webhook_url: Option<String>,
    /// Webhook 알림 활성화 여부
    pub notify_enabled: bool,
    /// 리전 코드 목록 (쉼표 구분)
    pub region_codes: Option<String>,
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&EnvLookup::resolve())
    }

    /// 해석된 환경변수 값에서 설정을 만듭니다.
    pub fn from_lookup(env: &EnvLookup) -> Result<Self> {
        Ok(Self {
            table_name: env.parse("DYNAMODB_TABLE")?,
            status_table: env.parse("STATUS_TABLE")?,
            bucket: env.optional("S3_BUCKET"),
            duration_days: env.parse("DEFAULT_DURATION")?,
            page_size: env.parse("PAGE_SIZE")?,
            partitions: env.parse("PARTITION_COUNT")?,
            debug_mode: env.flag("DBUGMODE"),
            sns_topic_arn: env.optional("SNS_TOPIC_ARN"),
            price_api_url: env.optional("PRICE_API_URL"),
            database_url: env.optional("DATABASE_URL"),
            archive_dir: env.optional("ARCHIVE_DIR").map(PathBuf::from),
            object_store_url: env.optional("OBJECT_STORE_URL"),
            notify_webhook_url: env.optional("NOTIFY_WEBHOOK_URL"),
            notify_enabled: env.flag("NOTIFY_ENABLED"),
            region_codes: env.optional("REGION_CODES"),
            http_timeout_secs: env.parse("HTTP_TIMEOUT_SECS")?,
        })
    }

    /// 아카이브 버킷 (필수)
    pub fn require_bucket(&self) -> Result<&str> {
        self.bucket
            .as_deref()
            .ok_or_else(|| CollectorError::Config("S3_BUCKET is not set".to_string()))
    }

    /// HTTP 요청 타임아웃을 Duration으로 반환
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// 실행 시작 시 설정 상태를 로그로 남깁니다.
    pub fn log_status(&self) {
        tracing::info!(
            table = %self.table_name,
            bucket = self.bucket.as_deref().unwrap_or("-"),
            partitions = self.partitions,
            duration_days = self.duration_days,
            debug_mode = self.debug_mode,
            notify_enabled = self.notify_enabled,
            "Environment variable status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> EnvLookup {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvLookup::from_source(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::from_lookup(&lookup(&[])).unwrap();

        assert_eq!(config.table_name, "PriceData");
        assert_eq!(config.duration_days, 1);
        assert_eq!(config.page_size, 700);
        assert_eq!(config.partitions, 4);
        assert!(!config.debug_mode);
        assert!(config.notify_enabled);
        assert!(config.bucket.is_none());
        assert!(config.require_bucket().unwrap_err().is_fatal());
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = CollectorConfig::from_lookup(&lookup(&[
            ("S3_BUCKET", "spot-history"),
            ("PARTITION_COUNT", "8"),
            ("DBUGMODE", "True"),
            ("ARCHIVE_DIR", "/tmp/archive"),
            ("NOTIFY_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.require_bucket().unwrap(), "spot-history");
        assert_eq!(config.partitions, 8);
        assert!(config.debug_mode);
        assert_eq!(config.archive_dir, Some(PathBuf::from("/tmp/archive")));
        assert!(!config.notify_enabled);
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = CollectorConfig::from_lookup(&lookup(&[("PAGE_SIZE", "  ")])).unwrap();
        assert_eq!(config.page_size, 700);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = CollectorConfig::from_lookup(&lookup(&[("DEFAULT_DURATION", "one")])).unwrap_err();
        assert!(matches!(err, CollectorError::Config(msg) if msg.contains("DEFAULT_DURATION")));
    }

    #[test]
    fn test_unlisted_variables_are_ignored() {
        let env = lookup(&[("SOMETHING_ELSE", "x")]);
        assert!(env.get("SOMETHING_ELSE").is_none());
    }
}
