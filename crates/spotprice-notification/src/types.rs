//! 알림 타입 및 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 알림 우선순위 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// 일반 실행 보고
    #[default]
    Normal,
    /// 일부 리전/레코드 실패
    High,
    /// 실행 중단
    Critical,
}

/// 알림 이벤트 타입.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// 실행 종료 요약
    RunSummary {
        /// 파티션별 처리 레코드 수
        partition_records: Vec<usize>,
        /// 적재 성공 레코드 수
        written: usize,
        /// 적재 실패 레코드 수
        failed: usize,
        /// 아카이브 업로드 성공 리전 수
        regions_uploaded: usize,
        /// 아카이브 업로드 실패 리전
        regions_failed: Vec<String>,
    },
    /// 시스템 오류
    SystemError { error_code: String, message: String },
}

impl NotificationEvent {
    /// 기본 제목
    pub fn default_subject(&self) -> String {
        match self {
            Self::RunSummary { .. } => "SpotPrice data S3 Upload Status".to_string(),
            Self::SystemError { error_code, .. } => format!("SpotPrice retriever error {}", error_code),
        }
    }

    /// 본문 메시지
    pub fn message(&self) -> String {
        match self {
            Self::RunSummary {
                partition_records,
                written,
                failed,
                regions_uploaded,
                regions_failed,
            } => {
                let mut lines = vec!["Records processed:".to_string()];
                for (index, count) in partition_records.iter().enumerate() {
                    lines.push(format!("\t- Partition {}: {}", index + 1, count));
                }
                lines.push(format!("Table writes: {} written, {} failed", written, failed));
                lines.push(format!("Archives uploaded: {}", regions_uploaded));
                if !regions_failed.is_empty() {
                    lines.push(format!("Archive failures: {}", regions_failed.join(", ")));
                }
                lines.join("\n")
            }
            Self::SystemError {
                error_code,
                message,
            } => format!("[{}] {}", error_code, message),
        }
    }
}

/// 알림 메시지.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// 고유 알림 ID
    pub id: String,
    /// 제목
    pub subject: String,
    /// 알림 이벤트
    pub event: NotificationEvent,
    /// 우선순위 레벨
    pub priority: NotificationPriority,
    /// 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// 새 알림을 생성합니다. 제목은 이벤트 기본값을 사용합니다.
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject: event.default_subject(),
            event,
            priority: NotificationPriority::Normal,
            timestamp: Utc::now(),
        }
    }

    /// 우선순위 레벨을 설정합니다.
    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 본문 메시지
    pub fn message(&self) -> String {
        self.event.message()
    }
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 알림을 전송합니다.
    async fn send(&self, notification: &Notification) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
