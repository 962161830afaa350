//! 에러 타입 정의.

use spotprice_core::SpotError;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 누락/형식 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 트리거 이벤트 형식 오류
    #[error("이벤트 형식 에러: {0}")]
    Event(String),

    /// 리전 단위 가격 이력 조회 실패
    #[error("가격 이력 조회 실패 ({region}): {message}")]
    RemoteFetch { region: String, message: String },

    /// 레코드 단위 테이블 쓰기 실패
    #[error("테이블 쓰기 실패: {0}")]
    TableWrite(String),

    /// 리전 단위 아카이브 업로드 실패
    #[error("아카이브 업로드 실패 ({key}): {message}")]
    ArchiveUpload { key: String, message: String },

    /// 저장소가 지원하지 않는 작업
    #[error("지원하지 않는 작업: {0}")]
    Unsupported(String),

    /// 도메인 에러 (잘못된 인자, 리전 매칭 실패 등)
    #[error(transparent)]
    Domain(#[from] SpotError),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP 에러
    #[error("HTTP 에러: {0}")]
    Http(#[from] reqwest::Error),

    /// 파일 시스템 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollectorError {
    /// 실행 전체를 중단해야 하는 에러인지 확인합니다.
    ///
    /// 설정/이벤트 형식 오류와 잘못된 인자만 치명적이며,
    /// 나머지는 해당 레코드나 리전만 실패로 기록합니다.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Event(_) => true,
            Self::Domain(e) => e.is_fatal(),
            _ => false,
        }
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
