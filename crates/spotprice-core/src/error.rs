//! 스팟 가격 도메인의 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum SpotError {
    /// 잘못된 인자 (파티션 수 0, 기간 0일 등)
    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),

    /// AvailabilityZone에 해당하는 리전을 찾지 못함
    #[error("리전 매칭 실패: {0}")]
    NoRegionMatch(String),

    /// 리전 카탈로그 조회 실패
    #[error("리전 카탈로그 에러: {0}")]
    Catalog(String),

    /// 날짜/시간 파싱 에러
    #[error("날짜 파싱 에러: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type SpotResult<T> = Result<T, SpotError>;

impl SpotError {
    /// 실행 전체를 중단해야 하는 에러인지 확인합니다.
    ///
    /// 레코드 단위 에러(`NoRegionMatch`)는 해당 레코드만 건너뜁니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SpotError::InvalidArgument(_) | SpotError::Catalog(_))
    }
}

impl From<serde_json::Error> for SpotError {
    fn from(err: serde_json::Error) -> Self {
        SpotError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fatal() {
        let invalid = SpotError::InvalidArgument("partition count must be >= 1".to_string());
        assert!(invalid.is_fatal());

        let no_match = SpotError::NoRegionMatch("mars-north-1a".to_string());
        assert!(!no_match.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = SpotError::NoRegionMatch("zz-top-1a".to_string());
        assert!(err.to_string().contains("zz-top-1a"));
    }
}
