//! # Spotprice Core
//!
//! EC2 스팟 가격 수집 파이프라인의 핵심 도메인 모델을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 스팟 가격 레코드 및 테이블 아이템
//! - 수집 시간 구간 (TimeWindow)
//! - 균등 파티션 분할
//! - 리전 카탈로그 및 AvailabilityZone → 리전 매핑
//! - 인스턴스 타입별 통계
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;

pub use domain::*;
pub use error::*;
pub use logging::*;
