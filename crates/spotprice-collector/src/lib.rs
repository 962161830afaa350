//! EC2 spot price retriever.
//!
//! 이 crate는 스팟 가격 이력을 수집해 테이블과 아카이브에 적재하는 파이프라인을 제공합니다:
//! - 리전별 가격 이력 조회 (부분 실패 허용)
//! - 균등 파티션 분할 후 파티션당 워커 하나로 테이블 동시 적재
//! - 리전별 원본 JSON 아카이브 업로드
//! - 실행 요약 리포트 및 알림
//! - 상태 레코드 조회와 아카이브 저장소 사용량 리포트

pub mod config;
pub mod error;
pub mod event;
pub mod modules;
pub mod sources;
pub mod stats;
pub mod storage;

pub use config::{CollectorConfig, EnvLookup};
pub use error::{CollectorError, Result};
pub use event::RunEvent;
pub use stats::LoadResult;
