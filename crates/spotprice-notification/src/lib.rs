//! # Spotprice Notification
//!
//! 스팟 가격 수집 실행 결과 알림 서비스.
//!
//! 지원 채널:
//! - Webhook (topic / subject / message JSON POST)
//! - 로그 (설정된 채널이 없을 때의 기본 채널)
//!
//! 알림 전송 실패는 호출 측에서 로그로만 남기고 실행을 중단하지 않습니다.

pub mod types;
pub mod webhook;

pub use types::*;
pub use webhook::*;
