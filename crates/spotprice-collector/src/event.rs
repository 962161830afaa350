//! 실행 트리거 이벤트 파싱.
//!
//! 이벤트 형식:
//!
//! ```json
//! {
//!   "region": "us-east-2",
//!   "detail": { "responseElements": "us-east-1,us-west-2", "eventName": "GatherSpotPrices" }
//! }
//! ```

use serde::Deserialize;
use spotprice_core::parse_region_list;

use crate::error::CollectorError;
use crate::Result;

/// 트리거 이벤트
#[derive(Debug, Clone, Deserialize)]
pub struct RunEvent {
    /// 이벤트 발생 리전
    pub region: String,
    /// 이벤트 상세
    pub detail: EventDetail,
}

/// 이벤트 상세
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    /// 대상 리전 목록 (쉼표 구분)
    pub response_elements: String,
    /// 이벤트 이름
    pub event_name: String,
}

impl RunEvent {
    /// JSON 문자열을 파싱합니다. 필수 필드 누락은 치명적 에러입니다.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CollectorError::Event(e.to_string()))
    }

    /// 수집 대상 리전 목록. 비어 있으면 전체 리전을 의미합니다.
    pub fn target_regions(&self) -> Vec<String> {
        parse_region_list(&self.detail.response_elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event() {
        let event = RunEvent::parse(
            r#"{
                "region": "us-east-2",
                "detail": {"responseElements": "us-east-1, us-west-2", "eventName": "GatherSpotPrices"}
            }"#,
        )
        .unwrap();

        assert_eq!(event.region, "us-east-2");
        assert_eq!(event.detail.event_name, "GatherSpotPrices");
        assert_eq!(event.target_regions(), vec!["us-east-1", "us-west-2"]);
    }

    #[test]
    fn test_missing_detail_is_fatal() {
        let err = RunEvent::parse(r#"{"region": "us-east-2"}"#).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("detail"));
    }

    #[test]
    fn test_empty_response_elements_means_all_regions() {
        let event = RunEvent::parse(
            r#"{"region": "us-east-2", "detail": {"responseElements": "", "eventName": "x"}}"#,
        )
        .unwrap();
        assert!(event.target_regions().is_empty());
    }
}
