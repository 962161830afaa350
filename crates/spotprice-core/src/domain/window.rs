//! 수집 시간 구간.
//!
//! 기본 구간은 `[어제 자정, 오늘 자정)`이며, 구간의 종료 날짜가
//! 해당 실행에서 적재되는 모든 레코드의 `RecordDate`가 됩니다.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SpotError, SpotResult};

/// 아카이브 키에 쓰는 UTC 형식
pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 사람이 읽는 표준 형식
pub const STANDARD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 반열린 구간 `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// 기본 수집 기간 (일)
    pub const DEFAULT_DURATION_DAYS: u32 = 1;

    /// 구간을 생성합니다. `start < end`가 아니면 실패합니다.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> SpotResult<Self> {
        if start >= end {
            return Err(SpotError::InvalidArgument(format!(
                "time window start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// `today` 자정에 끝나는 `duration_days`일 구간.
    pub fn ending_on(today: NaiveDate, duration_days: u32) -> SpotResult<Self> {
        if duration_days == 0 {
            return Err(SpotError::InvalidArgument(
                "duration_days must be >= 1".to_string(),
            ));
        }

        let end = today
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| SpotError::InvalidArgument(format!("invalid date {}", today)))?;
        let start = end
            .checked_sub_signed(Duration::days(i64::from(duration_days)))
            .ok_or_else(|| {
                SpotError::InvalidArgument(format!("duration_days {} out of range", duration_days))
            })?;

        Self::new(start, end)
    }

    /// 현재 UTC 날짜 기준 기본 구간.
    pub fn default_endpoints(duration_days: u32) -> SpotResult<Self> {
        Self::ending_on(Utc::now().date_naive(), duration_days)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// 이 실행의 적재 날짜 태그
    pub fn record_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// 아카이브 파일명 접두어: `<start>_<end>`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", utc_datetime(&self.start), utc_datetime(&self.end))
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ` 형식 문자열.
pub fn utc_datetime(dt: &NaiveDateTime) -> String {
    dt.format(UTC_FORMAT).to_string()
}

/// `YYYY-MM-DD HH:MM:SS` 형식 문자열.
pub fn standardize_datetime(dt: &NaiveDateTime) -> String {
    dt.format(STANDARD_FORMAT).to_string()
}

/// [`standardize_datetime`] 형식을 다시 파싱합니다 (타임존 없음).
pub fn parse_standard(s: &str) -> SpotResult<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, STANDARD_FORMAT)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_one_day_window() {
        let window = TimeWindow::ending_on(date(2024, 3, 1), 1).unwrap();

        assert_eq!(window.end(), date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(window.start(), date(2024, 2, 29).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(window.duration(), Duration::days(1));
        assert_eq!(window.record_date(), date(2024, 3, 1));
    }

    #[test]
    fn test_default_endpoints_today() {
        let window = TimeWindow::default_endpoints(TimeWindow::DEFAULT_DURATION_DAYS).unwrap();
        let today = Utc::now().date_naive();

        // 자정 직전에 실행되면 날짜가 바뀔 수 있으므로 어제/오늘 모두 허용
        let end_date = window.end().date();
        assert!(end_date == today || end_date.succ_opt() == Some(today));
        assert_eq!(
            window.end().time(),
            chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(window.duration(), Duration::days(1));
    }

    #[test]
    fn test_multi_day_window() {
        let window = TimeWindow::ending_on(date(2024, 1, 3), 7).unwrap();
        assert_eq!(window.start().date(), date(2023, 12, 27));
        assert!(window.start() < window.end());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = TimeWindow::ending_on(date(2024, 1, 3), 0).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let a = date(2024, 1, 3).and_hms_opt(0, 0, 0).unwrap();
        let b = date(2024, 1, 2).and_hms_opt(0, 0, 0).unwrap();
        assert!(TimeWindow::new(a, b).is_err());
        assert!(TimeWindow::new(a, a).is_err());
    }

    #[test]
    fn test_formatting() {
        let window = TimeWindow::ending_on(date(2024, 3, 1), 1).unwrap();
        assert_eq!(window.file_stem(), "2024-02-29T00:00:00Z_2024-03-01T00:00:00Z");
        assert_eq!(standardize_datetime(&window.end()), "2024-03-01 00:00:00");
        assert_eq!(parse_standard("2024-03-01 00:00:00").unwrap(), window.end());
        assert!(parse_standard("2024-03-01T00:00:00Z").is_err());
    }
}
