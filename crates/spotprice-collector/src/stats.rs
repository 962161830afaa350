//! 파티션 적재 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 파티션 하나의 적재 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResult {
    /// 테이블에 기록된 레코드 수
    pub written: usize,
    /// 리전 매칭 실패 또는 쓰기 실패로 건너뛴 레코드 수
    pub failed: usize,
    /// 중지 요청으로 시도하지 않은 레코드 수
    pub skipped: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl LoadResult {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 시도한 레코드 수
    pub fn processed(&self) -> usize {
        self.written + self.failed
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.processed() == 0 {
            0.0
        } else {
            (self.written as f64 / self.processed() as f64) * 100.0
        }
    }

    /// 다른 결과를 합산합니다.
    pub fn merge(&mut self, other: &LoadResult) {
        self.written += other.written;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.elapsed = self.elapsed.max(other.elapsed);
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, partition: usize) {
        tracing::info!(
            partition = partition,
            written = self.written,
            failed = self.failed,
            skipped = self.skipped,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "파티션 적재 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let empty = LoadResult::new();
        assert_eq!(empty.success_rate(), 0.0);

        let result = LoadResult {
            written: 3,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(result.processed(), 4);
        assert!((result.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge() {
        let mut total = LoadResult {
            written: 2,
            elapsed: Duration::from_secs(1),
            ..Default::default()
        };
        total.merge(&LoadResult {
            written: 1,
            failed: 1,
            skipped: 4,
            elapsed: Duration::from_secs(3),
        });

        assert_eq!(total.written, 3);
        assert_eq!(total.failed, 1);
        assert_eq!(total.skipped, 4);
        assert_eq!(total.elapsed, Duration::from_secs(3));
    }
}
