//! 실행 종료 요약 리포트와 알림.

use std::fmt::{self, Write};

use spotprice_core::InstanceTypeSummary;
use spotprice_notification::NotificationManager;

use super::archive::UploadStatus;
use super::table_load::PartitionOutcome;
use crate::stats::LoadResult;

/// 한 번의 실행 결과 요약
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub partitions: Vec<PartitionOutcome>,
    pub uploads: UploadStatus,
    pub fetch_failures: Vec<String>,
    pub instance_types: Vec<InstanceTypeSummary>,
    pub version: &'static str,
}

impl SummaryReport {
    pub fn new(partitions: Vec<PartitionOutcome>, uploads: UploadStatus) -> Self {
        Self {
            partitions,
            uploads,
            fetch_failures: Vec::new(),
            instance_types: Vec::new(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn with_fetch_failures(mut self, regions: Vec<String>) -> Self {
        self.fetch_failures = regions;
        self
    }

    pub fn with_instance_types(mut self, summary: Vec<InstanceTypeSummary>) -> Self {
        self.instance_types = summary;
        self
    }

    /// 전체 파티션 합계
    pub fn totals(&self) -> LoadResult {
        let mut total = LoadResult::new();
        for outcome in &self.partitions {
            total.merge(&outcome.result);
        }
        total
    }

    pub fn partition_records(&self) -> Vec<usize> {
        self.partitions.iter().map(|p| p.records).collect()
    }

    /// 사람이 읽을 수 있는 리포트 문자열
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "SPOTPRICE LOADER ENDING SUMMARY REPORT:")?;

        for outcome in &self.partitions {
            writeln!(
                out,
                "\t- Processed {} records for Partition {} (written {}, failed {}, skipped {}, {})",
                outcome.records,
                outcome.index + 1,
                outcome.result.written,
                outcome.result.failed,
                outcome.result.skipped,
                outcome.state.as_str()
            )?;
        }

        let totals = self.totals();
        writeln!(
            out,
            "Table writes: {} written, {} failed, {} skipped",
            totals.written, totals.failed, totals.skipped
        )?;

        writeln!(out, "Raw data archive upload:")?;
        for (region, uploaded) in self.uploads.entries() {
            writeln!(out, "\t- Region {} upload complete status: {}", region, uploaded)?;
        }

        if !self.fetch_failures.is_empty() {
            writeln!(out, "Fetch failures: {}", self.fetch_failures.join(", "))?;
        }

        if !self.instance_types.is_empty() {
            writeln!(out, "Average spot price by instance type:")?;
            for summary in &self.instance_types {
                writeln!(
                    out,
                    "\t- {}: {} ({} samples)",
                    summary.instance_type, summary.avg_price, summary.samples
                )?;
            }
        }

        write!(out, "<-- SPOTPRICE RETRIEVER VERSION {} END -->", self.version)?;
        Ok(out)
    }
}

/// 리포트를 로그로 남기고 알림을 전송합니다.
///
/// 포맷 실패 시 `false`를 반환하며, 알림 실패는 로그만 남깁니다.
pub async fn report_and_notify(report: &SummaryReport, notifier: &NotificationManager) -> bool {
    let rendered = match report.render() {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(error = %e, "요약 리포트 생성 실패");
            return false;
        }
    };

    for line in rendered.lines() {
        tracing::info!("{}", line);
    }

    let totals = report.totals();
    if let Err(e) = notifier
        .notify_run_summary(
            report.partition_records(),
            totals.written,
            totals.failed,
            report.uploads.uploaded().len(),
            report.uploads.failed(),
        )
        .await
    {
        tracing::error!(error = %e, "요약 알림 전송 실패");
    }

    true
}
