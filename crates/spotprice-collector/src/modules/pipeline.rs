//! 실행 파이프라인: 조회 → 파티션 → 동시 적재 → 조인 → 아카이브 → 요약/알림.

use std::sync::Arc;
use std::time::Instant;

use spotprice_core::{
    instance_type_averages, PriceRecord, RegionCatalog, RegionResolver, SpotError, TimeWindow,
};
use spotprice_notification::NotificationManager;
use tokio_util::sync::CancellationToken;

use super::archive::{ArchiveUploader, UploadStatus};
use super::fetch::PriceFetcher;
use super::summary::{report_and_notify, SummaryReport};
use super::table_load::LoaderPool;
use crate::sources::PriceHistorySource;
use crate::storage::{ObjectStore, PriceTable};
use crate::Result;

/// 외부 협력자 묶음
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn PriceHistorySource>,
    pub catalog: Arc<dyn RegionCatalog>,
    pub table: Arc<dyn PriceTable>,
    pub store: Arc<dyn ObjectStore>,
    pub notifier: Arc<NotificationManager>,
}

/// 실행 요청
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// 대상 리전 (비어 있으면 카탈로그 전체)
    pub regions: Vec<String>,
    pub window: TimeWindow,
    pub partitions: usize,
    pub bucket: String,
}

/// 실행 결과
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: SummaryReport,
    pub records: usize,
    /// 요약 리포트 생성/알림 단계 성공 여부
    pub reported: bool,
    /// 종료 신호로 중단되었는지 여부
    pub interrupted: bool,
}

/// 파이프라인을 한 번 실행합니다.
///
/// 치명적 에러는 잘못된 파티션 수와 리전 카탈로그 조회 실패뿐이며,
/// 리전/레코드 단위 실패는 요약에 집계됩니다.
pub async fn run(
    collab: &Collaborators,
    request: &RunRequest,
    shutdown: &CancellationToken,
) -> Result<RunSummary> {
    if request.partitions == 0 {
        return Err(SpotError::InvalidArgument("partition count must be >= 1".to_string()).into());
    }

    let started = Instant::now();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        start = %request.window.start(),
        end = %request.window.end(),
        partitions = request.partitions,
        "<-- SPOTPRICE RETRIEVER START -->"
    );

    let resolver = Arc::new(RegionResolver::from_catalog(collab.catalog.as_ref()).await?);

    let fetcher = PriceFetcher::new(collab.source.as_ref(), collab.catalog.as_ref());
    let fetched = fetcher.fetch(&request.regions, &request.window).await?;
    let fetch_failures = fetched.failed_regions();

    let records: Arc<[PriceRecord]> = fetched.records().into();
    let instance_types = instance_type_averages(&records);

    let pool = LoaderPool::spawn(
        Arc::clone(&records),
        request.partitions,
        Arc::clone(&collab.table),
        resolver,
        request.window,
        shutdown,
    )?;
    let outcomes = pool.join().await;

    let interrupted = shutdown.is_cancelled();
    let uploads = if interrupted {
        tracing::warn!("종료 신호 수신, 아카이브 업로드 건너뜀");
        UploadStatus::new()
    } else {
        ArchiveUploader::new(collab.store.as_ref(), &request.bucket)
            .upload_all(&fetched.regions, &fetch_failures, &request.window)
            .await
    };

    let report = SummaryReport::new(outcomes, uploads)
        .with_fetch_failures(fetch_failures)
        .with_instance_types(instance_types);
    let reported = report_and_notify(&report, &collab.notifier).await;

    tracing::info!(
        records = records.len(),
        elapsed = format!("{:.1}s", started.elapsed().as_secs_f64()),
        "파이프라인 완료"
    );

    Ok(RunSummary {
        report,
        records: records.len(),
        reported,
        interrupted,
    })
}
