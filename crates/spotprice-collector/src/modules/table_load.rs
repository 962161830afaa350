//! 파티션 단위 테이블 동시 적재.
//!
//! 파티션마다 [`TableLoader`] 하나가 tokio 태스크로 실행되며,
//! 모든 워커는 같은 `Arc<[PriceRecord]>`를 공유하고 서로 겹치지 않는 인덱스 범위만 읽습니다.
//!
//! 로더 상태: `Idle → Running → {Completed | Stopped}`.
//! `Stopped`는 [`TableLoader::stop`] 호출로만 진입하며, 두 종료 상태 모두 재시작할 수 없습니다.

use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use spotprice_core::{partition_ranges, PriceItem, PriceRecord, RegionResolver, SpotError, TimeWindow};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::stats::LoadResult;
use crate::storage::PriceTable;
use crate::Result;

/// 로더 생명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoaderState {
    Idle = 0,
    Running = 1,
    Completed = 2,
    Stopped = 3,
}

impl LoaderState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Stopped,
            _ => Self::Idle,
        }
    }

    /// 종료 상태 여부
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        }
    }
}

/// 파티션 하나를 적재하는 워커.
///
/// 복제본은 같은 취소 토큰과 상태를 공유하므로, 한쪽을 태스크로 보내고
/// 다른 쪽으로 `stop()`/`state()`를 호출할 수 있습니다.
#[derive(Clone)]
pub struct TableLoader {
    id: usize,
    table: Arc<dyn PriceTable>,
    resolver: Arc<RegionResolver>,
    cancel: CancellationToken,
    state: Arc<AtomicU8>,
}

impl TableLoader {
    pub fn new(
        id: usize,
        table: Arc<dyn PriceTable>,
        resolver: Arc<RegionResolver>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            table,
            resolver,
            cancel,
            state: Arc::new(AtomicU8::new(LoaderState::Idle as u8)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> LoaderState {
        LoaderState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// 협력적 중지. 진행 중인 레코드를 마친 뒤 루프를 빠져나옵니다.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    fn set_state(&self, state: LoaderState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// 파티션을 적재합니다.
    ///
    /// 리전 매칭 실패와 테이블 쓰기 실패는 `failed`로 집계하고 다음 레코드로 진행합니다.
    /// 빈 파티션은 테이블을 호출하지 않고 즉시 완료됩니다.
    pub async fn load(&self, partition: &[PriceRecord], window: &TimeWindow) -> Result<LoadResult> {
        self.state
            .compare_exchange(
                LoaderState::Idle as u8,
                LoaderState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|current| {
                SpotError::InvalidArgument(format!(
                    "loader {} cannot restart from state {}",
                    self.id,
                    LoaderState::from_u8(current).as_str()
                ))
            })?;

        let started = Instant::now();
        let record_date = window.record_date();
        let mut result = LoadResult::new();

        tracing::debug!(partition = self.id, records = partition.len(), "파티션 적재 시작");

        for (idx, record) in partition.iter().enumerate() {
            if self.cancel.is_cancelled() {
                result.skipped = partition.len() - idx;
                result.elapsed = started.elapsed();
                self.set_state(LoaderState::Stopped);
                tracing::warn!(
                    partition = self.id,
                    skipped = result.skipped,
                    "중지 요청으로 적재 중단"
                );
                return Ok(result);
            }

            let region = match self.resolver.resolve(&record.availability_zone) {
                Ok(region) => region,
                Err(e) => {
                    result.failed += 1;
                    tracing::warn!(
                        partition = self.id,
                        availability_zone = %record.availability_zone,
                        error = %e,
                        "리전 매칭 실패, 레코드 건너뜀"
                    );
                    continue;
                }
            };

            let item = PriceItem::from_record(record, region, record_date);
            match self.table.upsert(&item).await {
                Ok(()) => result.written += 1,
                Err(e) => {
                    result.failed += 1;
                    tracing::error!(
                        partition = self.id,
                        timestamp = %item.timestamp,
                        spot_price = %item.spot_price,
                        error = %e,
                        "테이블 쓰기 실패"
                    );
                }
            }
        }

        result.elapsed = started.elapsed();
        self.set_state(LoaderState::Completed);
        Ok(result)
    }
}

/// 워커 하나의 최종 결과
#[derive(Debug, Clone, Copy)]
pub struct PartitionOutcome {
    pub index: usize,
    pub records: usize,
    pub result: LoadResult,
    pub state: LoaderState,
}

/// 고정 개수 워커 풀.
pub struct LoaderPool {
    loaders: Vec<TableLoader>,
    ranges: Vec<Range<usize>>,
    handles: Vec<JoinHandle<Result<LoadResult>>>,
}

impl LoaderPool {
    /// 레코드를 `partitions`개로 나눠 파티션마다 태스크 하나를 시작합니다.
    ///
    /// 각 워커의 취소 토큰은 `shutdown`의 자식이므로 상위 종료 신호가 전파됩니다.
    pub fn spawn(
        records: Arc<[PriceRecord]>,
        partitions: usize,
        table: Arc<dyn PriceTable>,
        resolver: Arc<RegionResolver>,
        window: TimeWindow,
        shutdown: &CancellationToken,
    ) -> Result<Self> {
        let ranges = partition_ranges(records.len(), partitions)?;
        let mut loaders = Vec::with_capacity(ranges.len());
        let mut handles = Vec::with_capacity(ranges.len());

        for (index, range) in ranges.iter().cloned().enumerate() {
            let loader = TableLoader::new(
                index,
                Arc::clone(&table),
                Arc::clone(&resolver),
                shutdown.child_token(),
            );
            let worker = loader.clone();
            let shared = Arc::clone(&records);

            handles.push(tokio::spawn(async move {
                worker.load(&shared[range], &window).await
            }));
            loaders.push(loader);
        }

        tracing::info!(
            partitions = partitions,
            records = records.len(),
            "적재 워커 시작"
        );

        Ok(Self {
            loaders,
            ranges,
            handles,
        })
    }

    /// 모든 워커에 중지를 요청합니다.
    pub fn stop_all(&self) {
        for loader in &self.loaders {
            loader.stop();
        }
    }

    /// 모든 워커가 끝날 때까지 기다립니다.
    ///
    /// 태스크가 패닉하거나 에러를 반환하면 해당 파티션의 모든 레코드를 실패로 집계합니다.
    pub async fn join(self) -> Vec<PartitionOutcome> {
        let joined = join_all(self.handles).await;

        joined
            .into_iter()
            .zip(self.loaders.iter().zip(self.ranges))
            .map(|(joined, (loader, range))| {
                let records = range.len();
                let result = match joined {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        tracing::error!(partition = loader.id(), error = %e, "파티션 적재 실패");
                        LoadResult {
                            failed: records,
                            ..Default::default()
                        }
                    }
                    Err(e) => {
                        tracing::error!(partition = loader.id(), error = %e, "워커 태스크 비정상 종료");
                        LoadResult {
                            failed: records,
                            ..Default::default()
                        }
                    }
                };
                result.log_summary(loader.id());

                PartitionOutcome {
                    index: loader.id(),
                    records,
                    result,
                    state: loader.state(),
                }
            })
            .collect()
    }
}
