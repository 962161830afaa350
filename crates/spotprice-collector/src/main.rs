//! EC2 spot price retriever CLI.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use spotprice_collector::modules::{self, Collaborators, RunRequest, RuntimeBudget, StatusQuery};
use spotprice_collector::sources::{HttpPriceSource, PriceHistorySource, StaticPriceSource};
use spotprice_collector::storage::{
    HttpObjectStore, LocalObjectStore, MemoryObjectStore, MemoryPriceTable, ObjectStore,
    PgPriceTable, PgStatusTable, PriceTable,
};
use spotprice_collector::{CollectorConfig, CollectorError, RunEvent};
use spotprice_core::{
    init_logging, parse_region_list, LogConfig, RegionCatalog, StaticRegionCatalog, TimeWindow,
};
use spotprice_notification::{LogSender, NotificationManager, WebhookConfig, WebhookSender};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "spotprice-collector")]
#[command(about = "EC2 Spot Price Retriever", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 가격 이력 조회 → 테이블 적재 → 아카이브 → 요약 알림
    Run {
        /// 대상 리전 (쉼표로 구분, 예: "us-east-1,eu-west-1"). 생략 시 전체 리전
        #[arg(long, conflicts_with = "event")]
        regions: Option<String>,

        /// 트리거 이벤트 JSON 파일
        #[arg(long)]
        event: Option<std::path::PathBuf>,

        /// 적재 워커 수 (기본: PARTITION_COUNT)
        #[arg(long)]
        partitions: Option<usize>,

        /// 수집 기간 일수 (기본: DEFAULT_DURATION)
        #[arg(long)]
        duration_days: Option<u32>,

        /// 외부 저장소 없이 메모리 저장소로 실행
        #[arg(long)]
        dry_run: bool,
    },

    /// 상태 테이블 조회
    Status {
        /// 파티션 키 값
        #[arg(long)]
        value: String,

        /// 리전 필터
        #[arg(long)]
        region: Option<String>,
    },

    /// 아카이브 버킷의 리전별 저장 용량 리포트
    StorageReport {
        /// 버킷 이름 (기본: S3_BUCKET)
        #[arg(long)]
        bucket: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 설정 로드 (.env 포함, LOG_FORMAT보다 먼저)
    let config = CollectorConfig::from_env()?;

    // 로깅 초기화
    init_logging(LogConfig::new(cli.log_level.clone()).with_env_format())
        .map_err(|e| anyhow::anyhow!("logging init failed: {}", e))?;
    config.log_status();

    let catalog: Arc<dyn RegionCatalog> = Arc::new(match &config.region_codes {
        Some(csv) => StaticRegionCatalog::from_csv(csv),
        None => StaticRegionCatalog::aws_default(),
    });

    match cli.command {
        Commands::Run {
            regions,
            event,
            partitions,
            duration_days,
            dry_run,
        } => {
            let regions = match (regions, event) {
                (Some(csv), _) => parse_region_list(&csv),
                (None, Some(path)) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading event {}", path.display()))?;
                    if config.debug_mode {
                        tracing::info!(event = %raw, "트리거 이벤트 수신");
                    }
                    let event = RunEvent::parse(&raw)?;
                    tracing::info!(
                        event_region = %event.region,
                        event_name = %event.detail.event_name,
                        "이벤트 파싱 완료"
                    );
                    event.target_regions()
                }
                (None, None) => Vec::new(),
            };

            let window = TimeWindow::default_endpoints(duration_days.unwrap_or(config.duration_days))?;
            let bucket = if dry_run {
                config.bucket.clone().unwrap_or_else(|| "dry-run".to_string())
            } else {
                config.require_bucket()?.to_string()
            };

            let notifier = Arc::new(build_notifier(&config));
            let collab = Collaborators {
                source: build_source(&config, dry_run)?,
                catalog,
                table: build_table(&config, dry_run).await?,
                store: build_store(&config, dry_run)?,
                notifier: Arc::clone(&notifier),
            };
            let request = RunRequest {
                regions,
                window,
                partitions: partitions.unwrap_or(config.partitions),
                bucket,
            };

            let shutdown = CancellationToken::new();
            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("종료 신호 수신, 워커 중지 요청");
                    signal_token.cancel();
                }
            });

            match modules::run(&collab, &request, &shutdown).await {
                Ok(summary) => {
                    let totals = summary.report.totals();
                    tracing::info!(
                        records = summary.records,
                        written = totals.written,
                        failed = totals.failed,
                        interrupted = summary.interrupted,
                        "<-- SPOTPRICE RETRIEVER END -->"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, fatal = e.is_fatal(), "실행 실패");
                    if let Err(notify_err) =
                        notifier.notify_system_error("RUN_FAILED", &e.to_string()).await
                    {
                        tracing::error!(error = %notify_err, "오류 알림 전송 실패");
                    }
                    return Err(e.into());
                }
            }
        }
        Commands::Status { value, region } => {
            let pool = connect(&config).await?;
            let table = Arc::new(PgStatusTable::new(pool.clone(), &config.status_table)?);
            let mut query = StatusQuery::new(table);

            let statuses = query.get(&value, region.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&statuses)?);
            pool.close().await;
        }
        Commands::StorageReport { bucket } => {
            let bucket = match bucket {
                Some(b) => b,
                None => config.require_bucket()?.to_string(),
            };
            let dir = config.archive_dir.clone().ok_or_else(|| {
                CollectorError::Config("ARCHIVE_DIR is required for storage-report".to_string())
            })?;
            let store = LocalObjectStore::new(dir);

            let regions = catalog.list_regions().await?;
            let usage = modules::keyspace_usage(&store, &bucket, &regions).await?;
            let report = modules::StorageReport::new(bucket, usage, RuntimeBudget::default());
            println!("{}", report.render()?);
        }
    }

    Ok(())
}

fn build_notifier(config: &CollectorConfig) -> NotificationManager {
    let mut manager = NotificationManager::new();
    if let Some(url) = &config.notify_webhook_url {
        let webhook = WebhookConfig {
            timeout: config.http_timeout(),
            ..WebhookConfig::new(url.clone(), config.sns_topic_arn.clone().unwrap_or_default())
        }
        .with_enabled(config.notify_enabled);
        manager.add_sender(WebhookSender::new(webhook));
    }
    // Webhook이 없거나 꺼져 있으면 로그로 남김
    if manager.enabled_count() == 0 {
        manager.add_sender(LogSender);
    }
    manager
}

fn build_source(
    config: &CollectorConfig,
    dry_run: bool,
) -> Result<Arc<dyn PriceHistorySource>, CollectorError> {
    match (&config.price_api_url, dry_run) {
        (Some(url), _) => Ok(Arc::new(HttpPriceSource::new(
            url.clone(),
            config.page_size,
            config.http_timeout(),
        )?)),
        (None, true) => Ok(Arc::new(StaticPriceSource::new())),
        (None, false) => Err(CollectorError::Config("PRICE_API_URL is not set".to_string())),
    }
}

async fn build_table(
    config: &CollectorConfig,
    dry_run: bool,
) -> Result<Arc<dyn PriceTable>, CollectorError> {
    if dry_run {
        return Ok(Arc::new(MemoryPriceTable::new()));
    }
    let pool = connect(config).await?;
    let table = PgPriceTable::new(pool, &config.table_name)?;
    table.ensure_schema().await?;
    Ok(Arc::new(table))
}

fn build_store(
    config: &CollectorConfig,
    dry_run: bool,
) -> Result<Arc<dyn ObjectStore>, CollectorError> {
    if let Some(dir) = &config.archive_dir {
        return Ok(Arc::new(LocalObjectStore::new(dir.clone())));
    }
    if let Some(url) = &config.object_store_url {
        return Ok(Arc::new(HttpObjectStore::new(url.clone(), config.http_timeout())?));
    }
    if dry_run {
        return Ok(Arc::new(MemoryObjectStore::new()));
    }
    Err(CollectorError::Config(
        "ARCHIVE_DIR or OBJECT_STORE_URL must be set".to_string(),
    ))
}

async fn connect(config: &CollectorConfig) -> Result<sqlx::PgPool, CollectorError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| CollectorError::Config("DATABASE_URL is not set".to_string()))?;
    let pool = sqlx::PgPool::connect(url).await?;
    tracing::info!("데이터베이스 연결 성공");
    Ok(pool)
}
