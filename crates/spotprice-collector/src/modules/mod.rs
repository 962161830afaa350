//! 파이프라인 단계 모듈.

pub mod archive;
pub mod fetch;
pub mod pipeline;
pub mod region_groups;
pub mod status_query;
pub mod summary;
pub mod table_load;

pub use archive::{archive_key, encode_archive, format_pricefile, ArchiveUploader, UploadStatus};
pub use fetch::{FetchOutcome, PriceFetcher, RegionPrices};
pub use pipeline::{run, Collaborators, RunRequest, RunSummary};
pub use region_groups::{
    bytes_to_gb, group_totals, keyspace_usage, GroupTotal, RegionGroup, RegionUsage,
    RuntimeBudget, StorageReport,
};
pub use status_query::{StatusMap, StatusQuery};
pub use summary::{report_and_notify, SummaryReport};
pub use table_load::{LoaderPool, LoaderState, PartitionOutcome, TableLoader};
