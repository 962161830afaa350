//! 아카이브 저장소 사용량 리포트.
//!
//! 리전 접두어별 객체 크기를 합산하고(GB = bytes / 1000 / 1024 / 1024, 소수 둘째 자리),
//! 5개 지리 그룹으로 묶어 그룹별 합계, 비율, 실행 시간 예산 배분을 계산합니다.

use std::fmt::{self, Write};

use rust_decimal::Decimal;

use crate::storage::ObjectStore;
use crate::Result;

/// 지리 기준 리전 그룹
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionGroup {
    NorthAsiaSouthAmerica,
    SouthAsiaPacific,
    Europe,
    NorthAmericaWest,
    NorthAmericaEast,
}

impl RegionGroup {
    pub const ALL: [RegionGroup; 5] = [
        Self::NorthAsiaSouthAmerica,
        Self::SouthAsiaPacific,
        Self::Europe,
        Self::NorthAmericaWest,
        Self::NorthAmericaEast,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NorthAsiaSouthAmerica => "North Asia + South America",
            Self::SouthAsiaPacific => "South Asia Pacific",
            Self::Europe => "Europe",
            Self::NorthAmericaWest => "NA West",
            Self::NorthAmericaEast => "NA East",
        }
    }

    pub fn members(&self) -> &'static [&'static str] {
        match self {
            Self::NorthAsiaSouthAmerica => {
                &["ap-northeast-1", "ap-northeast-2", "ap-northeast-3", "sa-east-1"]
            }
            Self::SouthAsiaPacific => &["ap-south-1", "ap-southeast-1", "ap-southeast-2"],
            Self::Europe => &["eu-north-1", "eu-central-1", "eu-west-1", "eu-west-2", "eu-west-3"],
            Self::NorthAmericaWest => &["ca-central-1", "us-west-1", "us-west-2", "us-east-2"],
            Self::NorthAmericaEast => &["us-east-1"],
        }
    }

    pub fn for_region(region: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.members().contains(&region))
    }
}

/// 실행 시간 예산 (분)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeBudget {
    /// 전체 리전 평균 실행 시간
    pub average_minutes: u32,
    /// 적재 완료를 위한 여유 시간
    pub buffer_minutes: u32,
}

impl Default for RuntimeBudget {
    fn default() -> Self {
        Self {
            average_minutes: 17,
            buffer_minutes: 5,
        }
    }
}

impl RuntimeBudget {
    pub fn total_minutes(&self) -> u32 {
        self.average_minutes + self.buffer_minutes
    }
}

/// 리전 하나의 저장 용량
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUsage {
    pub region: String,
    pub gigabytes: Decimal,
}

/// 그룹 합계
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTotal {
    pub group: RegionGroup,
    pub gigabytes: Decimal,
    pub percent: Decimal,
    pub runtime_minutes: Decimal,
}

/// 바이트를 GB로 변환합니다 (소수 둘째 자리).
pub fn bytes_to_gb(bytes: u64) -> Decimal {
    (Decimal::from(bytes) / Decimal::from(1000) / Decimal::from(1024) / Decimal::from(1024))
        .round_dp(2)
}

/// 그룹별 합계, 비율, 실행 시간 배분을 계산합니다.
///
/// 어느 그룹에도 속하지 않는 리전은 합계에서 제외됩니다.
pub fn group_totals(usage: &[RegionUsage], budget: RuntimeBudget) -> Vec<GroupTotal> {
    let sums: Vec<(RegionGroup, Decimal)> = RegionGroup::ALL
        .into_iter()
        .map(|group| {
            let sum = usage
                .iter()
                .filter(|u| group.members().contains(&u.region.as_str()))
                .map(|u| u.gigabytes)
                .sum::<Decimal>();
            (group, sum)
        })
        .collect();

    for u in usage {
        if RegionGroup::for_region(&u.region).is_none() {
            tracing::warn!(region = %u.region, "그룹에 속하지 않는 리전, 합계에서 제외");
        }
    }

    let grand: Decimal = sums.iter().map(|(_, sum)| *sum).sum();
    let hundred = Decimal::from(100);
    let runtime = Decimal::from(budget.total_minutes());

    sums.into_iter()
        .map(|(group, gigabytes)| {
            let percent = if grand.is_zero() {
                Decimal::ZERO
            } else {
                (gigabytes / grand * hundred).round_dp(2)
            };
            GroupTotal {
                group,
                gigabytes: gigabytes.round_dp(2),
                percent,
                runtime_minutes: (runtime * percent / hundred).round_dp(0),
            }
        })
        .collect()
}

/// 리전 접두어별 저장 용량을 조회합니다.
pub async fn keyspace_usage(
    store: &dyn ObjectStore,
    bucket: &str,
    regions: &[String],
) -> Result<Vec<RegionUsage>> {
    let mut usage = Vec::with_capacity(regions.len());
    for region in regions {
        let bytes: u64 = store
            .list(bucket, region)
            .await?
            .iter()
            .map(|object| object.size)
            .sum();
        usage.push(RegionUsage {
            region: region.clone(),
            gigabytes: bytes_to_gb(bytes),
        });
    }
    Ok(usage)
}

/// 저장소 사용량 리포트
#[derive(Debug, Clone)]
pub struct StorageReport {
    pub bucket: String,
    pub usage: Vec<RegionUsage>,
    pub groups: Vec<GroupTotal>,
    pub budget: RuntimeBudget,
}

impl StorageReport {
    pub fn new(bucket: impl Into<String>, usage: Vec<RegionUsage>, budget: RuntimeBudget) -> Self {
        let groups = group_totals(&usage, budget);
        Self {
            bucket: bucket.into(),
            usage,
            groups,
            budget,
        }
    }

    pub fn total_gb(&self) -> Decimal {
        self.usage.iter().map(|u| u.gigabytes).sum::<Decimal>().round_dp(2)
    }

    pub fn group(&self, group: RegionGroup) -> Option<&GroupTotal> {
        self.groups.iter().find(|g| g.group == group)
    }

    pub fn render(&self) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "Bucket {} keyspace storage", self.bucket)?;
        writeln!(out, "    {:^16} | {:^9}", "Keyspace", "Size (GB)")?;
        writeln!(out, "    {:^16} | {:^9}", "-".repeat(16), "-".repeat(9))?;
        for u in &self.usage {
            writeln!(out, "    {:<16} | {:>9}", u.region, u.gigabytes)?;
        }
        writeln!(out, "TOTAL All Regions: {} GB", self.total_gb())?;

        writeln!(out, "Total for regions contained in each group:")?;
        for (i, g) in self.groups.iter().enumerate() {
            writeln!(
                out,
                "    Group {} ({}): {} GB ({}%)",
                i + 1,
                g.group.label(),
                g.gigabytes,
                g.percent
            )?;
        }

        writeln!(
            out,
            "Runtime budget: {} minutes average + {} minutes buffer",
            self.budget.average_minutes, self.budget.buffer_minutes
        )?;
        for (i, g) in self.groups.iter().enumerate() {
            writeln!(
                out,
                "    - Group {} ({}): {} minutes",
                i + 1,
                g.group.label(),
                g.runtime_minutes
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryObjectStore, ObjectStore};
    use rust_decimal_macros::dec;

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(0), Decimal::ZERO);
        assert_eq!(bytes_to_gb(1000 * 1024 * 1024), dec!(1));
        assert_eq!(bytes_to_gb(1_572_864_000), dec!(1.5));
    }

    #[test]
    fn test_every_group_member_resolves() {
        for group in RegionGroup::ALL {
            for region in group.members() {
                assert_eq!(RegionGroup::for_region(region), Some(group));
            }
        }
        assert_eq!(RegionGroup::for_region("me-south-1"), None);
    }

    #[test]
    fn test_empty_usage_has_zero_percent() {
        let totals = group_totals(&[], RuntimeBudget::default());
        assert_eq!(totals.len(), 5);
        assert!(totals.iter().all(|g| g.percent.is_zero()));
    }

    #[tokio::test]
    async fn test_keyspace_usage_sums_prefix() {
        let store = MemoryObjectStore::new();
        let five_mib = 5 * 1024 * 1024;
        store.put("b", "us-east-1/a.json", vec![0; five_mib]).await.unwrap();
        store.put("b", "us-east-1/b.json", vec![0; five_mib]).await.unwrap();

        let usage = keyspace_usage(
            &store,
            "b",
            &["us-east-1".to_string(), "eu-west-1".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(usage[0].gigabytes, dec!(0.01));
        assert_eq!(usage[1].gigabytes, Decimal::ZERO);
    }
}
