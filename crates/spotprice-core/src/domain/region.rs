//! 리전 카탈로그와 AvailabilityZone → 리전 매핑.

use async_trait::async_trait;
use tracing::warn;

use crate::error::{SpotError, SpotResult};

/// 기본 AWS 리전 코드 목록.
pub const AWS_REGION_CODES: &[&str] = &[
    "ap-south-1",
    "eu-north-1",
    "eu-west-3",
    "eu-west-2",
    "eu-west-1",
    "ap-northeast-3",
    "ap-northeast-2",
    "ap-northeast-1",
    "sa-east-1",
    "ca-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "eu-central-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

/// 리전 코드 목록 제공자 trait.
#[async_trait]
pub trait RegionCatalog: Send + Sync {
    /// 사용 가능한 리전 코드 목록을 조회합니다.
    async fn list_regions(&self) -> SpotResult<Vec<String>>;
}

/// 고정 목록 기반 리전 카탈로그.
#[derive(Debug, Clone)]
pub struct StaticRegionCatalog {
    regions: Vec<String>,
}

impl StaticRegionCatalog {
    pub fn new(regions: Vec<String>) -> Self {
        Self { regions }
    }

    /// 기본 AWS 리전 목록.
    pub fn aws_default() -> Self {
        Self::new(AWS_REGION_CODES.iter().map(|r| r.to_string()).collect())
    }

    /// 쉼표로 구분된 목록에서 생성합니다 (예: "us-east-1,eu-west-1").
    pub fn from_csv(csv: &str) -> Self {
        Self::new(parse_region_list(csv))
    }
}

impl Default for StaticRegionCatalog {
    fn default() -> Self {
        Self::aws_default()
    }
}

#[async_trait]
impl RegionCatalog for StaticRegionCatalog {
    async fn list_regions(&self) -> SpotResult<Vec<String>> {
        if self.regions.is_empty() {
            return Err(SpotError::Catalog("region catalog is empty".to_string()));
        }
        Ok(self.regions.clone())
    }
}

/// 쉼표로 구분된 리전 목록을 파싱합니다. 빈 항목은 무시합니다.
pub fn parse_region_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// AvailabilityZone을 리전 코드로 매핑합니다.
///
/// 카탈로그 순서대로 zone 문자열에 포함된 첫 번째 리전 코드가 선택됩니다.
/// 둘 이상의 코드가 매칭되면 경고를 남깁니다.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    regions: Vec<String>,
}

impl RegionResolver {
    pub fn new(regions: Vec<String>) -> Self {
        Self { regions }
    }

    /// 카탈로그에서 리전 목록을 한 번 조회해 생성합니다.
    pub async fn from_catalog(catalog: &dyn RegionCatalog) -> SpotResult<Self> {
        Ok(Self::new(catalog.list_regions().await?))
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// zone 문자열에 대응하는 리전 코드를 반환합니다.
    pub fn resolve(&self, availability_zone: &str) -> SpotResult<&str> {
        let mut matches = self
            .regions
            .iter()
            .filter(|code| availability_zone.contains(code.as_str()));

        let first = matches
            .next()
            .ok_or_else(|| SpotError::NoRegionMatch(availability_zone.to_string()))?;

        if let Some(other) = matches.next() {
            warn!(
                availability_zone = availability_zone,
                chosen = %first,
                also_matched = %other,
                "ambiguous region match, using catalog order"
            );
        }

        Ok(first.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_zone() {
        let resolver = RegionResolver::new(
            AWS_REGION_CODES.iter().map(|r| r.to_string()).collect(),
        );

        assert_eq!(resolver.resolve("us-east-1a").unwrap(), "us-east-1");
        assert_eq!(resolver.resolve("us-east-2c").unwrap(), "us-east-2");
        assert_eq!(resolver.resolve("ap-northeast-3a").unwrap(), "ap-northeast-3");
    }

    #[test]
    fn test_resolve_unknown_zone() {
        let resolver = RegionResolver::new(vec!["us-east-1".to_string()]);
        let err = resolver.resolve("mars-north-1a").unwrap_err();
        assert!(matches!(err, SpotError::NoRegionMatch(zone) if zone == "mars-north-1a"));
    }

    #[test]
    fn test_first_match_wins_in_catalog_order() {
        let resolver = RegionResolver::new(vec!["us-east-1".to_string(), "us-east".to_string()]);
        assert_eq!(resolver.resolve("us-east-1b").unwrap(), "us-east-1");

        let reversed = RegionResolver::new(vec!["us-east".to_string(), "us-east-1".to_string()]);
        assert_eq!(reversed.resolve("us-east-1b").unwrap(), "us-east");
    }

    #[test]
    fn test_parse_region_list() {
        assert_eq!(
            parse_region_list(" us-east-1, eu-west-1 ,,"),
            vec!["us-east-1".to_string(), "eu-west-1".to_string()]
        );
        assert!(parse_region_list("").is_empty());
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let catalog = StaticRegionCatalog::aws_default();
        let regions = catalog.list_regions().await.unwrap();
        assert_eq!(regions.len(), 17);

        let resolver = RegionResolver::from_catalog(&catalog).await.unwrap();
        assert_eq!(resolver.regions().len(), 17);

        let empty = StaticRegionCatalog::from_csv("");
        assert!(empty.list_regions().await.unwrap_err().is_fatal());
    }
}
