//! 저장소 사용량 그룹 리포트 테스트
//!
//! 17개 리전 기준 용량(GB)으로 그룹 합계, 비율, 실행 시간 배분을 검증합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spotprice_collector::modules::{RegionGroup, RegionUsage, RuntimeBudget, StorageReport};

fn fixture() -> Vec<RegionUsage> {
    [
        ("ap-south-1", dec!(2.57)),
        ("eu-north-1", dec!(0)),
        ("eu-west-1", dec!(11.04)),
        ("eu-west-2", dec!(1.33)),
        ("eu-west-3", dec!(0.01)),
        ("ap-northeast-1", dec!(7.44)),
        ("ap-northeast-2", dec!(2.78)),
        ("ap-northeast-3", dec!(0.0)),
        ("ca-central-1", dec!(1.12)),
        ("sa-east-1", dec!(5.52)),
        ("ap-southeast-1", dec!(7.68)),
        ("ap-southeast-2", dec!(6.34)),
        ("eu-central-1", dec!(7.02)),
        ("us-east-1", dec!(34.51)),
        ("us-east-2", dec!(2.03)),
        ("us-west-1", dec!(7.45)),
        ("us-west-2", dec!(18.88)),
    ]
    .into_iter()
    .map(|(region, gigabytes)| RegionUsage {
        region: region.to_string(),
        gigabytes,
    })
    .collect()
}

#[test]
fn test_na_east_is_us_east_1_alone() {
    let report = StorageReport::new("spot-history", fixture(), RuntimeBudget::default());
    let na_east = report.group(RegionGroup::NorthAmericaEast).unwrap();
    assert_eq!(na_east.gigabytes, dec!(34.51));
}

#[test]
fn test_group_totals_and_percentages() {
    let report = StorageReport::new("spot-history", fixture(), RuntimeBudget::default());
    assert_eq!(report.total_gb(), dec!(115.72));

    let expected = [
        (RegionGroup::NorthAsiaSouthAmerica, dec!(15.74), dec!(13.60), dec!(3)),
        (RegionGroup::SouthAsiaPacific, dec!(16.59), dec!(14.34), dec!(3)),
        (RegionGroup::Europe, dec!(19.40), dec!(16.76), dec!(4)),
        (RegionGroup::NorthAmericaWest, dec!(29.48), dec!(25.48), dec!(6)),
        (RegionGroup::NorthAmericaEast, dec!(34.51), dec!(29.82), dec!(7)),
    ];
    for (group, gb, percent, minutes) in expected {
        let total = report.group(group).unwrap();
        assert_eq!(total.gigabytes, gb, "{:?}", group);
        assert_eq!(total.percent, percent, "{:?}", group);
        assert_eq!(total.runtime_minutes, minutes, "{:?}", group);
    }

    let sum: Decimal = report.groups.iter().map(|g| g.percent).sum();
    assert!((sum - dec!(100)).abs() <= dec!(0.01));
}

#[test]
fn test_render_contains_groups() {
    let report = StorageReport::new("spot-history", fixture(), RuntimeBudget::default());
    let text = report.render().unwrap();

    assert!(text.contains("TOTAL All Regions: 115.72 GB"));
    assert!(text.contains("Group 5 (NA East): 34.51 GB (29.82%)"));
    assert!(text.contains("17 minutes average + 5 minutes buffer"));
}
