//! 인스턴스 타입별 가격 통계.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::PriceRecord;

/// 인스턴스 타입 하나의 가격 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTypeSummary {
    pub instance_type: String,
    pub samples: usize,
    pub avg_price: Decimal,
}

/// 인스턴스 타입별 평균 스팟 가격을 계산합니다 (타입 이름순).
pub fn instance_type_averages(records: &[PriceRecord]) -> Vec<InstanceTypeSummary> {
    let mut totals: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();

    for record in records {
        let entry = totals
            .entry(record.instance_type.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += record.spot_price;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(instance_type, (sum, samples))| InstanceTypeSummary {
            instance_type: instance_type.to_string(),
            samples,
            avg_price: (sum / Decimal::from(samples)).round_dp(8).normalize(),
        })
        .collect()
}
