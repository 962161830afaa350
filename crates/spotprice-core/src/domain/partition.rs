//! 균등 파티션 분할.
//!
//! 길이 `L`인 시퀀스를 `n`개로 나눌 때 `k, m = divmod(L, n)`이면
//! 앞의 `m`개 파티션은 `k + 1`개, 나머지는 `k`개 원소를 갖습니다.
//! 파티션은 연속적이고 순서를 보존하며, `L < n`이면 일부는 비어 있습니다.

use std::ops::Range;

use crate::error::{SpotError, SpotResult};

/// 각 파티션의 인덱스 범위를 계산합니다.
pub fn partition_ranges(len: usize, n: usize) -> SpotResult<Vec<Range<usize>>> {
    if n == 0 {
        return Err(SpotError::InvalidArgument(
            "partition count must be >= 1".to_string(),
        ));
    }

    let (k, m) = (len / n, len % n);
    Ok((0..n)
        .map(|i| i * k + i.min(m)..(i + 1) * k + (i + 1).min(m))
        .collect())
}

/// 슬라이스를 `n`개의 읽기 전용 파티션으로 나눕니다.
pub fn split_even<T>(items: &[T], n: usize) -> SpotResult<Vec<&[T]>> {
    Ok(partition_ranges(items.len(), n)?
        .into_iter()
        .map(|range| &items[range])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ten_into_four() {
        let items: Vec<u32> = (0..10).collect();
        let parts = split_even(&items, 4).unwrap();

        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        assert_eq!(parts[0], &[0, 1, 2]);
        assert_eq!(parts[3], &[8, 9]);
    }

    #[test]
    fn test_fewer_items_than_partitions() {
        let items = ["a", "b"];
        let parts = split_even(&items, 4).unwrap();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], &["a"]);
        assert_eq!(parts[1], &["b"]);
        assert!(parts[2].is_empty());
        assert!(parts[3].is_empty());
    }

    #[test]
    fn test_empty_input() {
        let parts = split_even::<u8>(&[], 3).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let err = split_even(&[1, 2, 3], 0).unwrap_err();
        assert!(matches!(err, SpotError::InvalidArgument(_)));
    }

    proptest! {
        #[test]
        fn prop_concatenation_preserves_sequence(
            items in proptest::collection::vec(any::<i32>(), 0..200),
            n in 1usize..16,
        ) {
            let parts = split_even(&items, n).unwrap();
            prop_assert_eq!(parts.len(), n);

            let joined: Vec<i32> = parts.iter().flat_map(|p| p.iter().copied()).collect();
            prop_assert_eq!(joined, items.clone());

            let max = parts.iter().map(|p| p.len()).max().unwrap();
            let min = parts.iter().map(|p| p.len()).min().unwrap();
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn prop_non_empty_count_when_oversplit(len in 0usize..20, extra in 1usize..10) {
            let items: Vec<usize> = (0..len).collect();
            let n = len + extra;
            let parts = split_even(&items, n).unwrap();

            prop_assert_eq!(parts.len(), n);
            prop_assert_eq!(parts.iter().filter(|p| !p.is_empty()).count(), len);
        }
    }
}
