//! Interior-wash distribution.
//!
//! Interior washes are spread across the whole schedule with a fixed stride
//! of `total / interior` washes: wash `n` (1-based) is interior when
//! `n % stride == 0`. Integer division means the rule can mark more washes
//! than requested when `interior > total / 2` (e.g. 5 washes, 3 interior gives
//! stride 1, so every wash is interior). Callers depend on that exact
//! behaviour, so it is kept.

use crate::slot::ServiceType;

/// Stride between interior washes, or `None` when no wash is interior.
pub fn interior_stride(total_washes: u32, interior_wash_count: u32) -> Option<u32> {
    if interior_wash_count == 0 {
        return None;
    }
    let stride = total_washes / interior_wash_count;
    (stride > 0).then_some(stride)
}

/// Service type for the wash at 0-based `index`.
pub fn service_type_for(index: u32, total_washes: u32, interior_wash_count: u32) -> ServiceType {
    match interior_stride(total_washes, interior_wash_count) {
        Some(stride) if (index + 1) % stride == 0 => ServiceType::Interior,
        _ => ServiceType::Exterior,
    }
}

/// 1-based wash numbers that come out as interior.
pub fn interior_positions(total_washes: u32, interior_wash_count: u32) -> Vec<u32> {
    match interior_stride(total_washes, interior_wash_count) {
        Some(stride) => (1..=total_washes).filter(|n| n % stride == 0).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_interior_when_count_is_zero() {
        assert_eq!(interior_stride(8, 0), None);
        for i in 0..8 {
            assert_eq!(service_type_for(i, 8, 0), ServiceType::Exterior);
        }
        assert!(interior_positions(8, 0).is_empty());
    }

    #[test]
    fn test_positions_are_spread_not_clustered() {
        // 8 washes, 2 interior -> stride 4 -> washes 4 and 8
        assert_eq!(interior_positions(8, 2), vec![4, 8]);
        // 12 washes, 3 interior -> stride 4
        assert_eq!(interior_positions(12, 3), vec![4, 8, 12]);
        // 7 washes, 2 interior -> stride 3 -> 3 and 6, wash 7 stays exterior
        assert_eq!(interior_positions(7, 2), vec![3, 6]);
    }

    #[test]
    fn test_single_interior_lands_on_last_wash() {
        assert_eq!(interior_positions(3, 1), vec![3]);
        assert_eq!(service_type_for(2, 3, 1), ServiceType::Interior);
        assert_eq!(service_type_for(0, 3, 1), ServiceType::Exterior);
    }

    #[test]
    fn test_small_stride_over_assigns() {
        // 5 / 3 = 1, so every wash matches
        assert_eq!(interior_positions(5, 3), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_all_interior() {
        assert_eq!(interior_positions(4, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_more_interior_than_total_has_no_stride() {
        assert_eq!(interior_stride(2, 3), None);
    }
}
