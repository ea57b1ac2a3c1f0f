//! Proportional allocation of an integer total.
//!
//! Shares come from a telescoping sequence of cumulative targets
//! `floor(total * prefix / grand)`. Each share is the difference of two
//! consecutive targets, and the last target is `total` itself, so the shares
//! always sum to `total` exactly. The grand total must fit an `i64`, so every
//! `total * prefix` product fits the `i128` the targets are computed in.

use crate::domain::error::{DomainError, DomainResult};

/// Allocate `total` across `weights` in proportion to each weight.
///
/// Equal weights do not guarantee equal shares: which of them gets the larger
/// part depends only on where the cumulative target crosses an integer
/// boundary. Fails `Degenerate` when all weights are zero.
pub fn allocate_by_weight(total: i64, weights: &[i64]) -> DomainResult<Vec<i64>> {
    if total < 0 {
        return Err(DomainError::RangeViolation(format!(
            "cannot distribute a negative total: {total}"
        )));
    }
    if let Some(weight) = weights.iter().find(|w| **w < 0) {
        return Err(DomainError::RangeViolation(format!(
            "distribution weight cannot be negative: {weight}"
        )));
    }
    let grand: i128 = weights.iter().map(|w| i128::from(*w)).sum();
    if grand == 0 {
        return Err(DomainError::Degenerate(total.to_string()));
    }
    if grand > i128::from(i64::MAX) {
        return Err(DomainError::RangeViolation(
            "distribution weights overflow".to_string(),
        ));
    }

    let total = i128::from(total);
    let mut prefix: i128 = 0;
    let mut allocated: i128 = 0;
    let mut shares = Vec::with_capacity(weights.len());
    for weight in weights {
        prefix += i128::from(*weight);
        let target = total * prefix / grand;
        // target - allocated lies in 0..=total, which came from an i64
        shares.push((target - allocated) as i64);
        allocated = target;
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_thirty_seventy_when_allocating_hundred_then_exact_split() {
        assert_eq!(allocate_by_weight(100, &[30, 70]), Ok(vec![30, 70]));
    }

    #[test]
    fn given_equal_weights_when_total_indivisible_then_later_entries_absorb_boundary() {
        // targets: floor(10*1/3)=3, floor(10*2/3)=6, 10
        assert_eq!(allocate_by_weight(10, &[1, 1, 1]), Ok(vec![3, 3, 4]));
    }

    #[test]
    fn given_zero_weights_when_allocating_then_degenerate() {
        assert!(matches!(
            allocate_by_weight(5, &[0, 0]),
            Err(DomainError::Degenerate(_))
        ));
    }

    #[test]
    fn given_zero_weight_entry_when_allocating_then_it_gets_nothing() {
        assert_eq!(allocate_by_weight(9, &[0, 3, 0, 6]), Ok(vec![0, 3, 0, 6]));
    }

    #[test]
    fn given_extreme_values_when_allocating_then_no_overflow_and_sum_conserved() {
        let weights = [i64::MAX - 1, 1];
        let shares = allocate_by_weight(i64::MAX, &weights).unwrap();
        let sum: i128 = shares.iter().map(|s| i128::from(*s)).sum();
        assert_eq!(sum, i128::from(i64::MAX));
    }
}
