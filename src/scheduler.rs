// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! Fan-out/fan-in over contiguous index ranges.
//!
//! A parallel phase splits `[0, n)` into `parts` contiguous ranges, computes one
//! owned partial result per range on the rayon pool, and hands the partials to a
//! sequential fold once every range has finished. Workers only read shared inputs
//! and write their own result, so the data path needs no locks.
use crate::errors::ProverError;
use itertools::Itertools;
use rayon::prelude::*;
use std::{
  ops::Range,
  panic::{AssertUnwindSafe, catch_unwind},
};
use tracing::debug;

/// Splits `[0, n)` into `parts` contiguous ranges with boundaries `⌊i·n/parts⌋`.
///
/// Ranges may differ in length by one and some may be empty when `n < parts`.
/// A `parts` of zero is treated as one.
pub fn ranges(n: usize, parts: usize) -> Vec<Range<usize>> {
  let parts = parts.max(1);
  (0..=parts)
    .map(|i| ((i as u128 * n as u128) / parts as u128) as usize)
    .tuple_windows()
    .map(|(start, end)| start..end)
    .collect()
}

/// Runs `work` once per range of `ranges(n, parts)` in parallel and returns the
/// partial results in range order.
///
/// The call blocks until every worker has finished. A panic inside a worker is
/// captured and reported as `ProverError::InternalArithmeticFault`; if several
/// workers fail, the error of the lowest failing range is returned.
///
/// # Errors
/// Returns the first error produced by a worker.
pub fn fan_out<T, W>(n: usize, parts: usize, work: W) -> Result<Vec<T>, ProverError>
where
  T: Send,
  W: Fn(Range<usize>) -> Result<T, ProverError> + Sync,
{
  let ranges = ranges(n, parts);
  debug!(n, parts = ranges.len(), "fan_out");

  let results: Vec<Result<T, ProverError>> = ranges
    .into_par_iter()
    .map(|range| {
      let (start, end) = (range.start, range.end);
      catch_unwind(AssertUnwindSafe(|| work(range))).unwrap_or_else(|payload| {
        let msg = payload
          .downcast_ref::<&str>()
          .map(|s| s.to_string())
          .or_else(|| payload.downcast_ref::<String>().cloned())
          .unwrap_or_else(|| "unknown panic".to_string());
        Err(ProverError::fault(format!(
          "worker for range {start}..{end} panicked: {msg}"
        )))
      })
    })
    .collect();

  results.into_iter().collect()
}

/// Folds partial results sequentially: slot 0 absorbs slot 1, then slot 2, and so on.
///
/// `combine` must be associative, so the result does not depend on how `[0, n)`
/// was partitioned.
pub fn fan_in<T, F>(partials: Vec<T>, identity: T, combine: F) -> T
where
  F: Fn(T, T) -> T,
{
  partials.into_iter().reduce(combine).unwrap_or(identity)
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn test_ranges() {
    assert_eq!(ranges(10, 3), vec![0..3, 3..6, 6..10]);
    assert_eq!(ranges(4, 4), vec![0..1, 1..2, 2..3, 3..4]);
    assert_eq!(ranges(2, 4), vec![0..0, 0..1, 1..1, 1..2]);
    assert_eq!(ranges(0, 3), vec![0..0, 0..0, 0..0]);
    assert_eq!(ranges(7, 0), vec![0..7]);
  }

  #[test]
  fn test_fan_out_fan_in() {
    let values = (1..=1000u64).collect::<Vec<_>>();
    for parts in [1, 2, 3, 8, 2000] {
      let partials = fan_out(values.len(), parts, |range| {
        Ok(values[range].iter().sum::<u64>())
      })
      .unwrap();
      assert_eq!(partials.len(), parts);
      assert_eq!(fan_in(partials, 0, |a, b| a + b), 500500);
    }
  }

  #[test]
  fn test_fan_out_error() {
    let res = fan_out(10, 5, |range| {
      if range.start >= 4 {
        Err(ProverError::InvalidInputLength)
      } else {
        Ok(range.len())
      }
    });
    assert_eq!(res, Err(ProverError::InvalidInputLength));
  }

  #[test]
  fn test_fan_out_panic() {
    let res: Result<Vec<usize>, _> = fan_out(8, 4, |range| {
      if range.start == 2 {
        panic!("boom");
      }
      Ok(range.len())
    });
    match res {
      Err(ProverError::InternalArithmeticFault { reason }) => assert!(reason.contains("boom")),
      other => panic!("unexpected result: {other:?}"),
    }
  }

  proptest! {
    #[test]
    fn ranges_cover_exactly(n in 0usize..10_000, parts in 1usize..64) {
      let rs = ranges(n, parts);
      prop_assert_eq!(rs.len(), parts);
      prop_assert_eq!(rs[0].start, 0);
      prop_assert_eq!(rs[parts - 1].end, n);
      for r in rs.iter() {
        prop_assert!(r.start <= r.end);
      }
      for (a, b) in rs.iter().tuple_windows() {
        prop_assert_eq!(a.end, b.start);
      }
      prop_assert_eq!(rs.iter().map(|r| r.len()).sum::<usize>(), n);
    }
  }
}
