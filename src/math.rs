// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

pub trait Math {
  fn log_2(self) -> usize;
}

impl Math for usize {
  /// Returns `ceil(log2(self))`; exact for powers of two.
  fn log_2(self) -> usize {
    assert_ne!(self, 0);

    if self.is_power_of_two() {
      (1usize.leading_zeros() - self.leading_zeros()) as usize
    } else {
      (0usize.leading_zeros() - self.leading_zeros()) as usize
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Math;

  #[test]
  fn test_log_2() {
    assert_eq!(1usize.log_2(), 0);
    assert_eq!(2usize.log_2(), 1);
    assert_eq!(4usize.log_2(), 2);
    assert_eq!(5usize.log_2(), 3);
    assert_eq!((1usize << 20).log_2(), 20);
  }
}
