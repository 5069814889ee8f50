// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! Radix-2 evaluation domains and the FFT engine.
//!
//! `RootsOfUnity` holds, for every level `k` up to a maximum `L`, the primitive
//! `2^k`-th root of unity `ω_k` and its powers. Only the powers of `ω_L` are
//! stored: since `ω_k = ω_L^(2^(L-k))`, the powers of `ω_k` are the powers of
//! `ω_L` read with a stride of `2^(L-k)`.
//!
//! Point `j` of the domain of size `n = 2^k` is `ω_k^j`; `fft` maps coefficients
//! to evaluations in that order and `ifft` maps them back.
use crate::{errors::ProverError, math::Math};
use ff::{Field, PrimeField};
use rayon::prelude::*;

/// Precomputed roots of unity for all power-of-two sizes up to `2^max_level`.
#[derive(Clone, Debug)]
pub struct RootsOfUnity<F: PrimeField> {
  // roots[k] is the primitive 2^k-th root of unity
  roots: Vec<F>,
  // powers[i] = roots[max_level]^i for i < 2^max_level
  powers: Vec<F>,
}

impl<F: PrimeField> RootsOfUnity<F> {
  /// Builds the table for levels `0..=max_level`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if the field has no
  /// multiplicative subgroup of order `2^max_level`.
  pub fn new(max_level: usize) -> Result<Self, ProverError> {
    if max_level > F::S as usize {
      return Err(ProverError::precondition(format!(
        "the scalar field has no root of unity of order 2^{max_level} (two-adicity is {})",
        F::S
      )));
    }

    let mut top = F::ROOT_OF_UNITY;
    for _ in max_level..F::S as usize {
      top = top.square();
    }

    let mut roots = vec![F::ONE; max_level + 1];
    roots[max_level] = top;
    for k in (0..max_level).rev() {
      roots[k] = roots[k + 1].square();
    }

    let size = 1usize << max_level;
    let mut powers = Vec::with_capacity(size);
    let mut cur = F::ONE;
    for _ in 0..size {
      powers.push(cur);
      cur *= top;
    }

    Ok(Self { roots, powers })
  }

  /// Builds the table needed to work with a domain of `domain_size` points and
  /// its coset of the same size, i.e. levels up to `log2(domain_size) + 1`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if `domain_size` is not a power of two
  /// or is too large for the field.
  pub fn for_domain(domain_size: usize) -> Result<Self, ProverError> {
    if !domain_size.is_power_of_two() {
      return Err(ProverError::precondition(format!(
        "domain size {domain_size} is not a power of two"
      )));
    }
    Self::new(domain_size.log_2() + 1)
  }

  /// Largest level available in the table.
  pub fn max_level(&self) -> usize {
    self.roots.len() - 1
  }

  /// Returns the primitive `2^level`-th root of unity.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if `level` exceeds the table.
  pub fn root(&self, level: usize) -> Result<F, ProverError> {
    self.roots.get(level).copied().ok_or_else(|| {
      ProverError::precondition(format!(
        "level {level} exceeds the table (max level {})",
        self.max_level()
      ))
    })
  }

  /// Returns `ω_level^i`, with the exponent taken modulo `2^level`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if `level` exceeds the table.
  pub fn power(&self, level: usize, i: usize) -> Result<F, ProverError> {
    self.root(level)?;
    Ok(self.power_unchecked(level, i))
  }

  fn power_unchecked(&self, level: usize, i: usize) -> F {
    let exp = i & ((1usize << level) - 1);
    self.powers[exp << (self.max_level() - level)]
  }

  /// Multiplies `coeffs[i]` by `ω_level^i`.
  ///
  /// Applied to the coefficients of a polynomial of size `2^(level-1)`, a
  /// subsequent `fft` yields its evaluations on the coset `ω_level · H`, which
  /// consists of the odd powers of `ω_level`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if `level` exceeds the table.
  pub fn distribute_powers(&self, coeffs: &mut [F], level: usize) -> Result<(), ProverError> {
    self.root(level)?;
    coeffs
      .par_iter_mut()
      .enumerate()
      .for_each(|(i, c)| *c *= self.power_unchecked(level, i));
    Ok(())
  }

  /// In-place forward transform: coefficients to evaluations on the domain of size `values.len()`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if the length is not a power of two
  /// or exceeds the table.
  pub fn fft(&self, values: &mut [F]) -> Result<(), ProverError> {
    self.transform(values, false)
  }

  /// In-place inverse transform: evaluations on the domain of size `values.len()` to coefficients.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if the length is not a power of two
  /// or exceeds the table.
  pub fn ifft(&self, values: &mut [F]) -> Result<(), ProverError> {
    self.transform(values, true)?;

    let n_inv = Option::<F>::from(F::from(values.len() as u64).invert())
      .ok_or_else(|| ProverError::fault("domain size is not invertible in the scalar field"))?;
    values.par_iter_mut().for_each(|v| *v *= n_inv);
    Ok(())
  }

  // In-place iterative Cooley-Tukey radix-2 transform, without the 1/n scaling
  fn transform(&self, values: &mut [F], inverse: bool) -> Result<(), ProverError> {
    let n = values.len();
    if !n.is_power_of_two() {
      return Err(ProverError::precondition(format!(
        "transform length {n} is not a power of two"
      )));
    }
    let log_n = n.log_2();
    if log_n > self.max_level() {
      return Err(ProverError::precondition(format!(
        "transform length 2^{log_n} exceeds the table (max level {})",
        self.max_level()
      )));
    }

    bit_reverse_permutation(values);

    for stage in 1..=log_n {
      let len = 1usize << stage;
      let half = len / 2;
      // ω_stage^{±j}; the inverse uses ω^{-j} = ω^{len-j}
      let twiddles = (0..half)
        .map(|j| {
          let exp = if inverse { len - j } else { j };
          self.power_unchecked(stage, exp)
        })
        .collect::<Vec<_>>();

      values.par_chunks_mut(len).for_each(|chunk| {
        let (lo, hi) = chunk.split_at_mut(half);
        for ((u, v), w) in lo.iter_mut().zip(hi.iter_mut()).zip(twiddles.iter()) {
          let t = *v * w;
          *v = *u - t;
          *u += t;
        }
      });
    }
    Ok(())
  }
}

fn bit_reverse_permutation<F>(a: &mut [F]) {
  let n = a.len();
  let mut j = 0usize;
  for i in 1..n {
    let mut bit = n >> 1;
    while j & bit != 0 {
      j ^= bit;
      bit >>= 1;
    }
    j ^= bit;
    if i < j {
      a.swap(i, j);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::bn254::Scalar;
  use proptest::prelude::*;
  use rand::{SeedableRng, rngs::StdRng};

  fn naive_eval(coeffs: &[Scalar], x: Scalar) -> Scalar {
    coeffs.iter().rev().fold(Scalar::ZERO, |acc, c| acc * x + c)
  }

  #[test]
  fn test_roots_are_primitive() {
    let table = RootsOfUnity::<Scalar>::new(10).unwrap();
    assert_eq!(table.max_level(), 10);
    assert_eq!(table.root(0).unwrap(), Scalar::ONE);
    assert_eq!(table.root(1).unwrap(), -Scalar::ONE);
    for level in 1..=10 {
      let w = table.root(level).unwrap();
      assert_eq!(w.pow_vartime([1u64 << level]), Scalar::ONE);
      assert_ne!(w.pow_vartime([1u64 << (level - 1)]), Scalar::ONE);
      assert_eq!(table.power(level, 3).unwrap(), w * w * w);
    }
    assert!(table.root(11).is_err());
    assert!(RootsOfUnity::<Scalar>::new(Scalar::S as usize + 1).is_err());
    assert!(RootsOfUnity::<Scalar>::for_domain(12).is_err());
  }

  #[test]
  fn test_fft_matches_naive_evaluation() {
    let mut rng = StdRng::seed_from_u64(3);
    let table = RootsOfUnity::<Scalar>::for_domain(16).unwrap();
    for log_n in 0..=5 {
      let n = 1usize << log_n;
      let coeffs = (0..n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();
      let mut evals = coeffs.clone();
      table.fft(&mut evals).unwrap();
      for (j, e) in evals.iter().enumerate() {
        let x = table.power(log_n, j).unwrap();
        assert_eq!(*e, naive_eval(&coeffs, x));
      }
    }
  }

  #[test]
  fn test_coset_fft() {
    let mut rng = StdRng::seed_from_u64(4);
    let n = 8;
    let table = RootsOfUnity::<Scalar>::for_domain(n).unwrap();
    let coeffs = (0..n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();

    let mut shifted = coeffs.clone();
    table.distribute_powers(&mut shifted, 4).unwrap();
    table.fft(&mut shifted).unwrap();

    // odd points of the domain of size 2n
    for (j, e) in shifted.iter().enumerate() {
      let x = table.power(4, 2 * j + 1).unwrap();
      assert_eq!(*e, naive_eval(&coeffs, x));
    }
  }

  #[test]
  fn test_transform_rejects_bad_lengths() {
    let table = RootsOfUnity::<Scalar>::new(3).unwrap();
    let mut values = vec![Scalar::ONE; 6];
    assert!(matches!(
      table.fft(&mut values),
      Err(ProverError::PreconditionViolation { .. })
    ));
    let mut values = vec![Scalar::ONE; 16];
    assert!(table.ifft(&mut values).is_err());
  }

  proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn fft_ifft_roundtrip(log_n in 0usize..=8, seed in any::<u64>()) {
      let mut rng = StdRng::seed_from_u64(seed);
      let table = RootsOfUnity::<Scalar>::new(8).unwrap();
      let coeffs = (0..1usize << log_n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();
      let mut values = coeffs.clone();
      table.fft(&mut values).unwrap();
      table.ifft(&mut values).unwrap();
      prop_assert_eq!(values, coeffs);
    }
  }
}
