// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! Evaluation of the QAP quotient polynomial `H`.
//!
//! For a witness `w`, let `A(X) = Σ w_i A_i(X)` and `B(X) = Σ w_i B_i(X)`, where
//! the column polynomials are given by their values on the domain of size `m`.
//! The quotient satisfies `A·B - C = H·Z` with `Z = X^m - 1`. Because `C` has
//! degree below `m` and `deg(H) ≤ m - 2`, the coefficients of `H` are exactly
//! the coefficients of `A·B` at degrees `m..2m`, so `C` is never needed here.
use crate::{
  errors::ProverError,
  math::Math,
  polys::domain::RootsOfUnity,
  scheduler::{fan_in, fan_out},
  start_span,
};
use ff::PrimeField;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// One column of a QAP matrix: constraint index to coefficient.
pub type SparseColumn<F> = BTreeMap<usize, F>;

/// Returns the dense evaluations `Σ_i witness[i] · pols[i][j]` for `j < domain_size`,
/// computed over `num_workers` variable ranges.
///
/// # Errors
/// Returns `ProverError::PreconditionViolation` if `pols` and `witness` differ in length
/// or a constraint index is outside the domain.
pub fn evaluate_columns<F: PrimeField>(
  pols: &[SparseColumn<F>],
  witness: &[F],
  domain_size: usize,
  num_workers: usize,
) -> Result<Vec<F>, ProverError> {
  if pols.len() != witness.len() {
    return Err(ProverError::precondition(format!(
      "{} QAP columns for a witness of length {}",
      pols.len(),
      witness.len()
    )));
  }

  let partials = fan_out(witness.len(), num_workers, |range| {
    let mut acc = vec![F::ZERO; domain_size];
    for i in range {
      for (j, coeff) in pols[i].iter() {
        let slot = acc.get_mut(*j).ok_or_else(|| {
          ProverError::precondition(format!(
            "constraint index {j} of variable {i} is outside the domain of size {domain_size}"
          ))
        })?;
        *slot += witness[i] * coeff;
      }
    }
    Ok(acc)
  })?;

  Ok(fan_in(
    partials,
    vec![F::ZERO; domain_size],
    |mut sum, evl| {
      sum.iter_mut().zip(evl).for_each(|(s, e)| *s += e);
      sum
    },
  ))
}

/// Computes the `domain_size` coefficients of `H`, lowest degree first.
///
/// The last coefficient is always zero since `deg(A·B) ≤ 2·domain_size - 2`.
///
/// # Errors
/// Returns `ProverError::PreconditionViolation` if `domain_size` is not a power of two,
/// if the inputs have inconsistent lengths, or if a constraint index is outside the domain.
pub fn compute_h<F: PrimeField>(
  pols_a: &[SparseColumn<F>],
  pols_b: &[SparseColumn<F>],
  witness: &[F],
  domain_size: usize,
  num_workers: usize,
) -> Result<Vec<F>, ProverError> {
  let (_h_span, h_t) = start_span!("compute_h", domain_size);

  let roots = RootsOfUnity::<F>::for_domain(domain_size)?;
  let coset_level = domain_size.log_2() + 1;

  // A and B on the domain
  let pol_a = evaluate_columns(pols_a, witness, domain_size, num_workers)?;
  let pol_b = evaluate_columns(pols_b, witness, domain_size, num_workers)?;

  // A and B on the coset ω_{2m}·H
  let (_fft_span, fft_t) = start_span!("fft", domain_size);
  let mut odd_a = pol_a.clone();
  let mut odd_b = pol_b.clone();
  for odd in [&mut odd_a, &mut odd_b] {
    roots.ifft(odd)?;
    roots.distribute_powers(odd, coset_level)?;
    roots.fft(odd)?;
  }
  info!(elapsed_ms = %fft_t.elapsed().as_millis(), domain_size, "fft");

  // A·B on the domain of size 2m: even points from H, odd points from the coset
  let mut ab = vec![F::ZERO; 2 * domain_size];
  ab.par_chunks_mut(2).enumerate().for_each(|(i, pair)| {
    pair[0] = pol_a[i] * pol_b[i];
    pair[1] = odd_a[i] * odd_b[i];
  });
  roots.ifft(&mut ab)?;

  let h = ab.split_off(domain_size);

  info!(elapsed_ms = %h_t.elapsed().as_millis(), domain_size, "compute_h");
  Ok(h)
}
