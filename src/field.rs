// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! Scalar helpers on top of `ff::PrimeField`.
//!
//! Modular addition, multiplication and negation are the field's own operators;
//! this module adds the pieces the prover needs around them: reducing a byte
//! string into the field and sampling the Groth16 blinding factors.
use crate::errors::ProverError;
use ff::PrimeField;
use rand_core::RngCore;

/// Interprets `bytes` as a big-endian unsigned integer and reduces it modulo the field order.
pub fn from_be_bytes_mod_order<F: PrimeField>(bytes: &[u8]) -> F {
  let radix = F::from(256u64);
  bytes
    .iter()
    .fold(F::ZERO, |acc, byte| acc * radix + F::from(u64::from(*byte)))
}

/// Number of random bytes drawn per sampled scalar: `NUM_BITS / 8 - 1`.
pub fn random_byte_len<F: PrimeField>() -> usize {
  (F::NUM_BITS as usize / 8).saturating_sub(1)
}

/// Samples a scalar from `rng`.
///
/// Draws `NUM_BITS / 8 - 1` bytes, so the integer is strictly below the field
/// order and the reduction introduces no bias on top of the truncated range.
///
/// # Errors
/// Returns `ProverError::RandomSourceError` if the random source fails.
pub fn random_scalar<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R) -> Result<F, ProverError> {
  let mut bytes = vec![0u8; random_byte_len::<F>()];
  rng
    .try_fill_bytes(&mut bytes)
    .map_err(|e| ProverError::RandomSourceError {
      reason: e.to_string(),
    })?;
  Ok(from_be_bytes_mod_order(&bytes))
}

/// Returns `-(r * s) mod R`.
pub fn neg_product<F: PrimeField>(r: &F, s: &F) -> F {
  -(*r * s)
}
