// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! Assembly of the Groth16 proof elements.
//!
//! With blinding factors `r, s`, the prover outputs
//! - `A = α + Σ w_i·A_i + r·δ` in G1,
//! - `B = β + Σ w_i·B_i + s·δ` in G2, together with its G1 counterpart,
//! - `C = Σ_{i > n_public} w_i·C_i + Σ h_j·H_j + s·A + r·B_G1 - r·s·δ` in G1.
use super::{Proof, ProvingKey, public_signals};
use crate::{
  config::ProverConfig,
  errors::ProverError,
  field::{neg_product, random_scalar},
  provider::{
    bn254::{G1, G2, Scalar},
    msm::msm_with_window,
  },
  qap::compute_h,
  scheduler::{fan_in, fan_out},
  start_span,
};
use group::{Curve, Group};
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::{debug, info};

// Per-range partial sums of the witness-weighted key vectors
#[derive(Clone, Copy)]
struct PartialSums {
  a: G1,
  b_g1: G1,
  b_g2: G2,
  c: G1,
}

impl PartialSums {
  fn identity() -> Self {
    Self {
      a: G1::identity(),
      b_g1: G1::identity(),
      b_g2: G2::identity(),
      c: G1::identity(),
    }
  }

  fn combine(self, other: Self) -> Self {
    Self {
      a: self.a + other.a,
      b_g1: self.b_g1 + other.b_g1,
      b_g2: self.b_g2 + other.b_g2,
      c: self.c + other.c,
    }
  }
}

/// Generates Groth16 proofs with a given configuration.
#[derive(Clone, Debug, Default)]
pub struct Groth16Prover {
  config: ProverConfig,
}

impl Groth16Prover {
  /// Creates a prover with the given configuration.
  pub fn new(config: ProverConfig) -> Self {
    Self { config }
  }

  /// Returns the configuration of this prover.
  pub fn config(&self) -> &ProverConfig {
    &self.config
  }

  /// Generates a proof with blinding factors drawn from the operating system's RNG.
  /// Returns the proof and the public signals `witness[1..=n_public]`.
  ///
  /// # Errors
  /// See [`Groth16Prover::prove_with_rng`].
  pub fn prove(
    &self,
    pk: &ProvingKey,
    witness: &[Scalar],
  ) -> Result<(Proof, Vec<Scalar>), ProverError> {
    self.prove_with_rng(pk, witness, &mut OsRng)
  }

  /// Generates a proof with blinding factors drawn from `rng`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if the key, the witness or the
  /// configuration is malformed, `ProverError::RandomSourceError` if `rng` fails, and
  /// `ProverError::InternalArithmeticFault` if a key point is invalid or a worker fails.
  pub fn prove_with_rng<R: RngCore + CryptoRng + ?Sized>(
    &self,
    pk: &ProvingKey,
    witness: &[Scalar],
    rng: &mut R,
  ) -> Result<(Proof, Vec<Scalar>), ProverError> {
    self.config.validate()?;
    pk.validate(witness.len())?;

    let r = random_scalar(rng)?;
    let s = random_scalar(rng)?;

    self.assemble(pk, witness, &r, &s)
  }

  /// Generates a proof with caller-supplied blinding factors.
  ///
  /// The output is a deterministic function of the key, the witness, `r` and `s`; in
  /// particular it does not depend on the window width or the worker count. Reusing
  /// blinding factors across proofs breaks zero-knowledge.
  ///
  /// # Errors
  /// Same as [`Groth16Prover::prove_with_rng`], except for `ProverError::RandomSourceError`.
  pub fn prove_with_blinding(
    &self,
    pk: &ProvingKey,
    witness: &[Scalar],
    r: &Scalar,
    s: &Scalar,
  ) -> Result<(Proof, Vec<Scalar>), ProverError> {
    self.config.validate()?;
    pk.validate(witness.len())?;
    self.assemble(pk, witness, r, s)
  }

  fn assemble(
    &self,
    pk: &ProvingKey,
    witness: &[Scalar],
    r: &Scalar,
    s: &Scalar,
  ) -> Result<(Proof, Vec<Scalar>), ProverError> {
    let workers = self.config.workers();
    let window_bits = self.config.window_bits;
    let (_prove_span, prove_t) = start_span!(
      "prove",
      n_vars = pk.n_vars,
      n_public = pk.n_public,
      domain_size = pk.domain_size
    );
    debug!(workers, window_bits, "prove");

    // witness-weighted sums of the per-variable key vectors
    let (_msm_span, msm_t) = start_span!("msm_pass", size = pk.n_vars);
    let c_start = pk.n_public + 1;
    let partials = fan_out(pk.n_vars, workers, |range| {
      let w = &witness[range.clone()];
      let a = msm_with_window(w, &pk.a[range.clone()], G1::identity(), window_bits)?;
      let b_g2 = msm_with_window(w, &pk.b2[range.clone()], G2::identity(), window_bits)?;
      let b_g1 = msm_with_window(w, &pk.b1[range.clone()], G1::identity(), window_bits)?;

      // public inputs have no C term
      let lo = range.start.max(c_start);
      let c = if range.end > lo {
        msm_with_window(
          &witness[lo..range.end],
          &pk.c[lo..range.end],
          G1::identity(),
          window_bits,
        )?
      } else {
        G1::identity()
      };

      Ok(PartialSums { a, b_g1, b_g2, c })
    })?;
    let sums = fan_in(partials, PartialSums::identity(), PartialSums::combine);
    info!(elapsed_ms = %msm_t.elapsed().as_millis(), size = pk.n_vars, "msm_pass");

    let proof_a = sums.a + pk.vk_alpha_1 + pk.vk_delta_1 * r;
    let proof_b = sums.b_g2 + pk.vk_beta_2 + pk.vk_delta_2 * s;
    let proof_b_g1 = sums.b_g1 + pk.vk_beta_1 + pk.vk_delta_1 * s;

    let h = compute_h(&pk.pols_a, &pk.pols_b, witness, pk.domain_size, workers)?;

    let (_h_span, h_t) = start_span!("h_msm", size = h.len());
    let partials = fan_out(h.len(), workers, |range| {
      msm_with_window(
        &h[range.clone()],
        &pk.h_exps[range],
        G1::identity(),
        window_bits,
      )
    })?;
    let c_h = fan_in(partials, G1::identity(), |sum, evl| sum + evl);
    info!(elapsed_ms = %h_t.elapsed().as_millis(), size = h.len(), "h_msm");

    let proof_c =
      sums.c + c_h + proof_a * s + proof_b_g1 * r + pk.vk_delta_1 * neg_product(r, s);

    let proof = Proof {
      a: proof_a.to_affine(),
      b: proof_b.to_affine(),
      c: proof_c.to_affine(),
    };
    let signals = public_signals(witness, pk.n_public)?;

    info!(elapsed_ms = %prove_t.elapsed().as_millis(), n_vars = pk.n_vars, "prove");
    Ok((proof, signals))
  }
}

/// Generates a proof with the default configuration and the operating system's RNG.
///
/// # Errors
/// See [`Groth16Prover::prove_with_rng`].
pub fn generate_proof(
  pk: &ProvingKey,
  witness: &[Scalar],
) -> Result<(Proof, Vec<Scalar>), ProverError> {
  Groth16Prover::default().prove(pk, witness)
}
