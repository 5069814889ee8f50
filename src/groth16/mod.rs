//! This module implements Groth16 proof generation.
//! It provides the proving key and proof types, and the prover that assembles
//! the three proof elements from the parallel MSM passes and the QAP quotient.
use crate::{
  errors::ProverError,
  provider::bn254::{G1Affine, G2Affine, Scalar},
  qap::SparseColumn,
};
use halo2curves::CurveAffine;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

mod prover;

pub use prover::{Groth16Prover, generate_proof};

/// A type that represents the prover's key, as produced by the trusted setup.
///
/// Variable `i` has one entry in each of `a`, `b1`, `b2`, `c`, `pols_a` and `pols_b`.
/// Variable 0 is the constant one and variables `1..=n_public` are the public inputs;
/// the entries of `c` for those variables are never read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvingKey {
  /// Number of circuit variables, including the constant one.
  pub n_vars: usize,
  /// Number of public inputs.
  pub n_public: usize,
  /// Size of the evaluation domain; a power of two.
  pub domain_size: usize,
  /// `A_i(τ)·G1` per variable.
  pub a: Vec<G1Affine>,
  /// `B_i(τ)·G1` per variable.
  pub b1: Vec<G1Affine>,
  /// `B_i(τ)·G2` per variable.
  pub b2: Vec<G2Affine>,
  /// `(β·A_i(τ) + α·B_i(τ) + C_i(τ))/δ · G1` per private variable.
  pub c: Vec<G1Affine>,
  /// `τ^j·Z(τ)/δ · G1` for `j < domain_size`.
  pub h_exps: Vec<G1Affine>,
  /// Column `i` of the QAP's A matrix: values of `A_i` on the domain.
  pub pols_a: Vec<SparseColumn<Scalar>>,
  /// Column `i` of the QAP's B matrix: values of `B_i` on the domain.
  pub pols_b: Vec<SparseColumn<Scalar>>,
  /// `α·G1`
  pub vk_alpha_1: G1Affine,
  /// `β·G1`
  pub vk_beta_1: G1Affine,
  /// `β·G2`
  pub vk_beta_2: G2Affine,
  /// `δ·G1`
  pub vk_delta_1: G1Affine,
  /// `δ·G2`
  pub vk_delta_2: G2Affine,
}

impl ProvingKey {
  /// Checks the structure of the key against a witness of length `witness_len`.
  ///
  /// `witness[0] == 1` is a convention of the witness generator and is not checked.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if any length is inconsistent, if
  /// `domain_size` is not a power of two, or if a constraint index is outside the domain.
  /// Returns `ProverError::InternalArithmeticFault` if a point is not on its curve.
  pub fn validate(&self, witness_len: usize) -> Result<(), ProverError> {
    if witness_len != self.n_vars {
      return Err(ProverError::precondition(format!(
        "witness has {witness_len} entries, the proving key expects {}",
        self.n_vars
      )));
    }
    if self.n_public >= self.n_vars {
      return Err(ProverError::precondition(format!(
        "{} public inputs for {} variables",
        self.n_public, self.n_vars
      )));
    }
    if !self.domain_size.is_power_of_two() {
      return Err(ProverError::precondition(format!(
        "domain size {} is not a power of two",
        self.domain_size
      )));
    }

    let per_variable = [
      ("a", self.a.len()),
      ("b1", self.b1.len()),
      ("b2", self.b2.len()),
      ("c", self.c.len()),
      ("pols_a", self.pols_a.len()),
      ("pols_b", self.pols_b.len()),
    ];
    for (name, len) in per_variable {
      if len != self.n_vars {
        return Err(ProverError::precondition(format!(
          "{name} has {len} entries, expected one per variable ({})",
          self.n_vars
        )));
      }
    }
    if self.h_exps.len() != self.domain_size {
      return Err(ProverError::precondition(format!(
        "h_exps has {} entries, expected domain size {}",
        self.h_exps.len(),
        self.domain_size
      )));
    }

    let out_of_domain = self
      .pols_a
      .iter()
      .chain(self.pols_b.iter())
      .filter_map(|col| col.keys().next_back())
      .any(|j| *j >= self.domain_size);
    if out_of_domain {
      return Err(ProverError::precondition(format!(
        "a QAP column has a constraint index outside the domain of size {}",
        self.domain_size
      )));
    }

    self.check_points()
  }

  fn check_points(&self) -> Result<(), ProverError> {
    fn all_on_curve<C: CurveAffine>(points: &[C]) -> bool {
      points.par_iter().all(|p| bool::from(p.is_on_curve()))
    }

    let g1 = [
      ("a", all_on_curve(&self.a)),
      ("b1", all_on_curve(&self.b1)),
      ("c", all_on_curve(&self.c)),
      ("h_exps", all_on_curve(&self.h_exps)),
      (
        "vk",
        all_on_curve(&[self.vk_alpha_1, self.vk_beta_1, self.vk_delta_1]),
      ),
    ];
    let g2 = [
      ("b2", all_on_curve(&self.b2)),
      ("vk", all_on_curve(&[self.vk_beta_2, self.vk_delta_2])),
    ];

    match g1.iter().chain(g2.iter()).find(|(_, ok)| !ok) {
      Some((name, _)) => Err(ProverError::fault(format!(
        "proving key entry {name} contains a point that is not on the curve"
      ))),
      None => Ok(()),
    }
  }
}

/// A Groth16 proof: `A, C ∈ G1` and `B ∈ G2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
  /// The `A` element.
  pub a: G1Affine,
  /// The `B` element.
  pub b: G2Affine,
  /// The `C` element.
  pub c: G1Affine,
}

/// Returns the public signals `witness[1..=n_public]`.
///
/// # Errors
/// Returns `ProverError::PreconditionViolation` if the witness is too short.
pub fn public_signals(witness: &[Scalar], n_public: usize) -> Result<Vec<Scalar>, ProverError> {
  witness
    .get(1..n_public + 1)
    .map(|s| s.to_vec())
    .ok_or_else(|| {
      ProverError::precondition(format!(
        "witness of length {} has no {n_public} public signals",
        witness.len()
      ))
    })
}
