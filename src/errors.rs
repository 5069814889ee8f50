//! This module defines errors returned by the library.
use thiserror::Error;

/// Errors returned by the Groth16 prover
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ProverError {
  /// returned if the entropy source fails while sampling the blinding factors
  #[error("RandomSourceError: {reason}")]
  RandomSourceError {
    /// The reason reported by the random source
    reason: String,
  },
  /// returned if the proving key, the witness, or a configuration value violates
  /// a structural precondition (lengths, domain size, window width)
  #[error("PreconditionViolation: {reason}")]
  PreconditionViolation {
    /// The violated precondition
    reason: String,
  },
  /// returned if a group or field operation yields an invalid value, or if a worker
  /// fails while computing a partial result
  #[error("InternalArithmeticFault: {reason}")]
  InternalArithmeticFault {
    /// The reason for the fault
    reason: String,
  },
  /// returned if the supplied points and scalars are not of the same length
  #[error("InvalidInputLength")]
  InvalidInputLength,
}

impl ProverError {
  /// Returns true if retrying with fresh randomness could succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(self, ProverError::RandomSourceError { .. })
  }

  pub(crate) fn precondition(reason: impl Into<String>) -> Self {
    ProverError::PreconditionViolation {
      reason: reason.into(),
    }
  }

  pub(crate) fn fault(reason: impl Into<String>) -> Self {
    ProverError::InternalArithmeticFault {
      reason: reason.into(),
    }
  }
}
