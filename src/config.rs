//! Tunables for proof generation.
use crate::errors::ProverError;
use serde::{Deserialize, Serialize};

/// Default width, in bits, of the windows used by the bucket MSM.
pub const DEFAULT_WINDOW_BITS: usize = 6;

/// Largest supported window width. Wider windows need `2^W - 1` buckets per window.
pub const MAX_WINDOW_BITS: usize = 16;

/// Configuration of the prover.
///
/// The optimal window width depends on the number of points per MSM and on the
/// target platform, so it is exposed rather than hard-coded. The worker count
/// defaults to the size of the rayon pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProverConfig {
  /// Width of the MSM windows in bits.
  pub window_bits: usize,
  /// Number of contiguous ranges each parallel phase is split into.
  /// `None` uses `rayon::current_num_threads()`.
  pub num_workers: Option<usize>,
}

impl Default for ProverConfig {
  fn default() -> Self {
    Self {
      window_bits: DEFAULT_WINDOW_BITS,
      num_workers: None,
    }
  }
}

impl ProverConfig {
  /// Returns a copy of this configuration with the given window width.
  pub fn with_window_bits(mut self, window_bits: usize) -> Self {
    self.window_bits = window_bits;
    self
  }

  /// Returns a copy of this configuration with a fixed worker count.
  pub fn with_num_workers(mut self, num_workers: usize) -> Self {
    self.num_workers = Some(num_workers);
    self
  }

  /// Number of ranges a parallel phase is split into.
  pub fn workers(&self) -> usize {
    self.num_workers.unwrap_or_else(rayon::current_num_threads)
  }

  /// Checks that the configuration is usable.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if the window width is outside
  /// `1..=MAX_WINDOW_BITS` or if the worker count is zero.
  pub fn validate(&self) -> Result<(), ProverError> {
    if !(1..=MAX_WINDOW_BITS).contains(&self.window_bits) {
      return Err(ProverError::precondition(format!(
        "window width {} is outside 1..={MAX_WINDOW_BITS}",
        self.window_bits
      )));
    }
    if self.num_workers == Some(0) {
      return Err(ProverError::precondition("worker count must be positive"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ProverConfig::default();
    assert_eq!(config.window_bits, 6);
    assert!(config.workers() >= 1);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_invalid_config() {
    assert!(ProverConfig::default().with_window_bits(0).validate().is_err());
    assert!(ProverConfig::default().with_window_bits(17).validate().is_err());
    assert!(ProverConfig::default().with_num_workers(0).validate().is_err());
    assert_eq!(ProverConfig::default().with_num_workers(3).workers(), 3);
  }
}
