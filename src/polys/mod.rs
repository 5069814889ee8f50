//! This module contains the polynomial machinery used by the prover.
pub mod domain;
pub mod univariate;
