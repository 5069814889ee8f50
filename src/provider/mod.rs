//! This module provides the curve pair and the multi-scalar multiplication engine used by the prover.
pub mod bn254;
pub mod msm;
