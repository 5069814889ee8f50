//! This library implements Groth16 proof generation over the BN254 curve pair.
//! Given a proving key produced by a trusted setup and a satisfying witness, it
//! computes the quotient polynomial `H` with radix-2 FFTs and accumulates the
//! proof elements with a parallel, fixed-window bucket multi-scalar multiplication.
#![deny(
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![allow(non_snake_case)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::type_complexity)]
#![forbid(unsafe_code)]

// private modules
mod math;

// public modules
pub mod config;
pub mod errors;
pub mod field;
pub mod groth16;
pub mod polys;
pub mod provider;
pub mod qap;
pub mod scheduler;

pub use config::ProverConfig;
pub use errors::ProverError;
pub use groth16::{Groth16Prover, Proof, ProvingKey, generate_proof};

/// Start a span + timer, return `(Span, Instant)`.
macro_rules! start_span {
    ($name:expr $(, $($fmt:tt)+)?) => {{
        let span       = tracing::info_span!($name $(, $($fmt)+)?);
        let span_clone = span.clone();    // lives as long as the guard
        let _guard      = span_clone.enter();
        (span, std::time::Instant::now())
    }};
}
pub(crate) use start_span;
