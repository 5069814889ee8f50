// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the groth16-prover project.
// See the LICENSE file in the project root for full license information.

//! The fixed pairing-friendly curve pair: BN254 (also known as BN256 or alt_bn128).
//!
//! All scalar arithmetic is modulo the common group order
//! `R = 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001`.

// Re-exports that give access to the standard aliases used in the code base
pub use halo2curves::bn256::{Bn256, Fr as Scalar, G1, G1Affine, G2, G2Affine, Gt};
