//! Main components:
//! - `UniPoly`: an univariate dense polynomial in coefficient form (little endian),
//!   with the schoolbook operations used to cross-check the FFT-based quotient.
use crate::errors::ProverError;
use ff::PrimeField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

// ax^2 + bx + c stored as vec![c, b, a]
// ax^3 + bx^2 + cx + d stored as vec![d, c, b, a]
/// A univariate dense polynomial in coefficient form.
///
/// For a polynomial $ax^2 + bx + c$, coefficients are stored as `vec![c, b, a]`.
/// Trailing zero coefficients are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniPoly<Scalar: PrimeField> {
  pub(crate) coeffs: Vec<Scalar>,
}

impl<Scalar: PrimeField> UniPoly<Scalar> {
  /// Creates a polynomial from its coefficients, lowest degree first.
  pub fn new(coeffs: Vec<Scalar>) -> Self {
    Self { coeffs }
  }

  /// Returns the coefficients, lowest degree first.
  pub fn coeffs(&self) -> &[Scalar] {
    &self.coeffs
  }

  /// Returns the degree of the polynomial, ignoring trailing zero coefficients.
  /// The zero polynomial has degree 0.
  pub fn degree(&self) -> usize {
    self
      .coeffs
      .iter()
      .rposition(|c| !bool::from(c.is_zero()))
      .unwrap_or(0)
  }

  /// Returns true if every coefficient is zero.
  pub fn is_zero(&self) -> bool {
    self.coeffs.par_iter().all(|c| bool::from(c.is_zero()))
  }

  /// Evaluates the polynomial at a given point `r`.
  pub fn evaluate(&self, r: &Scalar) -> Scalar {
    self
      .coeffs
      .iter()
      .rev()
      .fold(Scalar::ZERO, |acc, coeff| acc * r + coeff)
  }

  /// Schoolbook product of two polynomials.
  pub fn mul(&self, other: &Self) -> Self {
    if self.coeffs.is_empty() || other.coeffs.is_empty() {
      return Self { coeffs: vec![] };
    }
    let mut coeffs = vec![Scalar::ZERO; self.coeffs.len() + other.coeffs.len() - 1];
    for (i, a) in self.coeffs.iter().enumerate() {
      for (j, b) in other.coeffs.iter().enumerate() {
        coeffs[i + j] += *a * b;
      }
    }
    Self { coeffs }
  }

  /// Returns `self - other`.
  pub fn sub(&self, other: &Self) -> Self {
    let len = self.coeffs.len().max(other.coeffs.len());
    let coeffs = (0..len)
      .map(|i| {
        let a = self.coeffs.get(i).copied().unwrap_or(Scalar::ZERO);
        let b = other.coeffs.get(i).copied().unwrap_or(Scalar::ZERO);
        a - b
      })
      .collect();
    Self { coeffs }
  }

  /// Divides by the vanishing polynomial `X^n - 1` of the size-`n` domain and
  /// returns `(quotient, remainder)` with `deg(remainder) < n`.
  ///
  /// # Errors
  /// Returns `ProverError::PreconditionViolation` if `n` is zero.
  pub fn divide_by_vanishing(&self, n: usize) -> Result<(Self, Self), ProverError> {
    if n == 0 {
      return Err(ProverError::precondition("vanishing polynomial of an empty domain"));
    }
    let mut rem = self.coeffs.clone();
    if rem.len() <= n {
      return Ok((Self { coeffs: vec![] }, Self { coeffs: rem }));
    }

    // X^k = X^(k-n) * (X^n - 1) + X^(k-n)
    let mut quotient = vec![Scalar::ZERO; rem.len() - n];
    for k in (n..rem.len()).rev() {
      let lead = rem[k];
      quotient[k - n] = lead;
      rem[k - n] += lead;
      rem[k] = Scalar::ZERO;
    }
    rem.truncate(n);

    Ok((Self { coeffs: quotient }, Self { coeffs: rem }))
  }
}
