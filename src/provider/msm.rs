//! This module provides the multi-scalar multiplication routines used by the prover.
//! The bucket method is adapted from halo2, with a configurable window width and
//! an accumulator input so that partial sums can be chained across ranges.
use crate::{
  config::{DEFAULT_WINDOW_BITS, MAX_WINDOW_BITS},
  errors::ProverError,
  scheduler::{fan_in, fan_out},
  start_span,
};
use ff::{Field, PrimeField};
use group::Group;
use halo2curves::CurveAffine;
use rayon::current_num_threads;
use tracing::info;

#[derive(Clone, Copy)]
enum Bucket<C: CurveAffine> {
  None,
  Affine(C),
  Projective(C::Curve),
}

impl<C: CurveAffine> Bucket<C> {
  fn add_assign(&mut self, other: &C) {
    *self = match *self {
      Bucket::None => Bucket::Affine(*other),
      Bucket::Affine(a) => Bucket::Projective(a + *other),
      Bucket::Projective(a) => Bucket::Projective(a + other),
    }
  }

  fn add(self, other: C::Curve) -> C::Curve {
    match self {
      Bucket::None => other,
      Bucket::Affine(a) => other + a,
      Bucket::Projective(a) => other + a,
    }
  }
}

/// Number of `window_bits`-wide windows needed to cover a scalar of `F`.
pub fn num_windows<F: PrimeField>(window_bits: usize) -> usize {
  (F::NUM_BITS as usize).div_ceil(window_bits)
}

/// Returns the `segment`-th window of `c` bits of a little-endian scalar encoding.
fn get_at(segment: usize, c: usize, bytes: &[u8]) -> usize {
  let skip_bits = segment * c;
  let skip_bytes = skip_bits / 8;

  if skip_bytes >= bytes.len() {
    return 0;
  }

  let mut v = [0; 8];
  for (v, o) in v.iter_mut().zip(bytes[skip_bytes..].iter()) {
    *v = *o;
  }

  let mut tmp = u64::from_le_bytes(v);
  tmp >>= skip_bits - (skip_bytes * 8);
  tmp %= 1 << c;

  tmp as usize
}

fn cpu_msm_serial<C: CurveAffine>(coeffs: &[C::Scalar], bases: &[C], c: usize) -> C::Curve {
  // Unit scalars are accumulated directly; zero scalars contribute nothing
  let mut boolean_sum = C::Curve::identity();
  let mut non_boolean = Vec::new();

  for (s, b) in coeffs.iter().zip(bases) {
    if *s == C::Scalar::ONE {
      boolean_sum += b;
    } else if *s != C::Scalar::ZERO {
      non_boolean.push((s.to_repr(), *b));
    }
  }

  if non_boolean.is_empty() {
    return boolean_sum;
  }

  let segments = num_windows::<C::Scalar>(c);
  let non_boolean_sum = (0..segments)
    .rev()
    .fold(C::Curve::identity(), |mut acc, segment| {
      // shift the windows processed so far up by c bits
      (0..c).for_each(|_| acc = acc.double());

      // We don't need the "zero" bucket, so we only have 2^c - 1 buckets.
      let mut buckets = vec![Bucket::None; (1 << c) - 1];

      for (repr, base) in non_boolean.iter() {
        let coeff = get_at(segment, c, repr.as_ref());
        if coeff != 0 {
          buckets[coeff - 1].add_assign(base);
        }
      }

      // Summation by parts
      // e.g. 3a + 2b + 1c = a +
      //                    (a) + b +
      //                    ((a) + b) + c
      let mut running_sum = C::Curve::identity();
      for exp in buckets.into_iter().rev() {
        running_sum = exp.add(running_sum);
        acc += &running_sum;
      }
      acc
    });

  boolean_sum + non_boolean_sum
}

/// Computes `acc + Σ scalars[i] · bases[i]` on the current thread with the
/// fixed-window bucket method.
///
/// # Errors
/// Returns `ProverError::InvalidInputLength` if scalars and bases have different lengths.
/// Returns `ProverError::PreconditionViolation` if `window_bits` is outside `1..=MAX_WINDOW_BITS`.
pub fn msm_with_window<C: CurveAffine>(
  scalars: &[C::Scalar],
  bases: &[C],
  acc: C::Curve,
  window_bits: usize,
) -> Result<C::Curve, ProverError> {
  if scalars.len() != bases.len() {
    return Err(ProverError::InvalidInputLength);
  }
  if !(1..=MAX_WINDOW_BITS).contains(&window_bits) {
    return Err(ProverError::precondition(format!(
      "window width {window_bits} is outside 1..={MAX_WINDOW_BITS}"
    )));
  }

  Ok(acc + cpu_msm_serial(scalars, bases, window_bits))
}

/// Performs a multi-scalar-multiplication with the default window width.
///
/// When `use_parallelism_internally` is set, the input is split into one
/// contiguous range per rayon thread and the partial sums are folded in order.
///
/// # Errors
/// Returns `ProverError::InvalidInputLength` if scalars and bases have different lengths.
pub fn msm<C: CurveAffine>(
  scalars: &[C::Scalar],
  bases: &[C],
  use_parallelism_internally: bool,
) -> Result<C::Curve, ProverError> {
  let (_msm_span, msm_t) = start_span!("msm", size = scalars.len());

  if scalars.len() != bases.len() {
    return Err(ProverError::InvalidInputLength);
  }

  let num_threads = if use_parallelism_internally {
    current_num_threads()
  } else {
    1
  };

  let partials = fan_out(scalars.len(), num_threads, |range| {
    msm_with_window(
      &scalars[range.clone()],
      &bases[range],
      C::Curve::identity(),
      DEFAULT_WINDOW_BITS,
    )
  })?;
  let result = fan_in(partials, C::Curve::identity(), |sum, evl| sum + evl);

  info!(elapsed_ms = %msm_t.elapsed().as_millis(), size = scalars.len(), "msm");
  Ok(result)
}

/// Reference double-and-add evaluation of `Σ scalars[i] · bases[i]`.
///
/// Each scalar is processed independently, from its most significant bit down.
///
/// # Errors
/// Returns `ProverError::InvalidInputLength` if scalars and bases have different lengths.
pub fn naive_msm<C: CurveAffine>(scalars: &[C::Scalar], bases: &[C]) -> Result<C::Curve, ProverError> {
  if scalars.len() != bases.len() {
    return Err(ProverError::InvalidInputLength);
  }

  Ok(
    scalars
      .iter()
      .zip(bases)
      .fold(C::Curve::identity(), |sum, (scalar, base)| {
        let repr = scalar.to_repr();
        let term = repr
          .as_ref()
          .iter()
          .rev()
          .flat_map(|byte| (0..8u32).rev().map(move |i| (byte >> i) & 1 == 1))
          .fold(C::Curve::identity(), |acc, bit| {
            let acc = acc.double();
            if bit { acc + *base } else { acc }
          });
        sum + term
      }),
  )
}
