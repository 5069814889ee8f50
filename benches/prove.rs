use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ff::Field;
use halo2curves::group::{Curve, Group};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

use groth16_prover::{
  Groth16Prover, ProverConfig, ProvingKey,
  provider::{
    bn254::{G1, G1Affine, G2, G2Affine, Scalar},
    msm::msm_with_window,
  },
  qap::SparseColumn,
};

fn random_g1(n: usize, rng: &mut StdRng) -> Vec<G1Affine> {
  let mut points = vec![G1Affine::default(); n];
  let projective = (0..n).map(|_| G1::random(&mut *rng)).collect::<Vec<_>>();
  G1::batch_normalize(&projective, &mut points);
  points
}

fn random_g2(n: usize, rng: &mut StdRng) -> Vec<G2Affine> {
  let mut points = vec![G2Affine::default(); n];
  let projective = (0..n).map(|_| G2::random(&mut *rng)).collect::<Vec<_>>();
  G2::batch_normalize(&projective, &mut points);
  points
}

fn random_columns(n_vars: usize, domain_size: usize, rng: &mut StdRng) -> Vec<SparseColumn<Scalar>> {
  let mut columns = Vec::with_capacity(n_vars);
  for _ in 0..n_vars {
    let mut column = SparseColumn::new();
    for _ in 0..3 {
      column.insert(rng.gen_range(0..domain_size), Scalar::random(&mut *rng));
    }
    columns.push(column);
  }
  columns
}

// a structurally valid key with random points; proofs from it do not verify
fn random_key(log_size: usize, rng: &mut StdRng) -> ProvingKey {
  let n_vars = 1 << log_size;
  let domain_size = 1 << log_size;
  ProvingKey {
    n_vars,
    n_public: 1,
    domain_size,
    a: random_g1(n_vars, rng),
    b1: random_g1(n_vars, rng),
    b2: random_g2(n_vars, rng),
    c: random_g1(n_vars, rng),
    h_exps: random_g1(domain_size, rng),
    pols_a: random_columns(n_vars, domain_size, rng),
    pols_b: random_columns(n_vars, domain_size, rng),
    vk_alpha_1: G1::random(&mut *rng).to_affine(),
    vk_beta_1: G1::random(&mut *rng).to_affine(),
    vk_beta_2: G2::random(&mut *rng).to_affine(),
    vk_delta_1: G1::random(&mut *rng).to_affine(),
    vk_delta_2: G2::random(&mut *rng).to_affine(),
  }
}

fn bench_msm_window(c: &mut Criterion) {
  let mut rng = StdRng::seed_from_u64(1);
  let n = 1 << 12;
  let scalars = (0..n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();
  let bases = random_g1(n, &mut rng);

  let mut group = c.benchmark_group("msm_window");
  for window_bits in [4, 6, 8, 10] {
    group.bench_function(format!("2^12/w={window_bits}"), |b| {
      b.iter(|| {
        msm_with_window(
          black_box(&scalars),
          black_box(&bases),
          G1::identity(),
          window_bits,
        )
      })
    });
  }
  group.finish();
}

fn bench_prove(c: &mut Criterion) {
  let mut rng = StdRng::seed_from_u64(2);
  let mut group = c.benchmark_group("prove");
  for log_size in [8, 10, 12] {
    let pk = random_key(log_size, &mut rng);
    let witness = (0..pk.n_vars)
      .map(|i| if i == 0 { Scalar::ONE } else { Scalar::random(&mut rng) })
      .collect::<Vec<_>>();
    let r = Scalar::random(&mut rng);
    let s = Scalar::random(&mut rng);

    for workers in [1, 4] {
      let prover = Groth16Prover::new(ProverConfig::default().with_num_workers(workers));
      group.bench_function(format!("2^{log_size}/workers={workers}"), |b| {
        b.iter(|| prover.prove_with_blinding(black_box(&pk), black_box(&witness), &r, &s))
      });
    }
  }
  group.finish();
}

criterion_group! {
name = groth16;
config = Criterion::default()
  .warm_up_time(Duration::from_millis(1000))
  .sample_size(10);
targets = bench_msm_window, bench_prove
}
criterion_main!(groth16);
