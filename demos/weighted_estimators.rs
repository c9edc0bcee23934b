//! Rejection and importance sampling against the same unnormalized
//! Gamma(2.5, 1) target, using a heavy-tailed Cauchy proposal, with
//! estimate-vs-true output for each method.

use mini_monte::distributions::{CauchyDistribution, GammaDensity, IidDistribution};
use mini_monte::estimators::{importance_sample, rejection_sample};

use rand::rngs::SmallRng;
use rand::SeedableRng;

fn main() {
    const N_SAMPLES: usize = 100_000;
    const SEED: u64 = 42;
    // envelope scale: k * q must dominate the unnormalized target everywhere
    const K: f64 = 12.0;

    let target = GammaDensity::new(2.5, 1.0);
    let true_mean = 2.5;

    let mut proposal = CauchyDistribution::new(2.0, 2.0).set_seed(SEED);
    let mut rng = SmallRng::seed_from_u64(SEED + 1);
    let rejection = rejection_sample(&target, &mut proposal, K, N_SAMPLES, &mut rng);
    println!(
        "Rejection sampling:  estimate {:.4}, true {:.1}, accepted {}/{} ({:.1}%)",
        rejection.mean(),
        true_mean,
        rejection.accepted.len(),
        rejection.n_proposed,
        100.0 * rejection.acceptance_rate()
    );

    let mut proposal = CauchyDistribution::new(2.0, 2.0).set_seed(SEED);
    let importance = importance_sample(&target, &mut proposal, N_SAMPLES);
    println!(
        "Importance sampling: estimate {:.4}, true {:.1} (weights sum to {:.6})",
        importance.estimate,
        true_mean,
        importance.weights.sum()
    );
}
