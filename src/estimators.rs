/*!
Single-pass Monte Carlo estimators: plain expectation estimation,
circle-ratio π estimation, rejection sampling, and importance sampling.

None of these keep state across calls; each draws its samples, reduces them
once, and returns. They complement the iterative Metropolis-Hastings sampler
in [`crate::metropolis_hastings`].
*/

use ndarray::Array1;
use num_traits::Float;
use rand::Rng;

use crate::core::nan_to_zero;
use crate::distributions::{IidDistribution, TargetDistribution};

/// Estimates `E[f(X)]` by averaging `f` over `n_samples` iid draws from
/// `dist`.
///
/// # Example
///
/// ```rust
/// use mini_monte::distributions::{IidDistribution, NormalDistribution};
/// use mini_monte::estimators::expectation;
///
/// let mut dist = NormalDistribution::new(0.0, 1.0).set_seed(42);
/// // E[X^2] of a standard normal is 1.
/// let est: f64 = expectation(&mut dist, |x| x * x, 100_000);
/// assert!((est - 1.0).abs() < 0.05);
/// ```
pub fn expectation<T, D, F>(dist: &mut D, f: F, n_samples: usize) -> T
where
    T: Float,
    D: IidDistribution<T>,
    F: Fn(T) -> T,
{
    let mut sum = T::zero();
    for _ in 0..n_samples {
        sum = sum + f(dist.draw());
    }
    sum / T::from(n_samples).unwrap()
}

/// Estimates π by drawing `n_samples` uniform points in the unit square and
/// counting the fraction that land inside the unit quarter circle, scaled
/// by 4.
pub fn estimate_pi<T, R>(rng: &mut R, n_samples: usize) -> T
where
    T: Float,
    R: Rng,
{
    let mut inside: usize = 0;
    for _ in 0..n_samples {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y < 1.0 {
            inside += 1;
        }
    }
    T::from(4.0).unwrap() * T::from(inside).unwrap() / T::from(n_samples).unwrap()
}

/// The outcome of a rejection sampling run: the accepted draws and the
/// number of proposals it took to produce them.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectionOutcome<T> {
    /// The accepted subset, in proposal order.
    pub accepted: Vec<T>,
    /// Total number of proposals drawn.
    pub n_proposed: usize,
}

impl<T: Float> RejectionOutcome<T> {
    /// Mean of the accepted samples, or NaN if nothing was accepted.
    pub fn mean(&self) -> T {
        let sum = self
            .accepted
            .iter()
            .fold(T::zero(), |acc, &x| acc + x);
        sum / T::from(self.accepted.len()).unwrap()
    }

    /// Fraction of proposals that were accepted.
    pub fn acceptance_rate(&self) -> T {
        T::from(self.accepted.len()).unwrap() / T::from(self.n_proposed).unwrap()
    }
}

/// Rejection sampling: draws `n_samples` proposals and accepts draw `x` with
/// probability `p̂(x) / (k * q(x))`.
///
/// The envelope `k * q(x)` must dominate the unnormalized target `p̂`
/// everywhere for the accepted draws to follow the target; a tighter valid
/// `k` raises the acceptance rate without changing the accepted
/// distribution. Degenerate `0/0` ratios count as zero acceptance
/// probability.
pub fn rejection_sample<T, D, Q, R>(
    target: &D,
    proposal: &mut Q,
    k: T,
    n_samples: usize,
    rng: &mut R,
) -> RejectionOutcome<T>
where
    T: Float,
    D: TargetDistribution<T>,
    Q: IidDistribution<T>,
    R: Rng,
{
    let mut accepted = Vec::new();
    for _ in 0..n_samples {
        let x = proposal.draw();
        let ratio = nan_to_zero(target.unnorm_density(&[x]) / (k * proposal.pdf(x)));
        let u = T::from(rng.gen::<f64>()).unwrap();
        if u < ratio {
            accepted.push(x);
        }
    }
    RejectionOutcome {
        accepted,
        n_proposed: n_samples,
    }
}

/// The outcome of an importance sampling run: the weighted estimate and the
/// normalized weights (summing to 1).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceOutcome<T> {
    /// The self-normalized importance sampling estimate of the target mean.
    pub estimate: T,
    /// Normalized importance weights, one per draw.
    pub weights: Array1<T>,
}

/// Importance sampling: draws `n_samples` from `proposal`, weights each draw
/// by `p̂(x) / q(x)`, normalizes the weights to sum to 1, and returns the
/// weighted mean of the draws.
///
/// Degenerate `0/0` weights are treated as zero.
pub fn importance_sample<T, D, Q>(
    target: &D,
    proposal: &mut Q,
    n_samples: usize,
) -> ImportanceOutcome<T>
where
    T: Float,
    D: TargetDistribution<T>,
    Q: IidDistribution<T>,
{
    let mut draws = Vec::with_capacity(n_samples);
    let mut weights = Array1::<T>::zeros(n_samples);
    for i in 0..n_samples {
        let x = proposal.draw();
        weights[i] = nan_to_zero(target.unnorm_density(&[x]) / proposal.pdf(x));
        draws.push(x);
    }

    let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);
    weights.mapv_inplace(|w| w / total);

    let estimate = draws
        .iter()
        .zip(weights.iter())
        .fold(T::zero(), |acc, (&x, &w)| acc + x * w);

    ImportanceOutcome { estimate, weights }
}
