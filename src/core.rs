/*!
Chain plumbing shared by the MCMC samplers: the [`MarkovChain`] step
abstraction, single-chain runners with a thinning interval, and the
[`ChainRunner`] trait that executes every chain of a sampler in parallel.
*/

use indicatif::ProgressBar;
use indicatif::{MultiProgress, ProgressStyle};
use ndarray::{Array2, Array3, Axis, ShapeError};
use num_traits::Float;
use rayon::prelude::*;

/// Maps NaN to zero, leaving every other value untouched.
///
/// Degenerate density ratios (0/0) must act as "no density" rather than
/// poisoning the acceptance comparison, so every ratio the samplers compute
/// goes through this guard.
pub fn nan_to_zero<T: Float>(x: T) -> T {
    if x.is_nan() {
        T::zero()
    } else {
        x
    }
}

pub trait MarkovChain<T> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> &Vec<T>;

    /// Returns the current state without stepping.
    fn current_state(&self) -> &Vec<T>;
}

/// Runs a single chain, recording `n_samples` states.
///
/// Each recorded state is preceded by `thin` proposal steps, so the chain
/// advances `n_samples * thin` times in total. A `thin` of zero is treated
/// as one; the output always holds exactly `n_samples` rows.
pub fn run_chain<T, M>(chain: &mut M, n_samples: usize, thin: usize) -> Array2<T>
where
    M: MarkovChain<T>,
    T: Float,
{
    let thin = thin.max(1);
    let dim = chain.current_state().len();
    let mut out = Array2::<T>::zeros((n_samples, dim));

    for i in 0..n_samples {
        for _ in 0..thin {
            chain.step();
        }
        let state = chain.current_state();
        for (slot, &x) in out.row_mut(i).iter_mut().zip(state.iter()) {
            *slot = x;
        }
    }

    out
}

/// Same as [`run_chain`], but advances the given progress bar once per
/// recorded sample.
pub fn run_chain_with_progress<T, M>(
    chain: &mut M,
    n_samples: usize,
    thin: usize,
    pb: &ProgressBar,
) -> Array2<T>
where
    M: MarkovChain<T>,
    T: Float,
{
    let thin = thin.max(1);
    let dim = chain.current_state().len();
    let mut out = Array2::<T>::zeros((n_samples, dim));

    pb.set_length(n_samples as u64);

    for i in 0..n_samples {
        for _ in 0..thin {
            chain.step();
        }
        let state = chain.current_state();
        for (slot, &x) in out.row_mut(i).iter_mut().zip(state.iter()) {
            *slot = x;
        }
        pb.inc(1);
    }

    out
}

/// A trait for anything that owns multiple Markov chains.
/// - `T` is the state element type (e.g. `f64`).
/// - `Chain` is the chain type stored by this sampler.
pub trait HasChains<T> {
    type Chain: MarkovChain<T> + Send;

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<T>: HasChains<T>
where
    T: Float + Send + Sync,
{
    /// Runs all chains in parallel, recording `n_samples` states per chain
    /// with thinning interval `thin`.
    ///
    /// Returns an array of shape `(n_chains, n_samples, dim)`.
    fn run(&mut self, n_samples: usize, thin: usize) -> Result<Array3<T>, ShapeError> {
        let results: Vec<Array2<T>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_samples, thin))
            .collect();

        stack_chains(&results)
    }

    /// Like [`ChainRunner::run`], with one progress bar per chain.
    fn run_progress(&mut self, n_samples: usize, thin: usize) -> Result<Array3<T>, ShapeError> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("Expected progress bar template to parse.")
            .progress_chars("##-");

        let results: Vec<Array2<T>> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(n_samples as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let samples = run_chain_with_progress(chain, n_samples, thin, &pb);
                pb.finish_with_message("Done!");
                samples
            })
            .collect();

        stack_chains(&results)
    }

    /// Advances every chain `n_steps` times without recording anything.
    ///
    /// This is the chained burn-in mode: a subsequent `run` continues from
    /// wherever the chains ended up.
    fn warm_up(&mut self, n_steps: usize) {
        self.chains_mut().par_iter_mut().for_each(|chain| {
            for _ in 0..n_steps {
                chain.step();
            }
        });
    }
}

fn stack_chains<T: Float>(per_chain: &[Array2<T>]) -> Result<Array3<T>, ShapeError> {
    let views: Vec<_> = per_chain.iter().map(|m| m.view()).collect();
    ndarray::stack(Axis(0), &views)
}

impl<T, S> ChainRunner<T> for S
where
    T: Float + Send + Sync,
    S: HasChains<T>,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A deterministic chain counting up by one per step.
    struct Counter {
        state: Vec<f64>,
    }

    impl MarkovChain<f64> for Counter {
        fn step(&mut self) -> &Vec<f64> {
            self.state[0] += 1.0;
            &self.state
        }

        fn current_state(&self) -> &Vec<f64> {
            &self.state
        }
    }

    #[test]
    fn nan_to_zero_guards_degenerate_ratios() {
        assert_eq!(nan_to_zero(f64::NAN), 0.0);
        assert_eq!(nan_to_zero(0.5), 0.5);
        assert_eq!(nan_to_zero(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn run_chain_records_every_thin_th_state() {
        let mut chain = Counter { state: vec![0.0] };
        let out = run_chain(&mut chain, 4, 3);
        assert_eq!(out.shape(), &[4, 1]);
        assert_eq!(out.column(0).to_vec(), vec![3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn run_chain_sample_count_is_independent_of_thin() {
        for thin in [0, 1, 7, 50] {
            let mut chain = Counter { state: vec![0.0] };
            let out = run_chain(&mut chain, 10, thin);
            assert_eq!(out.shape(), &[10, 1]);
        }
    }
}
