/*!
# mini-monte

A compact library for sampling-based expectation estimation: plain Monte Carlo
expectation, circle-ratio π estimation, rejection sampling, importance
sampling, and a Metropolis-Hastings MCMC sampler with thinning and burn-in.

All samplers own their random number generator (a seedable [`rand::rngs::SmallRng`]),
so runs are reproducible when a seed is set and independent otherwise.

## Quick start

```rust
use mini_monte::core::ChainRunner;
use mini_monte::distributions::{GammaDensity, ProposalDistribution, RandomWalkProposal};
use mini_monte::metropolis_hastings::MetropolisHastings;
use mini_monte::stats::pooled_mean;

// Unnormalized Gamma(2.5, 1) target with true mean 2.5.
let target = GammaDensity::new(2.5, 1.0);
let proposal = RandomWalkProposal::new(1.0).set_seed(42);
let mut mh = MetropolisHastings::new(target, proposal, &[1.0], 2).set_seed(42);

// Let the chains forget their initialization, then record 500 samples
// per chain, keeping every 10th step.
mh.warm_up(1_000);
let samples = mh.run(500, 10).unwrap();
assert_eq!(samples.shape(), &[2, 500, 1]);

let mean = pooled_mean(&samples);
println!("estimated mean: {:.3} (true 2.5)", mean[0]);
```
*/

pub mod core;
pub mod distributions;
pub mod estimators;
pub mod io;
pub mod metropolis_hastings;
pub mod stats;
