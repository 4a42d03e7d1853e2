use crate::cancel::CancelToken;
use crate::config::SimConfig;
use crate::distribution::{outcome_probability, probability_table};
use crate::error::SimError;
use crate::request::{validate_input, NetworkSpec, SamplingRequest};
use crate::sample_set::{Sample, SampleSet};
use boson::{sample, Network, Occupation, Strategy};
use rayon::prelude::*;
use rng::ONDRng;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Entry point for the surrounding circuit layer. Holds only configuration;
/// every request carries its own input, network and seed.
#[derive(Clone, Debug, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Draws `request.shots` independent samples. Shot `i` uses the stream
    /// `ONDRng::for_shot(seed, i)`, so the output does not depend on the
    /// thread count.
    pub fn run(&self, request: &SamplingRequest, cancel: &CancelToken) -> Result<SampleSet, SimError> {
        let network = request.validate(&self.config)?;
        let seed = request.seed_bytes();
        debug!(
            modes = network.physical_modes(),
            total_modes = network.total_modes(),
            photons = request.input.photons(),
            shots = request.shots,
            strategy = %self.config.strategy,
            "sampling request validated"
        );

        let start = Instant::now();
        let shots = if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()?;
            pool.install(|| run_shots(&network, &request.input, request.shots, &seed, self.config.strategy, cancel))
        } else {
            run_shots(&network, &request.input, request.shots, &seed, self.config.strategy, cancel)
        };
        let set = SampleSet::new(shots);

        let failed = set.failures().count();
        let cancelled = set.cancelled();
        if failed > cancelled {
            warn!(failed = failed - cancelled, "shots failed");
        }
        info!(
            requested = request.shots,
            produced = set.len() - failed,
            failed = failed - cancelled,
            cancelled,
            secs = start.elapsed().as_secs_f64(),
            "sampling request finished"
        );
        Ok(set)
    }

    /// Exact probability of one physical outcome. Photon-number mismatches on
    /// a lossless network give 0.
    pub fn probability(&self, input: &Occupation, output: &Occupation, network: &NetworkSpec) -> Result<f64, SimError> {
        let network = validate_input(input, network, &self.config)?;
        Ok(outcome_probability(&network, input, output)?)
    }

    pub fn probability_table(&self, input: &Occupation, network: &NetworkSpec) -> Result<Vec<(Occupation, f64)>, SimError> {
        let network = validate_input(input, network, &self.config)?;
        Ok(probability_table(&network, input, &self.config.budget)?)
    }
}

fn run_shots(
    network: &Network,
    input: &Occupation,
    shots: usize,
    seed: &[u8],
    strategy: Strategy,
    cancel: &CancelToken,
) -> Vec<Result<Sample, SimError>> {
    (0..shots)
        .into_par_iter()
        .map(|shot| {
            if cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
            let mut rng = ONDRng::for_shot(seed, shot as u64);
            let outcome = sample(network, input, strategy, &mut rng)?;
            Ok(Sample { shot, outcome })
        })
        .collect()
}
