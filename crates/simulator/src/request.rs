use crate::config::SimConfig;
use crate::error::SimError;
use boson::{BosonError, LossPlacement, LossyNetwork, Network, Occupation, Strategy};
use linalg::CMatrix;
use std::time::{SystemTime, UNIX_EPOCH};

/// Optical network as handed over by the circuit layer.
#[derive(Clone, Debug)]
pub enum NetworkSpec {
    Lossless(CMatrix),
    Lossy {
        matrix: CMatrix,
        transmissivities: Vec<f64>,
        placement: LossPlacement,
    },
}

impl NetworkSpec {
    pub fn lossy(matrix: CMatrix, transmissivities: Vec<f64>) -> Self {
        NetworkSpec::Lossy {
            matrix,
            transmissivities,
            placement: LossPlacement::Output,
        }
    }

    /// Physical mode count.
    pub fn modes(&self) -> usize {
        match self {
            NetworkSpec::Lossless(m) => m.rows,
            NetworkSpec::Lossy { matrix, .. } => matrix.rows,
        }
    }

    pub fn build(&self, tolerance: f64) -> Result<Network, BosonError> {
        match self {
            NetworkSpec::Lossless(m) => Network::lossless(m.clone(), tolerance),
            NetworkSpec::Lossy {
                matrix,
                transmissivities,
                placement,
            } => Ok(LossyNetwork::new(matrix, transmissivities, *placement, tolerance)?.into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SamplingRequest {
    pub input: Occupation,
    pub network: NetworkSpec,
    pub shots: usize,
    /// Master seed. Without one a seed is taken from the clock and the run is
    /// not reproducible.
    pub seed: Option<Vec<u8>>,
}

impl SamplingRequest {
    pub fn new(input: Occupation, network: NetworkSpec, shots: usize) -> Self {
        Self {
            input,
            network,
            shots,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: &[u8]) -> Self {
        self.seed = Some(seed.to_vec());
        self
    }

    pub(crate) fn seed_bytes(&self) -> Vec<u8> {
        match &self.seed {
            Some(s) => s.clone(),
            None => {
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or_default();
                let mut seed = nanos.to_be_bytes().to_vec();
                seed.extend_from_slice(&std::process::id().to_be_bytes());
                seed
            }
        }
    }

    /// Every precondition, checked before any permanent is evaluated.
    pub fn validate(&self, config: &SimConfig) -> Result<Network, SimError> {
        validate_input(&self.input, &self.network, config)
    }
}

pub(crate) fn validate_input(input: &Occupation, desc: &NetworkSpec, config: &SimConfig) -> Result<Network, SimError> {
    config.budget.check_modes(desc.modes())?;
    let network = desc.build(config.unitarity_tolerance)?;
    network.embed(input)?;
    config.budget.check_photons(input.photons())?;
    match config.strategy {
        Strategy::ModeByMode => config
            .budget
            .check_mode_by_mode(input.photons(), network.physical_modes())?,
        Strategy::PhotonByPhoton => {
            if let Some((mode, &photons)) = input.counts().iter().enumerate().find(|(_, &s)| s > 1) {
                return Err(BosonError::CollidingInput { mode, photons }.into());
            }
        }
    }
    Ok(network)
}
