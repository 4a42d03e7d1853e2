use crate::error::BosonError;
use crate::network::{validate_unitary, Network};
use linalg::{CMatrix, C64};

/// Where the loss beam splitters sit relative to the interferometer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LossPlacement {
    Input,
    #[default]
    Output,
}

/// Interferometer with per-mode loss realised as a beam splitter coupling
/// physical mode `i` to environment mode `d + i`. The augmented 2d x 2d
/// matrix stays unitary; its physical block is sub-unitary.
#[derive(Clone, Debug)]
pub struct LossyNetwork {
    augmented: CMatrix,
    transmissivities: Vec<f64>,
    placement: LossPlacement,
}

pub fn validate_transmissivities(eta: &[f64], modes: usize) -> Result<(), BosonError> {
    if eta.len() != modes {
        return Err(BosonError::ModeCountMismatch {
            what: "transmissivity vector",
            expected: modes,
            found: eta.len(),
        });
    }
    for (mode, &value) in eta.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(BosonError::InvalidTransmissivity { mode, value });
        }
    }
    Ok(())
}

/// [[√η, -√(1-η)], [√(1-η), √η]]
fn loss_block(eta: f64) -> [[C64; 2]; 2] {
    let t = eta.sqrt();
    let r = (1.0 - eta).sqrt();
    [
        [C64::new(t, 0.0), C64::new(-r, 0.0)],
        [C64::new(r, 0.0), C64::new(t, 0.0)],
    ]
}

impl LossyNetwork {
    pub fn new(u: &CMatrix, transmissivities: &[f64], placement: LossPlacement, tolerance: f64) -> Result<Self, BosonError> {
        validate_unitary(u, tolerance)?;
        let d = u.rows;
        validate_transmissivities(transmissivities, d)?;

        let mut coupler = CMatrix::identity(2 * d);
        for (i, &eta) in transmissivities.iter().enumerate() {
            coupler.apply_two_mode(i, d + i, loss_block(eta))?;
        }
        let extended = u.direct_sum(&CMatrix::identity(d));
        let augmented = match placement {
            LossPlacement::Output => coupler.matmul(&extended)?,
            LossPlacement::Input => extended.matmul(&coupler)?,
        };

        Ok(Self {
            augmented,
            transmissivities: transmissivities.to_vec(),
            placement,
        })
    }

    /// Same transmissivity on every mode, applied at the output.
    pub fn uniform(u: &CMatrix, eta: f64, tolerance: f64) -> Result<Self, BosonError> {
        Self::new(u, &vec![eta; u.rows], LossPlacement::Output, tolerance)
    }

    pub fn augmented(&self) -> &CMatrix {
        &self.augmented
    }

    pub fn physical_modes(&self) -> usize {
        self.transmissivities.len()
    }

    pub fn transmissivities(&self) -> &[f64] {
        &self.transmissivities
    }

    pub fn placement(&self) -> LossPlacement {
        self.placement
    }

    /// The d x d block acting on physical modes only.
    pub fn physical_block(&self) -> CMatrix {
        let d = self.physical_modes();
        self.augmented.top_left(d, d)
    }

    /// Singular values of the physical block, all at most 1.
    pub fn singular_values(&self) -> Vec<f64> {
        self.physical_block().singular_values()
    }

    pub fn into_network(self) -> Network {
        let d = self.physical_modes();
        Network::from_augmented(self.augmented, d)
    }
}

impl From<LossyNetwork> for Network {
    fn from(value: LossyNetwork) -> Self {
        value.into_network()
    }
}
