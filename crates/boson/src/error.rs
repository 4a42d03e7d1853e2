use linalg::LinalgError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BosonError {
    #[error("{what}: expected {expected} modes, found {found}")]
    ModeCountMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("interferometer must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("interferometer is not unitary: deviation {deviation:e} exceeds tolerance {tolerance:e}")]
    NotUnitary { deviation: f64, tolerance: f64 },
    #[error("interferometer entry ({row}, {col}) is not finite")]
    NonFiniteEntry { row: usize, col: usize },
    #[error("reduction needs equal photon numbers, input has {input} and output has {output}")]
    PhotonCountMismatch { input: usize, output: usize },
    #[error("transmissivity of mode {mode} is {value}, must lie in [0, 1]")]
    InvalidTransmissivity { mode: usize, value: f64 },
    #[error("photon-by-photon sampling needs at most one photon per input mode, mode {mode} holds {photons}")]
    CollidingInput { mode: usize, photons: usize },
    #[error("conditional weights at mode {mode} sum to {total:e}")]
    VanishingWeights { mode: usize, total: f64 },
    #[error("probability at mode {mode} is {value:e}, negative beyond round-off")]
    NegativeProbability { mode: usize, value: f64 },
    #[error("permanent of order {order} is not finite")]
    NonFinitePermanent { order: usize },
    #[error("{what} = {requested} exceeds the configured limit of {limit}")]
    BudgetExceeded {
        what: &'static str,
        requested: u64,
        limit: u64,
    },
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

impl BosonError {
    /// Degenerate arithmetic rather than bad arguments.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            BosonError::VanishingWeights { .. }
                | BosonError::NegativeProbability { .. }
                | BosonError::NonFinitePermanent { .. }
        )
    }

    pub fn is_budget(&self) -> bool {
        matches!(self, BosonError::BudgetExceeded { .. })
    }
}
