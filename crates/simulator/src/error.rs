use boson::BosonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Boson(#[from] BosonError),
    #[error("sampling request cancelled before this shot started")]
    Cancelled,
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid value `{value}` for {key}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl SimError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SimError::Cancelled)
    }

    /// The underlying core error, if any.
    pub fn boson(&self) -> Option<&BosonError> {
        match self {
            SimError::Boson(e) => Some(e),
            _ => None,
        }
    }
}
