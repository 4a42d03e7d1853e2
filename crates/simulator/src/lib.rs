mod cancel;
pub mod config;
pub mod distribution;
mod error;
mod request;
mod run;
mod sample_set;
pub mod stats;

pub use cancel::CancelToken;
pub use config::SimConfig;
pub use error::SimError;
pub use request::{NetworkSpec, SamplingRequest};
pub use run::Simulator;
pub use sample_set::{Sample, SampleSet};
