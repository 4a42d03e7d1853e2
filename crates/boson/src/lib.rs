pub mod budget;
pub mod error;
pub mod fock;
pub mod loss;
pub mod network;
pub mod permanent;
mod photon;
pub mod probability;
pub mod reduction;
pub mod sampler;

pub use budget::Budget;
pub use error::BosonError;
pub use fock::Occupation;
pub use loss::{LossPlacement, LossyNetwork};
pub use network::Network;
pub use sampler::{sample, Strategy};
