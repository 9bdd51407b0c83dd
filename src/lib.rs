pub mod error;
pub mod model;
pub mod net;
pub mod params;
pub mod sim;
pub mod topo;
pub mod trace;

pub use error::{ConfigError, Error, SimulationError};

#[cfg(test)]
mod test;
