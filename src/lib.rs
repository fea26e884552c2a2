//! Evolutionary theory of behavior dynamics.
//!
//! A population of bit-string genomes emits one response per generation.
//! Reinforcement and punishment schedules evaluate the response, and a genetic
//! algorithm driven by a fitness density function reshapes the population
//! from the consequences.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConfigManager};
pub use data::ResultTable;
pub use engines::evolution::{Algorithm, Organism};
pub use engines::experiment::Experiment;
pub use engines::schedules::Schedule;
pub use error::{EtbdError, Result};
