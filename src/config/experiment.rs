use super::traits::{invalid, ConfigSection};
use crate::error::EtbdError;
use serde::{Deserialize, Serialize};

/// Settings for the repetition/generation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSettings {
    pub reps: usize,
    pub gens: usize,
    /// Re-randomize the population at the start of every arrangement.
    pub reinitialize_population: bool,
    /// Master seed; repetition seeds are derived from it. Entropy when absent.
    pub seed: Option<u64>,
    /// Output path without extension.
    pub file_stub: String,
    pub log_progress: bool,
    pub progress_interval: usize,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            reps: 1,
            gens: 1000,
            reinitialize_population: true,
            seed: None,
            file_stub: "etbd_output".to_string(),
            log_progress: true,
            progress_interval: 1000,
        }
    }
}

impl ConfigSection for ExperimentSettings {
    fn section_name() -> &'static str {
        "experiment"
    }

    fn validate(&self) -> Result<(), EtbdError> {
        if self.reps == 0 {
            return Err(invalid::<Self>("Number of repetitions must be positive"));
        }
        if self.gens == 0 {
            return Err(invalid::<Self>("Number of generations must be positive"));
        }
        if self.progress_interval == 0 {
            return Err(invalid::<Self>("Progress interval must be positive"));
        }
        if self.file_stub.trim().is_empty() {
            return Err(invalid::<Self>("Output file stub must not be empty"));
        }
        Ok(())
    }
}
