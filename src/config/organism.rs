use super::traits::{invalid, ConfigSection};
use crate::error::EtbdError;
use serde::{Deserialize, Serialize};

/// Widest genome whose phenotype still fits in a `u32`.
pub const MAX_GENOME_BITS: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismSettings {
    pub population_size: usize,
    pub genome_bits: usize,
    pub encoding: Encoding,
}

/// How a genome's bits map to its phenotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Binary,
    Gray,
}

impl OrganismSettings {
    /// Largest phenotype a genome of this width decodes to.
    pub fn max_phenotype(&self) -> u32 {
        if self.genome_bits >= MAX_GENOME_BITS {
            u32::MAX
        } else {
            (1u32 << self.genome_bits) - 1
        }
    }
}

impl Default for OrganismSettings {
    fn default() -> Self {
        Self {
            population_size: 100,
            genome_bits: 10,
            encoding: Encoding::Binary,
        }
    }
}

impl ConfigSection for OrganismSettings {
    fn section_name() -> &'static str {
        "organism"
    }

    fn validate(&self) -> Result<(), EtbdError> {
        if self.population_size == 0 {
            return Err(invalid::<Self>("Population size must be positive"));
        }
        if self.genome_bits == 0 || self.genome_bits > MAX_GENOME_BITS {
            return Err(invalid::<Self>(format!(
                "Genome width must be between 1 and {} bits",
                MAX_GENOME_BITS
            )));
        }
        Ok(())
    }
}
