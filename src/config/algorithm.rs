use super::traits::{invalid, ConfigSection};
use crate::error::EtbdError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSettings {
    pub fdf_shape: FdfShape,
    /// FDF mean used when the delivering schedule has none of its own,
    /// and when no consequence was delivered at all.
    pub fdf_mean: f64,
    pub selection: SelectionPolicy,
    pub recombination: Recombination,
    /// Cut points for `multi_point` recombination.
    pub crossover_points: usize,
    pub mutation: MutationMethod,
    pub mutation_rate: f64,
    pub extinction: ExtinctionPolicy,
}

/// Shape of the fitness density function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdfShape {
    #[default]
    Linear,
    Exponential,
}

/// Maps an FDF sample to a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Parent is the genome whose distance to the target is nearest the sample.
    #[default]
    FitnessMatch,
    /// Sample sets the width of the top-ranked window a parent is drawn from.
    RankWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recombination {
    #[default]
    Bitwise,
    SinglePoint,
    MultiPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationMethod {
    /// Every bit flips independently with `mutation_rate`.
    BitFlip,
    /// Each child, with `mutation_rate`, has one random bit flipped.
    #[default]
    RandomIndividual,
}

/// What happens in a generation without reinforcement or punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtinctionPolicy {
    /// Uniform fitness: parents are drawn uniformly at random.
    #[default]
    RandomMating,
    /// No recombination; the population carries over and only mutates.
    Persist,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            fdf_shape: FdfShape::Linear,
            fdf_mean: 40.0,
            selection: SelectionPolicy::FitnessMatch,
            recombination: Recombination::Bitwise,
            crossover_points: 2,
            mutation: MutationMethod::RandomIndividual,
            mutation_rate: 0.1,
            extinction: ExtinctionPolicy::RandomMating,
        }
    }
}

impl ConfigSection for AlgorithmSettings {
    fn section_name() -> &'static str {
        "algorithm"
    }

    fn validate(&self) -> Result<(), EtbdError> {
        if !self.fdf_mean.is_finite() || self.fdf_mean <= 0.0 {
            return Err(invalid::<Self>("FDF mean must be a positive number"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid::<Self>("Mutation rate must be between 0 and 1"));
        }
        if self.recombination == Recombination::MultiPoint && self.crossover_points == 0 {
            return Err(invalid::<Self>(
                "Multi-point recombination needs at least one crossover point",
            ));
        }
        Ok(())
    }
}
