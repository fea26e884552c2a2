use super::traits::{invalid, ConfigSection};
use crate::error::EtbdError;
use serde::{Deserialize, Serialize};

/// Settings of a single contingency.
///
/// The consequence kind, response class and schedule parameters are fixed for
/// the lifetime of every [`Schedule`](crate::engines::schedules::Schedule)
/// built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub kind: ConsequenceKind,
    pub schedule_type: ScheduleType,
    /// Ratio requirement or interval length in generations. Ignored by extinction.
    #[serde(default = "default_schedule_value")]
    pub value: u32,
    pub response_class: ResponseClass,
    /// Consequence magnitude; falls back to the algorithm's FDF mean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdf_mean: Option<f64>,
    #[serde(default)]
    pub fitness_target: FitnessTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceKind {
    Reinforcement,
    Punishment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    FixedRatio,
    /// Requirement drawn uniformly from `1..=2n-1` after every delivery.
    VariableRatio,
    /// Every in-class response is reinforced with probability `1/n`.
    RandomRatio,
    FixedInterval,
    /// Interval drawn uniformly from `1..=2t-1` after every delivery.
    VariableInterval,
    /// A consequence is set up with probability `1/t` each generation.
    RandomInterval,
    Extinction,
}

/// Inclusive band of phenotypes that count as the operant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseClass {
    pub lower: u32,
    pub upper: u32,
}

/// Which value a delivered consequence pulls the population toward (or away from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessTarget {
    #[default]
    Emission,
    ClassCenter,
    NearestBound,
}

fn default_schedule_value() -> u32 {
    1
}

impl ResponseClass {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    pub fn center(&self) -> u32 {
        self.lower + (self.upper - self.lower) / 2
    }
}

impl FitnessTarget {
    /// Resolves the target phenotype for an emission that produced a consequence.
    pub fn resolve(&self, class: &ResponseClass, emission: u32) -> u32 {
        match self {
            FitnessTarget::Emission => emission,
            FitnessTarget::ClassCenter => class.center(),
            FitnessTarget::NearestBound => {
                if emission.abs_diff(class.lower) <= emission.abs_diff(class.upper) {
                    class.lower
                } else {
                    class.upper
                }
            }
        }
    }
}

impl ScheduleSettings {
    pub fn new(
        kind: ConsequenceKind,
        schedule_type: ScheduleType,
        value: u32,
        response_class: ResponseClass,
    ) -> Self {
        Self {
            kind,
            schedule_type,
            value,
            response_class,
            fdf_mean: None,
            fitness_target: FitnessTarget::Emission,
        }
    }

    pub fn reinforcement(schedule_type: ScheduleType, value: u32, lower: u32, upper: u32) -> Self {
        Self::new(
            ConsequenceKind::Reinforcement,
            schedule_type,
            value,
            ResponseClass::new(lower, upper),
        )
    }

    pub fn punishment(schedule_type: ScheduleType, value: u32, lower: u32, upper: u32) -> Self {
        Self::new(
            ConsequenceKind::Punishment,
            schedule_type,
            value,
            ResponseClass::new(lower, upper),
        )
    }

    pub fn with_fdf_mean(mut self, fdf_mean: f64) -> Self {
        self.fdf_mean = Some(fdf_mean);
        self
    }

    pub fn with_fitness_target(mut self, fitness_target: FitnessTarget) -> Self {
        self.fitness_target = fitness_target;
        self
    }

    pub fn is_reinforcement_schedule(&self) -> bool {
        self.kind == ConsequenceKind::Reinforcement
    }

    /// Checks the response class against the organism's phenotype range.
    pub fn validate_range(&self, max_phenotype: u32) -> Result<(), EtbdError> {
        if self.response_class.upper > max_phenotype {
            return Err(invalid::<Self>(format!(
                "Response class upper bound {} exceeds the largest phenotype {}",
                self.response_class.upper, max_phenotype
            )));
        }
        Ok(())
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            kind: ConsequenceKind::Reinforcement,
            schedule_type: ScheduleType::RandomInterval,
            value: 20,
            response_class: ResponseClass::new(471, 511),
            fdf_mean: None,
            fitness_target: FitnessTarget::Emission,
        }
    }
}

impl ConfigSection for ScheduleSettings {
    fn section_name() -> &'static str {
        "schedule"
    }

    fn validate(&self) -> Result<(), EtbdError> {
        if self.response_class.lower > self.response_class.upper {
            return Err(invalid::<Self>(format!(
                "Response class lower bound {} is above upper bound {}",
                self.response_class.lower, self.response_class.upper
            )));
        }
        if self.schedule_type != ScheduleType::Extinction && self.value == 0 {
            return Err(invalid::<Self>("Ratio or interval value must be at least 1"));
        }
        if let Some(mean) = self.fdf_mean {
            if !mean.is_finite() || mean <= 0.0 {
                return Err(invalid::<Self>("FDF mean must be a positive number"));
            }
        }
        Ok(())
    }
}

/// Schedules that run concurrently against the same organism.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrangementSettings {
    pub schedules: Vec<ScheduleSettings>,
}

impl ArrangementSettings {
    pub fn new(schedules: Vec<ScheduleSettings>) -> Self {
        Self { schedules }
    }
}

impl ConfigSection for ArrangementSettings {
    fn section_name() -> &'static str {
        "arrangement"
    }

    fn validate(&self) -> Result<(), EtbdError> {
        if self.schedules.is_empty() {
            return Err(invalid::<Self>("An arrangement needs at least one schedule"));
        }
        for schedule in &self.schedules {
            schedule.validate()?;
        }
        Ok(())
    }
}
