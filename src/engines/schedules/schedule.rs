use crate::config::{ConfigSection, ScheduleSettings, ScheduleType};
use crate::error::EtbdError;
use rand::Rng;

/// Internal counters of a contingency. Only [`Schedule::run`] advances them.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleState {
    /// In-class responses counted toward the current requirement.
    Ratio { count: u32, requirement: u32 },
    /// Each in-class response pays off with this probability.
    RandomRatio { probability: f64 },
    /// Generations elapsed since the last delivery, against the current interval.
    Interval { elapsed: u32, interval: u32 },
    /// A consequence is held until the next in-class response once armed.
    RandomInterval { probability: f64, armed: bool },
    Extinction,
}

/// A reinforcement or punishment contingency evaluated once per generation.
#[derive(Debug, Clone)]
pub struct Schedule {
    settings: ScheduleSettings,
    state: ScheduleState,
}

impl Schedule {
    pub fn new<R: Rng>(settings: ScheduleSettings, rng: &mut R) -> Result<Self, EtbdError> {
        settings.validate()?;
        let n = settings.value;
        let state = match settings.schedule_type {
            ScheduleType::FixedRatio => ScheduleState::Ratio {
                count: 0,
                requirement: n,
            },
            ScheduleType::VariableRatio => ScheduleState::Ratio {
                count: 0,
                requirement: variable_requirement(n, rng),
            },
            ScheduleType::RandomRatio => ScheduleState::RandomRatio {
                probability: 1.0 / f64::from(n),
            },
            ScheduleType::FixedInterval => ScheduleState::Interval {
                elapsed: 0,
                interval: n,
            },
            ScheduleType::VariableInterval => ScheduleState::Interval {
                elapsed: 0,
                interval: variable_requirement(n, rng),
            },
            ScheduleType::RandomInterval => ScheduleState::RandomInterval {
                probability: 1.0 / f64::from(n),
                armed: false,
            },
            ScheduleType::Extinction => ScheduleState::Extinction,
        };

        Ok(Self { settings, state })
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn is_reinforcement_schedule(&self) -> bool {
        self.settings.is_reinforcement_schedule()
    }

    pub fn in_response_class(&self, value: u32) -> bool {
        self.settings.response_class.contains(value)
    }

    /// Advances the schedule by one generation; true when a consequence is delivered.
    pub fn run<R: Rng>(&mut self, value: u32, rng: &mut R) -> bool {
        let in_class = self.in_response_class(value);
        let schedule_type = self.settings.schedule_type;
        let n = self.settings.value;

        match &mut self.state {
            ScheduleState::Ratio { count, requirement } => {
                if !in_class {
                    return false;
                }
                *count += 1;
                if *count < *requirement {
                    return false;
                }
                *count = 0;
                if schedule_type == ScheduleType::VariableRatio {
                    *requirement = variable_requirement(n, rng);
                }
                true
            }
            ScheduleState::RandomRatio { probability } => {
                in_class && rng.gen::<f64>() < *probability
            }
            ScheduleState::Interval { elapsed, interval } => {
                *elapsed = elapsed.saturating_add(1);
                if !in_class || *elapsed < *interval {
                    return false;
                }
                *elapsed = 0;
                if schedule_type == ScheduleType::VariableInterval {
                    *interval = variable_requirement(n, rng);
                }
                true
            }
            ScheduleState::RandomInterval { probability, armed } => {
                if !*armed && rng.gen::<f64>() < *probability {
                    *armed = true;
                }
                if *armed && in_class {
                    *armed = false;
                    return true;
                }
                false
            }
            ScheduleState::Extinction => false,
        }
    }
}

/// Uniform draw from `1..=2n-1`, whose mean is `n`.
fn variable_requirement<R: Rng>(n: u32, rng: &mut R) -> u32 {
    let upper = n.saturating_mul(2).saturating_sub(1).max(1);
    rng.gen_range(1..=upper)
}
