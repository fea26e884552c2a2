use crate::config::ScheduleSettings;
use serde::{Deserialize, Serialize};

/// Consequences delivered in one generation, handed from the driver to the algorithm.
///
/// At most one schedule of each kind is the deliverer; the first schedule in
/// arrangement order that fires claims the slot.
#[derive(Debug, Clone, Copy)]
pub struct ConsequenceRecord<'a> {
    pub emission: u32,
    pub reinforcer: Option<&'a ScheduleSettings>,
    pub punisher: Option<&'a ScheduleSettings>,
}

impl<'a> ConsequenceRecord<'a> {
    pub fn new(emission: u32) -> Self {
        Self {
            emission,
            reinforcer: None,
            punisher: None,
        }
    }

    pub fn reinforcement_delivered(&self) -> bool {
        self.reinforcer.is_some()
    }

    pub fn punishment_delivered(&self) -> bool {
        self.punisher.is_some()
    }

    /// Records a delivery by the schedule with `settings`; the first one of each kind wins.
    pub fn deliver(&mut self, settings: &'a ScheduleSettings) {
        let slot = if settings.is_reinforcement_schedule() {
            &mut self.reinforcer
        } else {
            &mut self.punisher
        };
        if slot.is_none() {
            *slot = Some(settings);
        }
    }
}

/// One row of experiment output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub rep: usize,
    pub arrangement: usize,
    pub generation: usize,
    pub emission: u32,
    /// Per schedule: emission in the response class (B), reinforced (R), punished (P).
    pub behaviors: Vec<bool>,
    pub reinforcements: Vec<bool>,
    pub punishments: Vec<bool>,
}

impl GenerationRecord {
    pub fn new(rep: usize, arrangement: usize, generation: usize, emission: u32) -> Self {
        Self {
            rep,
            arrangement,
            generation,
            emission,
            behaviors: Vec::new(),
            reinforcements: Vec::new(),
            punishments: Vec::new(),
        }
    }
}
