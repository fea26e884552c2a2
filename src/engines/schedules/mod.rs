pub mod schedule;

pub use schedule::{Schedule, ScheduleState};

use crate::config::ArrangementSettings;
use crate::error::EtbdError;
use rand::Rng;

/// Builds fresh schedule instances for every schedule of an arrangement.
pub fn build_arrangement<R: Rng>(
    arrangement: &ArrangementSettings,
    rng: &mut R,
) -> Result<Vec<Schedule>, EtbdError> {
    arrangement
        .schedules
        .iter()
        .map(|settings| Schedule::new(settings.clone(), rng))
        .collect()
}
