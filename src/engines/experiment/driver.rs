use crate::config::AppConfig;
use crate::data::ResultTable;
use crate::engines::evolution::{Algorithm, Organism};
use crate::engines::experiment::progress::ProgressCallback;
use crate::engines::schedules::{build_arrangement, Schedule};
use crate::error::EtbdError;
use crate::types::{ConsequenceRecord, GenerationRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Runs repetitions × arrangements × generations and records every generation.
pub struct Experiment {
    config: AppConfig,
}

impl Experiment {
    pub fn new(config: AppConfig) -> Result<Self, EtbdError> {
        config.validate()?;

        let first = config.arrangements[0].schedules.len();
        if config
            .arrangements
            .iter()
            .any(|arrangement| arrangement.schedules.len() != first)
        {
            log::warn!(
                "Arrangements have differing schedule counts; missing columns are recorded as 0"
            );
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Number of B/R/P column triples in the output.
    pub fn schedule_columns(&self) -> usize {
        self.config
            .arrangements
            .iter()
            .map(|arrangement| arrangement.schedules.len())
            .max()
            .unwrap_or(0)
    }

    /// Runs every repetition in parallel. Repetition seeds come from the master
    /// seed, so the table is identical for identical settings and seed.
    pub fn run<P: ProgressCallback>(&self, progress: &P) -> Result<ResultTable, EtbdError> {
        let start = Instant::now();
        let settings = &self.config.experiment;

        let mut master = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..settings.reps).map(|_| master.gen()).collect();

        log::info!(
            "Running {} repetition(s) of {} arrangement(s) for {} generations",
            settings.reps,
            self.config.arrangements.len(),
            settings.gens
        );

        let repetitions = seeds
            .par_iter()
            .enumerate()
            .map(|(rep, &seed)| self.run_repetition(rep, seed, progress))
            .collect::<Result<Vec<_>, EtbdError>>()?;

        let table = ResultTable::new(
            self.schedule_columns(),
            repetitions.into_iter().flatten().collect(),
        );
        progress.on_run_complete(table.len(), start.elapsed());
        Ok(table)
    }

    fn run_repetition<P: ProgressCallback>(
        &self,
        rep: usize,
        seed: u64,
        progress: &P,
    ) -> Result<Vec<GenerationRecord>, EtbdError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut organism = Organism::new(self.config.organism.clone(), &mut rng)?;
        let algorithm = Algorithm::new(self.config.algorithm.clone())?;
        let gens = self.config.experiment.gens;
        let mut records = Vec::with_capacity(self.config.arrangements.len() * gens);

        for (index, arrangement) in self.config.arrangements.iter().enumerate() {
            if index > 0 && self.config.experiment.reinitialize_population {
                log::debug!("Rep {}: reinitializing population", rep + 1);
                organism.init_population(&mut rng);
            }
            let mut schedules = build_arrangement(arrangement, &mut rng)?;
            progress.on_arrangement_start(rep, index);

            for generation in 0..gens {
                let mut record = GenerationRecord::new(rep, index, generation, 0);
                run_generation(&mut organism, &mut schedules, &algorithm, &mut record, &mut rng)?;
                records.push(record);
                progress.on_generation_complete(rep, index, generation);
            }
        }

        Ok(records)
    }
}

/// One generation: emit, evaluate every schedule, evolve.
///
/// Fills in the emission and the per-schedule indicators of `record`.
pub fn run_generation<R: Rng>(
    organism: &mut Organism,
    schedules: &mut [Schedule],
    algorithm: &Algorithm,
    record: &mut GenerationRecord,
    rng: &mut R,
) -> Result<(), EtbdError> {
    let emission = organism.emit(rng);
    record.emission = emission;

    let delivered: Vec<bool> = schedules
        .iter_mut()
        .map(|schedule| schedule.run(emission, &mut *rng))
        .collect();

    let mut consequence = ConsequenceRecord::new(emission);
    record.behaviors.clear();
    record.reinforcements.clear();
    record.punishments.clear();

    for (schedule, &fired) in schedules.iter().zip(&delivered) {
        let reinforcing = schedule.is_reinforcement_schedule();
        record.behaviors.push(schedule.in_response_class(emission));
        record.reinforcements.push(fired && reinforcing);
        record.punishments.push(fired && !reinforcing);
        if fired {
            consequence.deliver(schedule.settings());
        }
    }

    algorithm.run(organism, &consequence, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArrangementSettings, ScheduleSettings, ScheduleType};
    use crate::engines::experiment::progress::SilentProgressCallback;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.experiment.reps = 2;
        config.experiment.gens = 30;
        config.experiment.seed = Some(99);
        config.organism.population_size = 20;
        config.organism.genome_bits = 8;
        config.arrangements = vec![
            ArrangementSettings::new(vec![
                ScheduleSettings::reinforcement(ScheduleType::FixedRatio, 2, 0, 127),
                ScheduleSettings::punishment(ScheduleType::FixedRatio, 3, 128, 255),
            ]),
            ArrangementSettings::new(vec![ScheduleSettings::reinforcement(
                ScheduleType::FixedInterval,
                5,
                50,
                60,
            )]),
        ];
        config
    }

    #[test]
    fn test_records_cover_every_generation() {
        let experiment = Experiment::new(config()).unwrap();
        let table = experiment.run(&SilentProgressCallback).unwrap();

        assert_eq!(experiment.schedule_columns(), 2);
        assert_eq!(table.len(), 2 * 2 * 30);
        let first = &table.records()[0];
        assert_eq!((first.rep, first.arrangement, first.generation), (0, 0, 0));
        let last = table.records().last().unwrap();
        assert_eq!((last.rep, last.arrangement, last.generation), (1, 1, 29));
    }

    #[test]
    fn test_indicators_follow_schedule_kind() {
        let experiment = Experiment::new(config()).unwrap();
        let table = experiment.run(&SilentProgressCallback).unwrap();

        for record in table.records().iter().filter(|r| r.arrangement == 0) {
            // Classes partition the phenotype range
            assert!(record.behaviors[0] != record.behaviors[1]);
            assert!(!record.punishments[0]);
            assert!(!record.reinforcements[1]);
            assert!(!record.reinforcements[0] || record.behaviors[0]);
            assert!(!record.punishments[1] || record.behaviors[1]);
        }
    }

    #[test]
    fn test_first_firing_schedule_delivers() {
        let first = ScheduleSettings::reinforcement(ScheduleType::FixedRatio, 1, 0, 255)
            .with_fdf_mean(3.0);
        let second = ScheduleSettings::reinforcement(ScheduleType::FixedRatio, 1, 0, 255)
            .with_fdf_mean(9.0);
        let mut consequence = ConsequenceRecord::new(12);

        consequence.deliver(&first);
        consequence.deliver(&second);

        assert!(consequence.reinforcement_delivered());
        assert_eq!(consequence.reinforcer.and_then(|s| s.fdf_mean), Some(3.0));
        assert!(!consequence.punishment_delivered());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut bad = config();
        bad.experiment.gens = 0;
        assert!(Experiment::new(bad).is_err());

        let mut empty = config();
        empty.arrangements[1].schedules.clear();
        assert!(Experiment::new(empty).is_err());
    }
}
