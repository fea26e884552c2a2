use crate::config::{
    AlgorithmSettings, ConfigSection, ExtinctionPolicy, Recombination, ScheduleSettings,
    SelectionPolicy,
};
use crate::engines::evolution::{
    genome::Genome,
    operators::{
        bitwise_crossover, fitness_match_selection, mutate, point_crossover, rank_by_distance,
        rank_window_selection,
    },
    organism::Organism,
};
use crate::error::EtbdError;
use crate::types::ConsequenceRecord;
use rand::Rng;

/// Per-genome effective distances for one generation, smaller is fitter,
/// together with the FDF mean that sets selection intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPressure {
    pub distances: Vec<f64>,
    pub fdf_mean: f64,
}

/// The genetic algorithm that turns a generation's consequences into the next population.
pub struct Algorithm {
    settings: AlgorithmSettings,
}

impl Algorithm {
    pub fn new(settings: AlgorithmSettings) -> Result<Self, EtbdError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Evolve the organism's population one generation.
    pub fn run<R: Rng>(
        &self,
        organism: &mut Organism,
        consequence: &ConsequenceRecord,
        rng: &mut R,
    ) -> Result<(), EtbdError> {
        let next = match self.selection_pressure(organism, consequence) {
            Some(pressure) => self.select_and_breed(organism.population(), &pressure, rng)?,
            None => match self.settings.extinction {
                ExtinctionPolicy::RandomMating => {
                    let size = organism.population().len();
                    self.breed(organism.population(), rng, |rng: &mut R| {
                        rng.gen_range(0..size)
                    })
                }
                ExtinctionPolicy::Persist => {
                    let mut next = organism.population().to_vec();
                    for genome in next.iter_mut() {
                        mutate(genome, self.settings.mutation, self.settings.mutation_rate, rng);
                    }
                    next
                }
            },
        };

        organism.replace_population(next);
        Ok(())
    }

    /// Fitness assignment. `None` when nothing was delivered this generation.
    ///
    /// Reinforcement scores a genome by its distance to the reinforced target.
    /// Punishment scores it by how much nearer it is to the punished target than
    /// the farthest genome in the population, so the farthest genome scores 0
    /// and the FDF sample still decides how far from it a parent may be. When
    /// both occur the two scores are averaged.
    pub fn selection_pressure(
        &self,
        organism: &Organism,
        consequence: &ConsequenceRecord,
    ) -> Option<SelectionPressure> {
        let phenotypes = organism.phenotypes();
        let distances_to = |settings: &ScheduleSettings| -> Vec<f64> {
            let target = settings
                .fitness_target
                .resolve(&settings.response_class, consequence.emission);
            phenotypes
                .iter()
                .map(|&value| f64::from(value.abs_diff(target)))
                .collect()
        };

        let (distances, governing) = match (consequence.reinforcer, consequence.punisher) {
            (None, None) => return None,
            (Some(reinforcer), None) => (distances_to(reinforcer), reinforcer),
            (None, Some(punisher)) => (repelled(distances_to(punisher)), punisher),
            (Some(reinforcer), Some(punisher)) => {
                let combined = distances_to(reinforcer)
                    .into_iter()
                    .zip(repelled(distances_to(punisher)))
                    .map(|(toward, away)| (toward + away) / 2.0)
                    .collect();
                (combined, reinforcer)
            }
        };

        Some(SelectionPressure {
            distances,
            fdf_mean: self.fdf_mean_for(governing),
        })
    }

    fn fdf_mean_for(&self, settings: &ScheduleSettings) -> f64 {
        settings.fdf_mean.unwrap_or(self.settings.fdf_mean)
    }

    fn select_and_breed<R: Rng>(
        &self,
        population: &[Genome],
        pressure: &SelectionPressure,
        rng: &mut R,
    ) -> Result<Vec<Genome>, EtbdError> {
        let sampler = self.settings.fdf_shape.sampler(pressure.fdf_mean)?;

        let next = match self.settings.selection {
            SelectionPolicy::FitnessMatch => self.breed(population, rng, |rng: &mut R| {
                let sample = sampler.sample(&mut *rng);
                fitness_match_selection(&pressure.distances, sample, rng)
            }),
            SelectionPolicy::RankWindow => {
                let ranking = rank_by_distance(&pressure.distances);
                self.breed(population, rng, |rng: &mut R| {
                    let sample = sampler.sample(&mut *rng);
                    rank_window_selection(&ranking, sample, rng)
                })
            }
        };

        Ok(next)
    }

    /// Pairs parents chosen by `select`, recombines and mutates until the
    /// offspring fill a population of the same size.
    fn breed<R, F>(&self, population: &[Genome], rng: &mut R, mut select: F) -> Vec<Genome>
    where
        R: Rng,
        F: FnMut(&mut R) -> usize,
    {
        let size = population.len();
        let mut offspring = Vec::with_capacity(size);

        while offspring.len() < size {
            let parent1 = &population[select(&mut *rng)];
            let parent2 = &population[select(&mut *rng)];

            let (mut child1, mut child2) = match self.settings.recombination {
                Recombination::Bitwise => bitwise_crossover(parent1, parent2, rng),
                Recombination::SinglePoint => point_crossover(parent1, parent2, 1, rng),
                Recombination::MultiPoint => {
                    point_crossover(parent1, parent2, self.settings.crossover_points, rng)
                }
            };

            mutate(&mut child1, self.settings.mutation, self.settings.mutation_rate, rng);
            mutate(&mut child2, self.settings.mutation, self.settings.mutation_rate, rng);

            offspring.push(child1);
            if offspring.len() < size {
                offspring.push(child2);
            }
        }

        offspring
    }
}

/// Inverts punished distances against the farthest genome: 0 for the farthest,
/// growing as genomes get nearer the punished target.
fn repelled(distances: Vec<f64>) -> Vec<f64> {
    let farthest = distances.iter().copied().fold(0.0, f64::max);
    distances.into_iter().map(|d| farthest - d).collect()
}
