use crate::config::{ConfigSection, Encoding, OrganismSettings};
use crate::engines::evolution::genome::Genome;
use crate::engines::evolution::operators::random_population;
use crate::error::EtbdError;
use rand::Rng;

/// A population of potential responses plus the response emitted this generation.
#[derive(Debug, Clone)]
pub struct Organism {
    settings: OrganismSettings,
    population: Vec<Genome>,
    emitted: Option<u32>,
}

impl Organism {
    /// Creates an organism with a fresh random population.
    pub fn new<R: Rng>(settings: OrganismSettings, rng: &mut R) -> Result<Self, EtbdError> {
        settings.validate()?;
        let mut organism = Self {
            settings,
            population: Vec::new(),
            emitted: None,
        };
        organism.init_population(rng);
        Ok(organism)
    }

    /// Replaces the population with uniformly random genomes and clears the emission.
    pub fn init_population<R: Rng>(&mut self, rng: &mut R) {
        self.population = random_population(
            self.settings.population_size,
            self.settings.genome_bits,
            rng,
        );
        self.emitted = None;
    }

    /// Decodes a uniformly drawn genome, stores it as the current emission and returns it.
    pub fn emit<R: Rng>(&mut self, rng: &mut R) -> u32 {
        let idx = rng.gen_range(0..self.population.len());
        let value = self.population[idx].decode(self.encoding());
        self.emitted = Some(value);
        value
    }

    /// The response emitted this generation, if any.
    pub fn emitted(&self) -> Option<u32> {
        self.emitted
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn phenotypes(&self) -> Vec<u32> {
        self.population
            .iter()
            .map(|genome| genome.decode(self.encoding()))
            .collect()
    }

    pub fn mean_phenotype(&self) -> f64 {
        let total: f64 = self.phenotypes().iter().map(|&v| f64::from(v)).sum();
        total / self.population.len() as f64
    }

    pub fn encoding(&self) -> Encoding {
        self.settings.encoding
    }

    /// Swaps in the next generation in one step.
    ///
    /// # Panics
    ///
    /// If `next` has the wrong size or any genome has the wrong width.
    pub fn replace_population(&mut self, next: Vec<Genome>) {
        assert_eq!(
            next.len(),
            self.settings.population_size,
            "population size drifted from {}",
            self.settings.population_size
        );
        assert!(
            next.iter().all(|g| g.len() == self.settings.genome_bits),
            "genome width drifted from {} bits",
            self.settings.genome_bits
        );
        self.population = next;
    }
}
