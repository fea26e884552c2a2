use super::{
    algorithm::AlgorithmSettings,
    experiment::ExperimentSettings,
    organism::OrganismSettings,
    schedule::{ArrangementSettings, ScheduleSettings},
    traits::ConfigSection,
};
use crate::error::EtbdError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub experiment: ExperimentSettings,
    #[serde(default)]
    pub organism: OrganismSettings,
    #[serde(default)]
    pub algorithm: AlgorithmSettings,
    #[serde(default)]
    pub arrangements: Vec<ArrangementSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentSettings::default(),
            organism: OrganismSettings::default(),
            algorithm: AlgorithmSettings::default(),
            arrangements: vec![ArrangementSettings::new(vec![ScheduleSettings::default()])],
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EtbdError> {
        self.experiment.validate()?;
        self.organism.validate()?;
        self.algorithm.validate()?;

        if self.arrangements.is_empty() {
            return Err(EtbdError::Configuration(
                "At least one schedule arrangement is required".to_string(),
            ));
        }
        let max_phenotype = self.organism.max_phenotype();
        for arrangement in &self.arrangements {
            arrangement.validate()?;
            for schedule in &arrangement.schedules {
                schedule.validate_range(max_phenotype)?;
            }
        }

        if self.algorithm.recombination == super::Recombination::MultiPoint
            && self.algorithm.crossover_points >= self.organism.genome_bits
        {
            return Err(EtbdError::Configuration(format!(
                "[algorithm] {} crossover points do not fit a {}-bit genome",
                self.algorithm.crossover_points, self.organism.genome_bits
            )));
        }
        Ok(())
    }

    /// Parses and validates settings held in a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, EtbdError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| EtbdError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Loads a TOML or JSON settings file (chosen by extension), layered with
    /// `ETBD__<SECTION>__<KEY>` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EtbdError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EtbdError::Configuration(format!(
                "Failed to read config: {} does not exist",
                path.display()
            )));
        }

        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("ETBD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EtbdError> {
        let path = path.as_ref();
        let config = self.get();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(&config)?,
            _ => toml::to_string_pretty(&config)?,
        };

        std::fs::write(path, contents)
            .map_err(|e| EtbdError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` and keeps the result only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), EtbdError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScheduleType, SelectionPolicy};

    const SETTINGS: &str = r#"
        [experiment]
        reps = 3
        gens = 250
        seed = 7
        file_stub = "fr4"

        [organism]
        population_size = 20
        genome_bits = 8

        [algorithm]
        fdf_shape = "exponential"
        fdf_mean = 12.5
        selection = "rank_window"

        [[arrangements]]
        [[arrangements.schedules]]
        kind = "reinforcement"
        schedule_type = "fixed_ratio"
        value = 4
        response_class = { lower = 100, upper = 127 }
    "#;

    #[test]
    fn test_parse_toml_settings() {
        let config = AppConfig::from_toml_str(SETTINGS).unwrap();

        assert_eq!(config.experiment.reps, 3);
        assert_eq!(config.experiment.seed, Some(7));
        // Unspecified fields fall back to defaults
        assert!(config.experiment.reinitialize_population);
        assert_eq!(config.organism.max_phenotype(), 255);
        assert_eq!(config.algorithm.selection, SelectionPolicy::RankWindow);
        assert_eq!(config.arrangements.len(), 1);

        let schedule = &config.arrangements[0].schedules[0];
        assert_eq!(schedule.schedule_type, ScheduleType::FixedRatio);
        assert!(schedule.is_reinforcement_schedule());
        assert_eq!(schedule.fdf_mean, None);
    }

    #[test]
    fn test_rejects_class_outside_phenotype_range() {
        let settings = SETTINGS.replace("upper = 127", "upper = 300");
        let err = AppConfig::from_toml_str(&settings).unwrap_err();
        assert!(matches!(err, EtbdError::Configuration(_)));
    }

    #[test]
    fn test_rejects_missing_arrangements() {
        let mut config = AppConfig::default();
        config.arrangements.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_update_keeps_previous_config_on_error() {
        let manager = ConfigManager::new();
        let result = manager.update(|config| config.organism.population_size = 0);

        assert!(result.is_err());
        assert_eq!(manager.get().organism.population_size, 100);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::from_toml_str(SETTINGS).unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::from_toml_str(&serialized).unwrap(), config);
    }
}
