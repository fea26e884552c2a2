pub mod traits;
pub mod experiment;
pub mod organism;
pub mod algorithm;
pub mod schedule;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
pub use experiment::ExperimentSettings;
pub use organism::{Encoding, OrganismSettings};
pub use algorithm::{
    AlgorithmSettings, ExtinctionPolicy, FdfShape, MutationMethod, Recombination, SelectionPolicy,
};
pub use schedule::{
    ArrangementSettings, ConsequenceKind, FitnessTarget, ResponseClass, ScheduleSettings,
    ScheduleType,
};
