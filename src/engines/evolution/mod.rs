pub mod fdf;
pub mod genome;
pub mod operators;
pub mod organism;
pub mod algorithm;

pub use algorithm::{Algorithm, SelectionPressure};
pub use fdf::{ExponentialFdf, FdfSampler, LinearFdf};
pub use genome::Genome;
pub use organism::Organism;
