pub mod driver;
pub mod progress;

pub use driver::{run_generation, Experiment};
pub use progress::{LogProgressCallback, ProgressCallback, SilentProgressCallback};
