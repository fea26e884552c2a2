use anyhow::Context;
use clap::Parser;
use etbd::config::ConfigManager;
use etbd::engines::experiment::{
    Experiment, LogProgressCallback, ProgressCallback, SilentProgressCallback,
};
use etbd::ResultTable;
use std::path::PathBuf;

/// Evolutionary theory of behavior dynamics simulator
///
/// Runs every arrangement of the settings file and writes one CSV row per
/// generation to `<file_stub>.csv`.
#[derive(Parser)]
#[command(name = "etbd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML or JSON)
    #[arg(required_unless_present = "init")]
    settings: Option<PathBuf>,

    /// Output path without extension, overriding `experiment.file_stub`
    output_stub: Option<String>,

    /// Write the default settings to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "settings")]
    init: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let manager = ConfigManager::new();

    if let Some(path) = &cli.init {
        manager
            .save_to_file(path)
            .with_context(|| format!("writing default settings to {}", path.display()))?;
        log::info!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = cli
        .settings
        .context("a settings file is required unless --init is given")?;
    manager
        .load_from_file(&settings)
        .with_context(|| format!("loading settings from {}", settings.display()))?;

    if let Some(stub) = cli.output_stub {
        manager.update(|config| config.experiment.file_stub = stub)?;
    }

    let experiment = Experiment::new(manager.get())?;
    let config = experiment.config();

    let table = if config.experiment.log_progress {
        run(
            &experiment,
            &LogProgressCallback::new(
                config.experiment.progress_interval,
                config.experiment.reps,
                config.arrangements.len(),
                config.experiment.gens,
            ),
        )?
    } else {
        run(&experiment, &SilentProgressCallback)?
    };

    let output = format!("{}.csv", config.experiment.file_stub);
    table
        .write_csv(&output)
        .with_context(|| format!("writing results to {}", output))?;
    log::info!("Wrote {} rows to {}", table.len(), output);

    Ok(())
}

fn run<P: ProgressCallback>(experiment: &Experiment, progress: &P) -> anyhow::Result<ResultTable> {
    experiment.run(progress).context("running experiment")
}
