use std::time::Duration;

/// Observer for a running experiment. Repetitions run on worker threads, so
/// callbacks take `&self`.
pub trait ProgressCallback: Send + Sync {
    fn on_arrangement_start(&self, rep: usize, arrangement: usize);
    fn on_generation_complete(&self, rep: usize, arrangement: usize, generation: usize);
    fn on_run_complete(&self, rows: usize, elapsed: Duration);
}

/// Logs a progress line every `interval` generations.
pub struct LogProgressCallback {
    interval: usize,
    reps: usize,
    arrangements: usize,
    gens: usize,
}

impl LogProgressCallback {
    pub fn new(interval: usize, reps: usize, arrangements: usize, gens: usize) -> Self {
        Self {
            interval: interval.max(1),
            reps,
            arrangements,
            gens,
        }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_arrangement_start(&self, rep: usize, arrangement: usize) {
        log::debug!(
            "Rep {}/{}: arrangement {}/{} starting",
            rep + 1,
            self.reps,
            arrangement + 1,
            self.arrangements
        );
    }

    fn on_generation_complete(&self, rep: usize, arrangement: usize, generation: usize) {
        if generation % self.interval == 0 {
            log::info!(
                "Rep {}/{} | Sch {}/{} | Gen {}/{}",
                rep + 1,
                self.reps,
                arrangement + 1,
                self.arrangements,
                generation,
                self.gens
            );
        }
    }

    fn on_run_complete(&self, rows: usize, elapsed: Duration) {
        log::info!(
            "Completed {} generations in {:.2}s",
            rows,
            elapsed.as_secs_f64()
        );
    }
}

/// Discards all progress.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_arrangement_start(&self, _rep: usize, _arrangement: usize) {}

    fn on_generation_complete(&self, _rep: usize, _arrangement: usize, _generation: usize) {}

    fn on_run_complete(&self, _rows: usize, _elapsed: Duration) {}
}
