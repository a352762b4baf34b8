use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use novelpan::engine::progress::{Progress, ProgressCallback, UnitOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Running counts shown next to the unit bar.
#[derive(Debug, Default)]
struct UnitTally {
    novel: AtomicU64,
    eliminated: AtomicU64,
    failed: AtomicU64,
}

impl UnitTally {
    fn record(&self, outcome: UnitOutcome) {
        let counter = match outcome {
            UnitOutcome::Classified(c) if c.is_novel() => &self.novel,
            UnitOutcome::Classified(_) => &self.eliminated,
            UnitOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.novel.store(0, Ordering::Relaxed);
        self.eliminated.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }

    fn summary(&self) -> String {
        let failed = self.failed.load(Ordering::Relaxed);
        let mut summary = format!(
            "novel {} | eliminated {}",
            self.novel.load(Ordering::Relaxed),
            self.eliminated.load(Ordering::Relaxed)
        );
        if failed > 0 {
            summary.push_str(&format!(" | failed {}", failed));
        }
        summary
    }
}

/// Renders workflow progress on stderr. `ProgressBar` is itself a shared handle,
/// so clones of this handler drive the same bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    tally: Arc<UnitTally>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler whose bar never draws, for `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            bar,
            tally: Arc::new(UnitTally::default()),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |progress: Progress| handler.handle(progress))
    }

    fn handle(&self, progress: Progress) {
        let bar = &self.bar;
        match progress {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(spinner_style());
                bar.set_message(name);
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                bar.finish_with_message("✓ Done");
            }
            Progress::TaskStart { total_steps } => {
                self.tally.reset();
                bar.disable_steady_tick();
                bar.reset();
                bar.set_length(total_steps);
                bar.set_style(bar_style());
                bar.set_message(self.tally.summary());
            }
            Progress::UnitFinished { outcome } => {
                self.tally.record(outcome);
                bar.set_message(self.tally.summary());
                bar.inc(1);
            }
            Progress::TaskFinish => {
                if let Some(len) = bar.length() {
                    bar.set_position(len);
                }
                bar.finish_with_message(self.tally.summary());
            }
            Progress::Message(msg) if bar.is_finished() => bar.set_message(msg),
            Progress::Message(msg) => bar.println(format!("  {}", msg)),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} units ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
