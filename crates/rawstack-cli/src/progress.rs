use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use rawstack_core::pipeline::{PipelineStage, ProgressReporter};

/// Progress reporter that draws one indicatif bar per pipeline stage.
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Clear any bar left open by a stage that failed.
    pub fn abandon(&self) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.take() {
                bar.abandon();
            }
        });
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        let mut guard = self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *guard);
    }
}

fn stage_bar(stage: PipelineStage, total_items: Option<usize>) -> ProgressBar {
    let bar = match total_items {
        Some(total) => {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar().template("{msg:20} [{bar:40}] {pos}/{len}") {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            bar
        }
    };
    bar.set_message(stage.to_string());
    bar
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.with_bar(|slot| {
            if let Some(previous) = slot.take() {
                previous.finish();
            }
            *slot = Some(stage_bar(stage, total_items));
        });
    }

    fn advance(&self, items_done: usize) {
        self.with_bar(|slot| {
            if let Some(bar) = slot {
                bar.set_position(items_done as u64);
            }
        });
    }

    fn finish_stage(&self) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.take() {
                bar.finish();
            }
        });
    }
}
