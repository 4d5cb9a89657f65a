//! Progress reporting for query batches

use colored::Colorize;
use dashboard_application::ProgressNotifier;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a batch with a progress bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total_tasks: usize) {
        let pb = ProgressBar::new(total_tasks as u64);
        pb.set_style(Self::batch_style());
        pb.set_prefix("Queries");
        pb.set_message("Running...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_task_complete(&self, name: &str, success: bool, elapsed: Duration) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {} ({:?})", "v".green(), name, elapsed)
            } else {
                format!("{} {}", "x".red(), name)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_batch_complete(&self, collected_keys: usize, cancelled: bool) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(pb) = guard.take() {
            if cancelled {
                pb.abandon_with_message(format!("{}", "cancelled".yellow()));
            } else {
                pb.finish_with_message(format!(
                    "{} ({} keys)",
                    "complete!".green(),
                    collected_keys
                ));
            }
        }
    }
}
