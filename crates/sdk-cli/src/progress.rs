//! indicatif binding for the core progress trait.

use indicatif::{ProgressBar, ProgressStyle};
use sdk_core::Progress;
use std::sync::Mutex;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Renders resolver progress as a bar per phase; phases with an unknown
/// unit count (zero) get a spinner.
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn replace(&self, next: Option<ProgressBar>) {
        let mut slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        *slot = next;
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for CliProgress {
    fn begin_phase(&self, name: &str, units: u64) {
        let bar = if units == 0 {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {prefix:.blue} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(TICK);
            spinner
        } else {
            let bar = ProgressBar::new(units);
            bar.set_style(
                ProgressStyle::with_template(
                    "{prefix:.blue} [{bar:30}] {pos}/{len} {wide_msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        };
        bar.set_prefix(name.to_string());
        self.replace(Some(bar));
    }

    fn advance(&self, delta: u64) {
        let slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref bar) = *slot {
            bar.inc(delta);
        }
    }

    fn message(&self, text: &str) {
        let slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref bar) = *slot {
            bar.set_message(text.to_string());
        }
    }

    fn finish(&self) {
        self.replace(None);
    }
}
