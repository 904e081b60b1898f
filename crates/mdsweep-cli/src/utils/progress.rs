use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use mdsweep::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::bar_style())
            .with_message("Waiting for sweep...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::SweepStart { total_instances } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_instances);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                }
                Progress::InstanceStart { dir_name } => {
                    pb_guard.set_message(dir_name);
                }
                Progress::InstanceDone => {
                    pb_guard.inc(1);
                }
                Progress::InstanceSkipped { dir_name } => {
                    pb_guard.println(format!("  skipped {dir_name} (already exists)"));
                }
                Progress::SweepFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap()
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
