use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use wlc::engine::progress::{Progress, ProgressCallback};

/// Renders library progress events as spinners and bars on stderr.
pub struct UiManager {
    mp: MultiProgress,
    state: Mutex<BarState>,
    sentinel_bar: ProgressBar,
}

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
}

impl UiManager {
    pub fn new(hidden: bool) -> Self {
        let mp = MultiProgress::new();
        if hidden {
            mp.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        }
        let sentinel_bar = mp.add(ProgressBar::hidden());
        Self {
            mp,
            state: Mutex::new(BarState::default()),
            sentinel_bar,
        }
    }

    /// A progress callback that forwards every event to this manager.
    pub fn callback(&self) -> ProgressCallback<'_> {
        Box::new(move |progress: Progress| self.handle_progress(progress))
    }

    /// Clears any bar still on screen.
    pub fn finish(&self) {
        if let Some(bar) = self.lock_state().active_bar.take() {
            bar.finish_and_clear();
        }
        self.sentinel_bar.finish_and_clear();
    }

    fn lock_state(&self) -> MutexGuard<'_, BarState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handle_progress(&self, progress: Progress) {
        let mut state = self.lock_state();
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.enable_steady_tick(Duration::from_millis(80));
                pb.set_style(Self::spinner_style());
                pb.set_message(name.to_string());

                state.active_bar = Some(pb);
                state.base_message = name.to_string();
            }
            Progress::PhaseFinish => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let final_message = format!("✓ {}", state.base_message);
                self.mp.println(final_message).ok();

                state.base_message.clear();
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = state.active_bar.as_ref() {
                    bar.set_style(Self::bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                    bar.disable_steady_tick();
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = state.active_bar.as_ref() {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = state.active_bar.as_ref() {
                    bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(bar) = state.active_bar.as_ref() {
                    bar.set_message(format!("{} ({})", state.base_message, text));
                }
            }
            Progress::Message(msg) => {
                self.mp.println(format!("  {}", msg)).ok();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<45} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("━╸ ")
    }
}
