use binplan::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use tracing::debug;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress on stderr and mirrors phase changes into the log.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new(visible: bool) -> Self {
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        });
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { phase } => {
                debug!("Phase started: {}", phase);
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_message(phase.name());
            }
            Progress::PhaseFinish { phase } => {
                debug!("Phase finished: {}", phase);
                pb.disable_steady_tick();
                pb.finish_and_clear();
            }
            Progress::WellsStart { total } => {
                pb.disable_steady_tick();
                pb.set_length(total as u64);
                pb.set_position(0);
                pb.set_style(Self::bar_style());
            }
            Progress::WellProcessed { well } => {
                pb.set_message(well.to_string());
                pb.inc(1);
            }
            Progress::WellsFinish => {
                if let Some(length) = pb.length() {
                    pb.set_position(length);
                }
            }
            Progress::Message(msg) => {
                debug!("{}", msg);
                pb.println(format!("  {}", msg));
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} wells {msg}")
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}
