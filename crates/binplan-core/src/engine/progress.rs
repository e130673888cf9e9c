use crate::core::models::well::WellCoordinate;
use std::fmt;

/// Stages of a planning run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanPhase {
    Volumes,
    Classification,
    Layout,
    Concentrations,
}

impl PlanPhase {
    pub fn name(&self) -> &'static str {
        match self {
            PlanPhase::Volumes => "Volumes",
            PlanPhase::Classification => "Classification",
            PlanPhase::Layout => "Layout",
            PlanPhase::Concentrations => "Concentrations",
        }
    }
}

impl fmt::Display for PlanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { phase: PlanPhase },
    PhaseFinish { phase: PlanPhase },

    WellsStart { total: usize },
    WellProcessed { well: WellCoordinate },
    WellsFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `stage` between a start and finish event for `phase`.
    ///
    /// The finish event is only reported when the stage succeeds.
    pub fn phase<T, E>(
        &self,
        phase: PlanPhase,
        stage: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { phase });
        let output = stage()?;
        self.report(Progress::PhaseFinish { phase });
        Ok(output)
    }
}
