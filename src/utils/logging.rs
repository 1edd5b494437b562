use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Scoped timer that traces the wall-clock cost of a simulation stage.
///
/// When `output` is supplied the elapsed time is also accumulated there, which
/// is how [`crate::utils::profiling::StepProfiler`] collects per-stage timings.
pub struct ScopedTimer<'a> {
    label: &'static str,
    start: Instant,
    output: Option<&'a mut Duration>,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'static str) -> Self {
        Self::start(label, None)
    }

    pub fn recording(label: &'static str, output: &'a mut Duration) -> Self {
        Self::start(label, Some(output))
    }

    fn start(label: &'static str, output: Option<&'a mut Duration>) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if let Some(output) = self.output.as_deref_mut() {
            *output += elapsed;
        }
        if log_enabled!(Level::Trace) {
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when a single step exceeds its frame budget.
pub fn warn_if_step_budget_exceeded(duration: Duration, budget_ms: f32) {
    if duration.as_secs_f32() * 1000.0 > budget_ms {
        warn!(
            "physics step exceeded budget: {:.2} ms > {:.2} ms",
            duration.as_secs_f32() * 1000.0,
            budget_ms
        );
    }
}
