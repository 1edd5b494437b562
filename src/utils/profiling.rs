use std::time::Duration;

/// Timing and population data for the most recent [`crate::PhysicsWorld::step`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub integrate_time: Duration,
    pub broad_phase_time: Duration,
    pub narrow_phase_time: Duration,
    pub solver_time: Duration,
    pub total_step_time: Duration,

    pub body_count: usize,
    pub constraint_count: usize,
    pub candidate_pair_count: usize,
    pub manifold_count: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_step_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "physics step: {} bodies, {} constraints, {} candidate pairs, {} manifolds",
            self.body_count,
            self.constraint_count,
            self.candidate_pair_count,
            self.manifold_count
        );
        log::debug!(
            "  total {:.3} ms | integrate {:.1}% | broad {:.1}% | narrow {:.1}% | solver {:.1}%",
            self.total_step_time.as_secs_f32() * 1000.0,
            Self::share(self.integrate_time, total_us),
            Self::share(self.broad_phase_time, total_us),
            Self::share(self.narrow_phase_time, total_us),
            Self::share(self.solver_time, total_us),
        );
    }

    fn share(stage: Duration, total_us: f32) -> f32 {
        stage.as_micros() as f32 / total_us * 100.0
    }
}
