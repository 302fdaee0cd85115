//! Wall-clock timings of the last simulation step, split by pipeline stage.

use std::time::Instant;

/// All values in seconds, reset at the start of every `Space::step` and
/// accumulated over its substeps.
#[derive(Clone, Copy, Debug, Default)]
pub struct Profiler {
    pub step: f64,
    pub integrate_accelerations: f64,
    pub broadphase: f64,
    pub narrowphase: f64,
    pub presolve_constraints: f64,
    pub solve_constraints: f64,
    pub presolve_contacts: f64,
    pub solve_velocities: f64,
    pub integrate_velocities: f64,
    pub solve_positions: f64,
}

impl Profiler {
    pub(crate) fn reset(&mut self) {
        *self = Profiler::default();
    }
}

/// Measures one stage; `stop` adds the elapsed time onto a profiler slot.
pub(crate) struct StageTimer(Instant);

impl StageTimer {
    pub fn start() -> StageTimer {
        StageTimer(Instant::now())
    }

    pub fn stop(self, slot: &mut f64) {
        *slot += self.0.elapsed().as_secs_f64();
    }
}
