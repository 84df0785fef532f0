//! Solver configuration.

/// Tunable constants for the VSIDS branching heuristic.
///
/// This design has no clause-activity decay and no restart schedule — there is no clause
/// reduction policy or restart policy to configure — so unlike a full-featured CDCL solver's
/// configuration, this only carries the one decay schedule actually used: every `K` conflicts,
/// divide all scores by `D`.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Number of conflicts between VSIDS score decays.
    pub vsids_decay_interval: u32,
    /// Divisor applied to every literal's activity score at each decay.
    pub vsids_decay_divisor: f64,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            vsids_decay_interval: 5,
            vsids_decay_divisor: 2.0,
        }
    }
}
