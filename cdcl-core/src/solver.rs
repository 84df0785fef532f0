//! Boolean satisfiability solver.
//!
//! Ties the trail, clause store, propagator, analyzer and branching heuristic together behind one
//! facade. No incremental solving, no assumptions, no proof-processor plugins: one formula, one
//! solve, one optional proof.

use std::io;

use anyhow::Error;
use log::{error, info};

use cdcl_dimacs::parse_dimacs;
use cdcl_formula::{CnfFormula, Var};

use crate::cdcl::{search, SearchResult};
use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::proof::Proof;
use crate::trail::Trail;
use crate::vsids::Vsids;

/// The result of a completed or interrupted solve.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolveResult {
    Sat,
    Unsat,
    /// The caller's budget hook fired before a verdict was reached.
    Unknown,
}

/// A boolean satisfiability solver.
pub struct Solver {
    clauses: ClauseDb,
    trail: Trail,
    vsids: Vsids,
    proof: Proof,
    config: SolverConfig,
    var_count: usize,
    result: Option<SolveResult>,
    should_stop: Option<Box<dyn FnMut() -> bool>>,
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::with_config(SolverConfig::default())
    }
}

impl Solver {
    /// Create a new solver with the default configuration.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Create a new solver with an explicit VSIDS decay schedule.
    pub fn with_config(config: SolverConfig) -> Solver {
        Solver {
            clauses: ClauseDb::new(),
            trail: Trail::new(),
            vsids: Vsids::new(config.vsids_decay_interval, config.vsids_decay_divisor),
            proof: Proof::new(),
            config,
            var_count: 0,
            result: None,
            should_stop: None,
        }
    }

    /// The VSIDS decay schedule this solver was constructed with.
    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Install a callback polled once per decision; once it returns `true` the current `solve()`
    /// call returns [`SolveResult::Unknown`] at the next decision boundary, the caller's way to
    /// impose a budget on the search.
    pub fn set_stop_hook(&mut self, hook: impl FnMut() -> bool + 'static) {
        self.should_stop = Some(Box::new(hook));
    }

    fn grow_to(&mut self, count: usize) {
        if count > self.var_count {
            self.var_count = count;
            self.trail.set_var_count(count);
            self.vsids.set_var_count(count);
        }
    }

    /// Add a formula's clauses to the solver.
    ///
    /// Can be called multiple times; clauses accumulate. This solver has no incremental-solving
    /// support (no assumptions, no clause retraction) — added clauses are permanent for the
    /// lifetime of the instance.
    pub fn add_formula(&mut self, formula: &CnfFormula) {
        self.grow_to(formula.var_count());
        for clause in formula.iter() {
            self.clauses.add_original(clause.to_vec());
            self.vsids.bump_all(clause);
        }
    }

    /// Reads and adds a formula in DIMACS CNF format.
    pub fn add_dimacs_cnf(&mut self, input: impl io::Read) -> Result<(), Error> {
        let formula = parse_dimacs(input)?;
        info!(
            "parsed formula with {} variables and {} clauses",
            formula.var_count(),
            formula.len()
        );
        self.add_formula(&formula);
        Ok(())
    }

    /// Check the satisfiability of the current formula.
    pub fn solve(&mut self) -> SolveResult {
        let mut hook = self.should_stop.take();
        let stop = || hook.as_mut().map_or(false, |hook| hook());

        let outcome = search(
            &mut self.clauses,
            &mut self.trail,
            &mut self.vsids,
            &mut self.proof,
            stop,
        );

        self.should_stop = hook;

        let result = match outcome {
            SearchResult::Sat => {
                if !self.verify_model() {
                    error!("solver returned a model that does not satisfy the input formula");
                    debug_assert!(false, "unsound SAT result");
                }
                info!("SAT");
                SolveResult::Sat
            }
            SearchResult::Unsat => {
                info!("UNSAT");
                SolveResult::Unsat
            }
            SearchResult::Unknown => SolveResult::Unknown,
        };

        self.result = Some(result);
        result
    }

    /// Re-evaluate every original clause under the current trail before a SAT result is trusted.
    fn verify_model(&self) -> bool {
        self.clauses
            .iter()
            .filter(|(_, clause)| !clause.is_learned())
            .all(|(_, clause)| {
                clause
                    .literals()
                    .iter()
                    .any(|&lit| self.trail.lit_is_true(lit))
            })
    }

    /// The satisfying assignment, if the last `solve()` call returned [`SolveResult::Sat`].
    ///
    /// One entry per variable, in variable-index order.
    pub fn model(&self) -> Option<Vec<bool>> {
        if self.result != Some(SolveResult::Sat) {
            return None;
        }
        Some(
            (0..self.var_count)
                .map(|index| {
                    self.trail
                        .value_of(Var::from_index(index))
                        .expect("all_assigned held at the end of a SAT search")
                })
                .collect(),
        )
    }

    /// Write the resolution refutation recorded for the last `solve()` call, if it returned
    /// [`SolveResult::Unsat`].
    pub fn write_proof(&self, target: &mut impl io::Write) -> io::Result<Option<()>> {
        if self.result != Some(SolveResult::Unsat) {
            return Ok(None);
        }
        self.proof.write(target)?;
        Ok(Some(()))
    }
}
