//! The assignment trail.
//!
//! The trail is the ordered record of decisions and implications that drives the search: it
//! answers "what is the value of variable `v`?", "at what level was it assigned?" and "which
//! clause forced it?". A single append-only trail with an auxiliary per-variable lookup replaces
//! the split decision-level/variable dictionaries some CDCL implementations keep as two
//! parallel, manually-synchronized maps.

use cdcl_formula::{Lit, Var};

use crate::clause::ClauseId;

/// The clause that forced a trail entry, or `None` for a decision.
pub type Antecedent = Option<ClauseId>;

/// Per-variable assignment state.
#[derive(Clone, Copy)]
struct VarState {
    value: bool,
    level: usize,
    antecedent: Antecedent,
}

/// The assignment trail.
///
/// Trail entries are strictly ordered by push time; backtracking to level `L` removes every
/// entry with level `> L` and unassigns the corresponding variables.
#[derive(Default)]
pub struct Trail {
    trail: Vec<Lit>,
    /// Index into `trail` where each decision level begins. `level_starts[0]` is always `0`.
    level_starts: Vec<usize>,
    state: Vec<Option<VarState>>,
}

impl Trail {
    /// Create an empty trail for a formula with no variables.
    pub fn new() -> Trail {
        Trail {
            trail: vec![],
            level_starts: vec![0],
            state: vec![],
        }
    }

    /// Grow the per-variable tables to cover at least `count` variables.
    pub fn set_var_count(&mut self, count: usize) {
        if count > self.state.len() {
            self.state.resize(count, None);
        }
    }

    /// The decision level currently being built.
    pub fn current_level(&self) -> usize {
        self.level_starts.len() - 1
    }

    /// The literals pushed so far, in push order.
    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }

    /// The literals pushed since (and including) the start of `level`.
    pub fn level_literals(&self, level: usize) -> &[Lit] {
        let start = self.level_starts[level];
        let end = self
            .level_starts
            .get(level + 1)
            .copied()
            .unwrap_or(self.trail.len());
        &self.trail[start..end]
    }

    /// Whether `var` currently has a value.
    pub fn is_assigned(&self, var: Var) -> bool {
        self.state[var.index()].is_some()
    }

    /// The value of `var`, or `None` if unassigned.
    pub fn value_of(&self, var: Var) -> Option<bool> {
        self.state[var.index()].map(|s| s.value)
    }

    /// Whether `lit` currently evaluates to true.
    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.value_of(lit.var()) == Some(lit.is_positive())
    }

    /// Whether `lit` currently evaluates to false.
    pub fn lit_is_false(&self, lit: Lit) -> bool {
        self.value_of(lit.var()) == Some(lit.is_negative())
    }

    /// The decision level at which `var` was assigned.
    ///
    /// Panics if `var` is unassigned.
    pub fn level_of(&self, var: Var) -> usize {
        self.state[var.index()].expect("variable is unassigned").level
    }

    /// The clause that forced `var`'s assignment, or `None` if it was a decision or is
    /// unassigned.
    pub fn antecedent_of(&self, var: Var) -> Antecedent {
        self.state[var.index()].and_then(|s| s.antecedent)
    }

    /// Open a new decision level and record `lit` as a decision.
    ///
    /// `lit`'s variable must be unassigned.
    pub fn push_decision(&mut self, lit: Lit) {
        debug_assert!(!self.is_assigned(lit.var()));
        self.level_starts.push(self.trail.len());
        self.assign(lit, None);
    }

    /// Record `lit` at the current level, forced by `antecedent`.
    ///
    /// `lit`'s variable must be unassigned.
    pub fn push_implication(&mut self, lit: Lit, antecedent: ClauseId) {
        debug_assert!(!self.is_assigned(lit.var()));
        self.assign(lit, Some(antecedent));
    }

    fn assign(&mut self, lit: Lit, antecedent: Antecedent) {
        self.state[lit.var().index()] = Some(VarState {
            value: lit.is_positive(),
            level: self.current_level(),
            antecedent,
        });
        self.trail.push(lit);
    }

    /// Remove every trail entry with level `> level`, unassigning those variables.
    ///
    /// `level` must be `<` the current level. Returns the unassigned literals, in their original
    /// trail order, so callers can reinsert their variables into the branching heuristic.
    pub fn backtrack_to(&mut self, level: usize) -> Vec<Lit> {
        debug_assert!(level < self.current_level());
        let cut = self.level_starts[level + 1];
        let unassigned = self.trail[cut..].to_vec();
        for &lit in &unassigned {
            self.state[lit.var().index()] = None;
        }
        self.trail.truncate(cut);
        self.level_starts.truncate(level + 1);
        unassigned
    }

    /// Whether every tracked variable has a value.
    pub fn all_assigned(&self) -> bool {
        self.trail.len() == self.state.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cdcl_formula::{lit, var};

    #[test]
    fn decisions_and_implications() {
        let mut trail = Trail::new();
        trail.set_var_count(3);

        trail.push_decision(lit![1]);
        assert_eq!(trail.current_level(), 1);
        assert_eq!(trail.level_of(var![1]), 1);
        assert_eq!(trail.antecedent_of(var![1]), None);

        trail.push_implication(lit![2], ClauseId::from_index(0));
        assert_eq!(trail.level_of(var![2]), 1);
        assert_eq!(trail.antecedent_of(var![2]), Some(ClauseId::from_index(0)));

        trail.push_decision(lit![-3]);
        assert_eq!(trail.current_level(), 2);
        assert!(trail.all_assigned());

        let unassigned = trail.backtrack_to(1);
        assert_eq!(unassigned, vec![lit![-3]]);
        assert_eq!(trail.current_level(), 1);
        assert!(!trail.is_assigned(var![3]));
        assert!(trail.is_assigned(var![2]));
    }

    #[test]
    fn level_literals_tracks_ranges() {
        let mut trail = Trail::new();
        trail.set_var_count(4);

        trail.push_decision(lit![1]);
        trail.push_implication(lit![2], ClauseId::from_index(0));
        trail.push_decision(lit![3]);
        trail.push_implication(lit![4], ClauseId::from_index(1));

        assert_eq!(trail.level_literals(1), &[lit![1], lit![2]]);
        assert_eq!(trail.level_literals(2), &[lit![3], lit![4]]);
    }
}
