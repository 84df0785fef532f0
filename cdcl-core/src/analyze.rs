//! Conflict analysis and clause learning.
//!
//! Implements the 1-UIP variant: starting from the falsified clause, resolve
//! away literals assigned at the current decision level, most recently implied first, until at
//! most one remains. The result is, by construction, a resolvent of clauses already known to
//! follow from the formula, so it is itself a sound consequence of it (invariant 6).
//!
//! A decision level of `0` has no decision literal to stop at: every variable on the trail was
//! forced by propagation and therefore has an antecedent, so the loop keeps resolving until the
//! clause is genuinely empty. This is what produces the termination certificate for UNSAT rather
//! than a stray unit clause, and it falls out of the same loop without a special case.

use cdcl_formula::Lit;

use crate::clause::ClauseDb;
use crate::proof::{NodeId, Proof};
use crate::trail::Trail;

/// The result of analyzing one conflict.
pub struct Analysis {
    /// The learned clause. Empty iff the formula is unsatisfiable at level 0.
    pub learned: Vec<Lit>,
    /// The decision level to backtrack to before asserting `learned`'s remaining literal.
    /// Meaningless when `learned` is empty.
    pub backtrack_level: usize,
    /// The proof DAG node deriving `learned` from the original clauses.
    pub proof_node: NodeId,
}

/// Resolve `conflict` back to a single asserting clause (or the empty clause, at level 0).
pub fn analyze(trail: &Trail, clauses: &ClauseDb, proof: &mut Proof, conflict: crate::clause::ClauseId) -> Analysis {
    let current_level = trail.current_level();

    let conflict_clause = clauses.get(conflict);
    let mut resolvent: Vec<Lit> = conflict_clause.literals().to_vec();
    let mut node = proof.node_for_clause(conflict, &resolvent);

    loop {
        if resolvent.is_empty() {
            break;
        }

        let current_level_count = resolvent
            .iter()
            .filter(|lit| trail.level_of(lit.var()) == current_level)
            .count();

        if current_level > 0 && current_level_count <= 1 {
            break;
        }

        let pivot = most_recently_implied(trail, &resolvent, current_level)
            .expect("a resolvable literal exists while the clause is non-empty");
        let var = pivot.var();
        let antecedent_id = trail
            .antecedent_of(var)
            .expect("a literal chosen for resolution is never a decision");
        let antecedent_clause = clauses.get(antecedent_id);
        let antecedent_node = proof.node_for_clause(antecedent_id, antecedent_clause.literals());

        let mut resolved: Vec<Lit> = resolvent.iter().copied().filter(|&lit| lit != pivot).collect();
        for &lit in antecedent_clause.literals() {
            if lit.var() != var && !resolved.contains(&lit) {
                resolved.push(lit);
            }
        }

        node = proof.resolve(node, antecedent_node, &resolved);
        resolvent = resolved;
    }

    let backtrack_level = if resolvent.is_empty() {
        0
    } else {
        resolvent
            .iter()
            .map(|lit| trail.level_of(lit.var()))
            .filter(|&level| level != current_level)
            .max()
            .unwrap_or(0)
    };

    Analysis {
        learned: resolvent,
        backtrack_level,
        proof_node: node,
    }
}

/// Find the literal in `clause` at `level` that was implied most recently, i.e. latest in trail
/// order, breaking ties between resolution candidates by picking the most recently implied one.
/// Every candidate resolved on is at the current decision level, so walking just that level's
/// slice of the trail in reverse is enough; the first match found is the most recent one.
fn most_recently_implied(trail: &Trail, clause: &[Lit], level: usize) -> Option<Lit> {
    for &trail_lit in trail.level_literals(level).iter().rev() {
        let candidate = !trail_lit;
        if clause.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use cdcl_formula::{lit, lits};

    use crate::clause::ClauseDb;

    #[test]
    fn level_zero_conflict_yields_empty_clause() {
        let mut clauses = ClauseDb::new();
        let unit = clauses.add_original(lits![1].to_vec());
        let negated = clauses.add_original(lits![-1].to_vec());

        let mut trail = Trail::new();
        trail.set_var_count(1);
        trail.push_implication(lit![1], unit);

        let mut proof = Proof::new();
        let analysis = analyze(&trail, &clauses, &mut proof, negated);

        assert!(analysis.learned.is_empty());
        assert_eq!(analysis.backtrack_level, 0);
    }

    #[test]
    fn stops_at_first_uip() {
        // 1 -> 3, 2 -> 3 (both at level 1, decided as 1 then 2 implied? construct manually)
        // Decision x1 @1, implies x3 via (¬1 ∨ 3). Decision x2 @2, implies ¬3 via (¬2 ∨ ¬3),
        // which conflicts with x3 already being true: falsified clause is (¬2 ∨ ¬3).
        let mut clauses = ClauseDb::new();
        let c1 = clauses.add_original(lits![-1, 3].to_vec());
        let c2 = clauses.add_original(lits![-2, -3].to_vec());

        let mut trail = Trail::new();
        trail.set_var_count(3);
        trail.push_decision(lit![1]);
        trail.push_implication(lit![3], c1);
        trail.push_decision(lit![2]);

        let mut proof = Proof::new();
        let analysis = analyze(&trail, &clauses, &mut proof, c2);

        // Resolving (¬2 ∨ ¬3) with (¬1 ∨ 3) on var 3 yields (¬2 ∨ ¬1), asserting ¬2 at level 2,
        // backtracking to level 1 (the level of ¬1).
        assert_eq!(analysis.learned.len(), 2);
        assert!(analysis.learned.contains(&lit![-2]));
        assert!(analysis.learned.contains(&lit![-1]));
        assert_eq!(analysis.backtrack_level, 1);
    }
}
