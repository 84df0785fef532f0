//! Unit propagation.
//!
//! A naive, quadratic scan-per-clause propagator: every clause is rescanned on every pass. This
//! is the simplification the two-watched-literals scheme optimizes; both satisfy the same
//! contract, and this design keeps the simpler one since the clause store has no indexing
//! structure to maintain it.

use crate::clause::{ClauseDb, ClauseId};
use crate::trail::Trail;

/// Classification of a clause under the current trail.
enum ClauseStatus {
    Satisfied,
    /// The clause's sole unassigned literal, to be pushed as an implication.
    Unit(cdcl_formula::Lit),
    Falsified,
    Unresolved,
}

fn classify(clause: &[cdcl_formula::Lit], trail: &Trail) -> ClauseStatus {
    let mut unassigned = None;
    let mut unassigned_count = 0;

    for &lit in clause {
        match trail.value_of(lit.var()) {
            Some(value) if value == lit.is_positive() => return ClauseStatus::Satisfied,
            Some(_) => {}
            None => {
                unassigned_count += 1;
                unassigned = Some(lit);
            }
        }
    }

    match unassigned_count {
        0 => ClauseStatus::Falsified,
        1 => ClauseStatus::Unit(unassigned.unwrap()),
        _ => ClauseStatus::Unresolved,
    }
}

/// Compute the closure of the current partial assignment under unit propagation.
///
/// Visits clauses in storage order, repeating full passes until one yields no new implication
/// and no conflict. Returns the id of a falsified clause on conflict.
pub fn propagate(trail: &mut Trail, clauses: &ClauseDb) -> Result<(), ClauseId> {
    loop {
        let mut made_progress = false;

        for (id, clause) in clauses.iter() {
            match classify(clause.literals(), trail) {
                ClauseStatus::Satisfied | ClauseStatus::Unresolved => {}
                ClauseStatus::Unit(lit) => {
                    trail.push_implication(lit, id);
                    made_progress = true;
                }
                ClauseStatus::Falsified => return Err(id),
            }
        }

        if !made_progress {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cdcl_formula::{lit, lits};

    #[test]
    fn propagates_unit_chain() {
        let mut db = ClauseDb::new();
        db.add_original(lits![1].to_vec());
        db.add_original(lits![-1, 2].to_vec());
        db.add_original(lits![-2, 3].to_vec());

        let mut trail = Trail::new();
        trail.set_var_count(3);

        propagate(&mut trail, &db).unwrap();

        assert!(trail.lit_is_true(lit![1]));
        assert!(trail.lit_is_true(lit![2]));
        assert!(trail.lit_is_true(lit![3]));
    }

    #[test]
    fn detects_conflict() {
        let mut db = ClauseDb::new();
        db.add_original(lits![1].to_vec());
        db.add_original(lits![-1].to_vec());

        let mut trail = Trail::new();
        trail.set_var_count(1);

        let conflict = propagate(&mut trail, &db).unwrap_err();
        assert_eq!(db.get(conflict).literals(), &lits![-1]);
    }
}
