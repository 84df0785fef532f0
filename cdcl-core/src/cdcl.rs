//! The search driver: decide, propagate, and on conflict analyze and backtrack.
//!
//! This is the top level unrolled into one loop: propagate at level 0, then repeatedly
//! pick a decision, propagate its consequences, and on conflict learn a clause and backjump,
//! until every variable is assigned or the empty clause is derived.

use log::debug;

use crate::analyze::analyze;
use crate::clause::ClauseDb;
use crate::proof::Proof;
use crate::propagate::propagate;
use crate::trail::Trail;
use crate::vsids::Vsids;

/// Outcome of driving the search to completion or to a budget boundary.
pub enum SearchResult {
    Sat,
    Unsat,
    /// The caller's stop hook fired before a verdict was reached.
    Unknown,
}

/// Run the CDCL search loop.
///
/// `should_stop` is polled once per outer-loop iteration (a decision boundary), letting a caller
/// impose a budget on the search.
pub fn search(
    clauses: &mut ClauseDb,
    trail: &mut Trail,
    vsids: &mut Vsids,
    proof: &mut Proof,
    mut should_stop: impl FnMut() -> bool,
) -> SearchResult {
    if let Err(conflict) = propagate(trail, clauses) {
        let analysis = analyze(trail, clauses, proof, conflict);
        debug_assert!(analysis.learned.is_empty(), "a level-0 conflict must resolve to the empty clause");
        proof.set_terminal(analysis.proof_node);
        return SearchResult::Unsat;
    }
    sync_vsids(trail, vsids, 0);

    loop {
        if should_stop() {
            return SearchResult::Unknown;
        }

        if trail.all_assigned() {
            return SearchResult::Sat;
        }

        let decision = vsids
            .pop_decision_literal()
            .expect("some variable is unassigned while not all_assigned");
        trail.push_decision(decision);

        loop {
            let before = trail.trail().len();
            match propagate(trail, clauses) {
                Ok(()) => {
                    sync_vsids(trail, vsids, before);
                    break;
                }
                Err(conflict) => {
                    let analysis = analyze(trail, clauses, proof, conflict);

                    if analysis.learned.is_empty() {
                        proof.set_terminal(analysis.proof_node);
                        return SearchResult::Unsat;
                    }

                    debug_assert!(analysis.backtrack_level < trail.current_level());

                    let learned_id = clauses.add_learned(analysis.learned.clone());
                    proof.bind_clause(learned_id, analysis.proof_node);
                    vsids.bump_all(clauses.get(learned_id).literals());
                    vsids.note_conflict();

                    debug!(
                        "learned clause of size {} at conflict, backtracking to level {}",
                        analysis.learned.len(),
                        analysis.backtrack_level
                    );

                    let unassigned = trail.backtrack_to(analysis.backtrack_level);
                    for lit in unassigned {
                        vsids.make_available(lit.var());
                    }

                    // The freshly learned clause is now unit under the backtracked assignment;
                    // the next propagate() call in this inner loop will find and push it.
                }
            }
        }
    }
}

/// Remove every variable assigned since trail index `since` from the VSIDS heap of decision
/// candidates, matching the trail's new assignments.
fn sync_vsids(trail: &Trail, vsids: &mut Vsids, since: usize) {
    for &lit in &trail.trail()[since..] {
        vsids.remove(lit.var());
    }
}
