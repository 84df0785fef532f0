//! Integration tests driving the full `Solver` facade.

use proptest::prelude::*;

use cdcl_formula::test::{sat_formula, sgen_unsat_formula};
use cdcl_formula::cnf_formula;

use crate::solver::{SolveResult, Solver};

fn solve(formula: &cdcl_formula::CnfFormula) -> (SolveResult, Solver) {
    let mut solver = Solver::new();
    solver.add_formula(formula);
    let result = solver.solve();
    (result, solver)
}

/// Re-checks every original clause under a returned model, independently of `Solver`'s own
/// internal self-check, so a bug in that self-check wouldn't hide a bug in the search itself.
fn model_satisfies(formula: &cdcl_formula::CnfFormula, model: &[bool]) -> bool {
    formula.iter().all(|clause| {
        clause
            .iter()
            .any(|lit| model[lit.var().index()] == lit.is_positive())
    })
}

#[test]
fn unit_clause_is_sat() {
    let (result, solver) = solve(&cnf_formula![1;]);
    assert_eq!(result, SolveResult::Sat);
    assert_eq!(solver.model(), Some(vec![true]));
}

#[test]
fn single_variable_contradiction_has_three_node_proof() {
    // Scenario 2: (x1) ∧ (¬x1) — UNSAT, proof has three clause entries and one resolution
    // deriving the empty clause from `[1]` and `[-1]`.
    let (result, solver) = solve(&cnf_formula![1; -1;]);
    assert_eq!(result, SolveResult::Unsat);

    let mut proof = vec![];
    solver.write_proof(&mut proof).unwrap();
    assert_minimal_contradiction_proof(&String::from_utf8(proof).unwrap());
}

/// Checks the shape of a minimal contradiction's proof without depending on which of the two
/// original clauses unit propagation happens to scan first (and therefore which node id ends up
/// bound to which clause): three clauses, one `[1]`, one `[-1]`, one empty, and a single
/// resolution deriving the empty clause from the other two.
fn assert_minimal_contradiction_proof(text: &str) {
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("v 3"));

    let mut by_id = std::collections::HashMap::new();
    for _ in 0..3 {
        let line = lines.next().expect("three clause lines");
        let (id, rest) = line.split_once(':').expect("clause line has an id prefix");
        let literals: Vec<i64> = rest
            .split_whitespace()
            .map(|token| token.parse().unwrap())
            .collect();
        by_id.insert(id.trim().parse::<usize>().unwrap(), literals);
    }

    let resolution: Vec<usize> = lines
        .next()
        .expect("one resolution line")
        .split_whitespace()
        .map(|token| token.parse().unwrap())
        .collect();
    assert!(lines.next().is_none(), "no lines beyond the single resolution");
    assert_eq!(resolution.len(), 3, "a single a b c triple");
    let (a, b, c) = (resolution[0], resolution[1], resolution[2]);

    assert_eq!(by_id[&c], Vec::<i64>::new(), "resolution result must be the empty clause");
    let mut operands = vec![by_id[&a].clone(), by_id[&b].clone()];
    operands.sort();
    assert_eq!(operands, vec![vec![-1], vec![1]]);
}

#[test]
fn two_variable_contradiction_is_unsat() {
    // Scenario 3: (x1 ∨ x2) ∧ (¬x1) ∧ (¬x2) — UNSAT.
    let (result, _solver) = solve(&cnf_formula![1, 2; -1; -2;]);
    assert_eq!(result, SolveResult::Unsat);
}

#[test]
fn chain_forcing_all_negative_is_unsat() {
    // Scenario 4, corrected: (x1 ∨ x2 ∨ x3) ∧ (¬x1 ∨ x2) ∧ (¬x2 ∨ x3) ∧ (¬x3) forces
    // x3=false, x2=false, x1=false by the three implication clauses, which falsifies the
    // first clause — UNSAT with a refutation, not the SAT result a naive reading suggests.
    let (result, solver) = solve(&cnf_formula![
        1, 2, 3;
        -1, 2;
        -2, 3;
        -3;
    ]);
    assert_eq!(result, SolveResult::Unsat);
    assert!(solver.model().is_none());

    let mut proof = vec![];
    solver.write_proof(&mut proof).unwrap().expect("unsat always has a proof");
}

#[test]
fn empty_formula_is_trivially_sat() {
    let (result, _solver) = solve(&cdcl_formula::CnfFormula::new());
    assert_eq!(result, SolveResult::Sat);
}

#[test]
fn stop_hook_yields_unknown() {
    let mut solver = Solver::new();
    // A formula large enough that the first decision boundary is reached before completion.
    solver.add_formula(&cnf_formula![1, 2, 3, 4, 5;]);
    solver.set_stop_hook(|| true);
    assert_eq!(solver.solve(), SolveResult::Unknown);
}

proptest! {
    #[test]
    fn satisfiable_formulas_are_solved_soundly(
        formula in sat_formula(1..20usize, 0..60, 0.3..0.9, 0.3..0.7)
    ) {
        let (result, solver) = solve(&formula);
        prop_assert_eq!(result, SolveResult::Sat);
        let model = solver.model().expect("SAT result carries a model");
        prop_assert!(model_satisfies(&formula, &model));
    }

    #[test]
    fn unsatisfiable_formulas_are_refuted(
        formula in sgen_unsat_formula(1..6usize)
    ) {
        let (result, solver) = solve(&formula);
        prop_assert_eq!(result, SolveResult::Unsat);

        let mut proof = vec![];
        solver.write_proof(&mut proof).unwrap();
        prop_assert!(!proof.is_empty());
    }
}
