//! Generates the DIMACS CNF encoding of the Einstein "who owns the fish" puzzle.
//!
//! Five houses, five categories (color, nationality, drink, cigarette, pet), five values each.
//! Variable `eval(house, category, value) = house + 5 * global_index(value)`, where
//! `global_index` runs 0..25 across all 25 values of all five categories, giving 125 variables
//! total — the same numbering `einstein.py` uses, reimplemented without its file-writing side
//! effects.

use std::io;

use anyhow::Error;

use cdcl_dimacs::write_dimacs;
use cdcl_formula::{CnfFormula, Lit};

const NUM_HOUSES: usize = 5;

/// One of the five attribute categories, holding its five values in the fixed order that
/// determines their global index.
struct Category {
    values: [&'static str; 5],
    /// Offset into the 0..25 global value index space.
    base: usize,
}

const COLOR: Category = Category {
    values: ["blue", "green", "red", "white", "yellow"],
    base: 0,
};
const NATIONALITY: Category = Category {
    values: ["dane", "brit", "german", "swede", "norwegian"],
    base: 5,
};
const DRINK: Category = Category {
    values: ["beer", "coffee", "milk", "tea", "water"],
    base: 10,
};
const CIGARETTE: Category = Category {
    values: ["blend", "bluemaster", "dunhill", "pallmall", "prince"],
    base: 15,
};
const PET: Category = Category {
    values: ["birds", "cats", "dogs", "fish", "horses"],
    base: 20,
};

const CATEGORIES: [&Category; 5] = [&COLOR, &NATIONALITY, &DRINK, &CIGARETTE, &PET];

impl Category {
    fn index_of(&self, value: &str) -> usize {
        self.values
            .iter()
            .position(|&v| v == value)
            .unwrap_or_else(|| panic!("unknown value '{}'", value))
    }
}

/// The variable asserting "the house at 1-based position `house` has `value` in `category`".
fn var(house: usize, category: &Category, value: &str) -> Lit {
    debug_assert!((1..=NUM_HOUSES).contains(&house));
    let global_index = category.base + category.index_of(value);
    Lit::from_dimacs((house + 5 * global_index) as isize)
}

/// `type1`'s `attr1` is immediately next to `type2`'s `attr2`, in either direction.
fn neighbour(cnf: &mut CnfFormula, type1: &Category, attr1: &str, type2: &Category, attr2: &str) {
    for house in 1..=NUM_HOUSES {
        let mut clause = vec![!var(house, type1, attr1)];
        if house > 1 {
            clause.push(var(house - 1, type2, attr2));
        }
        if house < NUM_HOUSES {
            clause.push(var(house + 1, type2, attr2));
        }
        cnf.add_clause(clause);
    }
}

/// `type1`'s `attr1` holds at a house iff `type2`'s `attr2` does, at every house.
fn bi_implication(cnf: &mut CnfFormula, type1: &Category, attr1: &str, type2: &Category, attr2: &str) {
    for house in 1..=NUM_HOUSES {
        cnf.add_clause(vec![!var(house, type1, attr1), var(house, type2, attr2)]);
        cnf.add_clause(vec![var(house, type1, attr1), !var(house, type2, attr2)]);
    }
}

/// Exactly-one constraints: every value of every category holds at exactly one house, and every
/// house has exactly one value per category.
fn add_assumptions(cnf: &mut CnfFormula) {
    for category in &CATEGORIES {
        for &value in &category.values {
            cnf.add_clause((1..=NUM_HOUSES).map(|house| var(house, category, value)));

            for house in 1..=NUM_HOUSES {
                for other_house in 1..house {
                    cnf.add_clause(vec![!var(house, category, value), !var(other_house, category, value)]);
                }
                for &other_value in &category.values {
                    if other_value != value {
                        cnf.add_clause(vec![!var(house, category, value), !var(house, category, other_value)]);
                    }
                }
            }
        }
    }
}

fn build_puzzle() -> CnfFormula {
    let mut cnf = CnfFormula::new();

    add_assumptions(&mut cnf);

    // The Brit lives in the red house.
    bi_implication(&mut cnf, &NATIONALITY, "brit", &COLOR, "red");
    // The Swede keeps dogs as pets.
    bi_implication(&mut cnf, &NATIONALITY, "swede", &PET, "dogs");
    // The Dane drinks tea.
    bi_implication(&mut cnf, &NATIONALITY, "dane", &DRINK, "tea");

    // The green house is somewhere to the left of the white house.
    for house in 1..NUM_HOUSES {
        let mut clause = vec![!var(house, &COLOR, "green")];
        clause.extend((house + 1..=NUM_HOUSES).map(|other| var(other, &COLOR, "white")));
        cnf.add_clause(clause);
    }
    cnf.add_clause(vec![!var(NUM_HOUSES, &COLOR, "green")]);

    // The green house's owner drinks coffee.
    bi_implication(&mut cnf, &DRINK, "coffee", &COLOR, "green");
    // The person who smokes Pall Mall rears birds.
    bi_implication(&mut cnf, &CIGARETTE, "pallmall", &PET, "birds");
    // The owner of the yellow house smokes Dunhill.
    bi_implication(&mut cnf, &COLOR, "yellow", &CIGARETTE, "dunhill");
    // The man living in the center house drinks milk.
    cnf.add_clause(vec![var(3, &DRINK, "milk")]);
    // The Norwegian lives in the first house.
    cnf.add_clause(vec![var(1, &NATIONALITY, "norwegian")]);
    // The man who smokes Blends lives next to the one who keeps cats.
    neighbour(&mut cnf, &CIGARETTE, "blend", &PET, "cats");
    // The man who keeps the horse lives next to the man who smokes Dunhill.
    neighbour(&mut cnf, &PET, "horses", &CIGARETTE, "dunhill");
    // The owner who smokes Bluemasters drinks beer.
    bi_implication(&mut cnf, &CIGARETTE, "bluemaster", &DRINK, "beer");
    // The German smokes Prince.
    bi_implication(&mut cnf, &NATIONALITY, "german", &CIGARETTE, "prince");
    // The Norwegian lives next to the blue house.
    cnf.add_clause(vec![var(2, &COLOR, "blue")]);
    // The man who smokes Blends has a neighbor who drinks water.
    neighbour(&mut cnf, &CIGARETTE, "blend", &DRINK, "water");

    cnf
}

fn main() -> Result<(), Error> {
    let cnf = build_puzzle();
    let stdout = io::stdout();
    write_dimacs(&mut stdout.lock(), &cnf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_numbering_matches_the_original_encoding() {
        assert_eq!(var(1, &COLOR, "blue").to_dimacs(), 1);
        assert_eq!(var(5, &COLOR, "blue").to_dimacs(), 5);
        assert_eq!(var(1, &PET, "horses").to_dimacs(), 121);
        assert_eq!(var(5, &PET, "horses").to_dimacs(), 125);
    }

    #[test]
    fn puzzle_has_125_variables() {
        let cnf = build_puzzle();
        assert_eq!(cnf.var_count(), 125);
    }

    /// Scenario 5: the puzzle has a unique solution, and it places the fish with the German.
    #[test]
    fn unique_solution_places_the_fish_with_the_german() {
        use cdcl_core::{SolveResult, Solver};

        let cnf = build_puzzle();
        let mut solver = Solver::new();
        solver.add_formula(&cnf);
        assert_eq!(solver.solve(), SolveResult::Sat);
        let model = solver.model().expect("SAT result carries a model");

        let holds = |house: usize, category: &Category, value: &str| {
            model[var(house, category, value).var().index()]
        };

        let house_with = |category: &Category, value: &str| {
            (1..=NUM_HOUSES)
                .find(|&house| holds(house, category, value))
                .expect("exactly-one constraints guarantee some house holds every value")
        };

        // Every (house, category) pair has exactly one true value.
        for category in &CATEGORIES {
            for house in 1..=NUM_HOUSES {
                let true_values = category
                    .values
                    .iter()
                    .filter(|&&value| holds(house, category, value))
                    .count();
                assert_eq!(true_values, 1);
            }
        }

        assert_eq!(house_with(&PET, "fish"), house_with(&NATIONALITY, "german"));
    }
}
