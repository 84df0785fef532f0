//! DIMACS CNF parser and writer for the cdcl SAT solver.

use std::{borrow::Borrow, io};

use cdcl_formula::{CnfFormula, Lit, Var};

use anyhow::Error;
use thiserror::Error;

/// Possible errors while parsing a DIMACS CNF formula.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("line {}: unexpected token '{}'", line, token)]
    UnexpectedInput { line: usize, token: String },
    #[error("line {}: literal index too large: {}", line, value)]
    LiteralTooLarge { line: usize, value: String },
    #[error("line {}: invalid header syntax: {}", line, header)]
    InvalidHeader { line: usize, header: String },
    #[error("line {}: unterminated clause", line)]
    UnterminatedClause { line: usize },
    #[error(
        "formula has {} variables while the header specifies {} variables",
        var_count,
        header_var_count
    )]
    VarCount {
        var_count: usize,
        header_var_count: usize,
    },
    #[error(
        "formula has {} clauses while the header specifies {} clauses",
        clause_count,
        header_clause_count
    )]
    ClauseCount {
        clause_count: usize,
        header_clause_count: usize,
    },
}

/// Variable and clause count present in a DIMACS CNF header.
#[derive(Copy, Clone, Debug)]
pub struct DimacsHeader {
    pub var_count: usize,
    pub clause_count: usize,
}

/// Parse a complete DIMACS CNF document.
///
/// Comment lines (`c ...`) and the `p cnf V C` header are recognized; everything else is read as
/// a sequence of whitespace-separated signed integers, each clause terminated by a `0`. The
/// header's counts are checked against the parsed formula once parsing finishes; a mismatch is
/// reported as [`ParserError::VarCount`]/[`ParserError::ClauseCount`].
///
/// Duplicate literals within a clause are deduplicated; a clause containing both a literal and
/// its negation is a tautology and is dropped (its variables still count towards the formula's
/// variable count).
pub fn parse_dimacs(input: impl io::Read) -> Result<CnfFormula, Error> {
    use io::BufRead;

    let mut formula = CnfFormula::new();
    let mut header: Option<DimacsHeader> = None;
    let mut partial_clause: Vec<Lit> = vec![];
    let mut clause_count = 0usize;

    for (line_index, line) in io::BufReader::new(input).lines().enumerate() {
        let line_number = line_index + 1;
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('c') {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                continue;
            }
        }

        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(ParserError::UnexpectedInput {
                    line: line_number,
                    token: trimmed.to_owned(),
                }
                .into());
            }
            let parsed_header = parse_header_line(line_number, trimmed)?;
            formula.set_var_count(parsed_header.var_count);
            header = Some(parsed_header);
            continue;
        }

        for token in trimmed.split_whitespace() {
            let value: isize = token.parse().map_err(|_| {
                if token.trim_start_matches('-').chars().all(|c| c.is_ascii_digit()) {
                    ParserError::LiteralTooLarge {
                        line: line_number,
                        value: token.to_owned(),
                    }
                } else {
                    ParserError::UnexpectedInput {
                        line: line_number,
                        token: token.to_owned(),
                    }
                }
            })?;

            if value == 0 {
                if let Some(clause) = dedup_clause(&partial_clause) {
                    formula.add_clause(&clause);
                } else {
                    let max_index = partial_clause
                        .iter()
                        .map(|lit| lit.index() + 1)
                        .max()
                        .unwrap_or(0);
                    if max_index > formula.var_count() {
                        formula.set_var_count(max_index);
                    }
                }
                partial_clause.clear();
                clause_count += 1;
            } else {
                let magnitude = value.unsigned_abs() as usize;
                if magnitude > Var::max_count() {
                    return Err(ParserError::LiteralTooLarge {
                        line: line_number,
                        value: token.to_owned(),
                    }
                    .into());
                }
                partial_clause.push(Var::from_dimacs(value.abs()).lit(value > 0));
            }
        }
    }

    if !partial_clause.is_empty() {
        return Err(ParserError::UnterminatedClause {
            // the line number of an unterminated trailing clause is the last line read
            line: clause_count + 1,
        }
        .into());
    }

    if let Some(header) = header {
        let var_count = formula.var_count();
        if var_count != header.var_count {
            return Err(ParserError::VarCount {
                var_count,
                header_var_count: header.var_count,
            }
            .into());
        }
        if clause_count != header.clause_count {
            return Err(ParserError::ClauseCount {
                clause_count,
                header_clause_count: header.clause_count,
            }
            .into());
        }
    }

    Ok(formula)
}

fn parse_header_line(line_number: usize, line: &str) -> Result<DimacsHeader, ParserError> {
    let invalid = || ParserError::InvalidHeader {
        line: line_number,
        header: line.to_owned(),
    };

    let mut fields = line.split_whitespace();
    if fields.next() != Some("p") {
        return Err(invalid());
    }
    if fields.next() != Some("cnf") {
        return Err(invalid());
    }
    let var_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
    let clause_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    if var_count > Var::max_count() {
        return Err(ParserError::LiteralTooLarge {
            line: line_number,
            value: var_count.to_string(),
        });
    }

    Ok(DimacsHeader {
        var_count,
        clause_count,
    })
}

/// Deduplicates literals in a clause, preserving first-occurrence order, and returns `None` if
/// the clause is a tautology (contains both a literal and its negation).
///
/// Clause sizes in practice are small, so the quadratic membership check is not worth avoiding
/// with a scratch hash set.
fn dedup_clause(literals: &[Lit]) -> Option<Vec<Lit>> {
    let mut deduped: Vec<Lit> = Vec::with_capacity(literals.len());
    for &lit in literals {
        if deduped.contains(&!lit) {
            return None;
        }
        if !deduped.contains(&lit) {
            deduped.push(lit);
        }
    }
    Some(deduped)
}

/// Write a DIMACS CNF header.
///
/// Can be used with [`write_dimacs_clauses`] to implement incremental writing.
pub fn write_dimacs_header(target: &mut impl io::Write, header: DimacsHeader) -> io::Result<()> {
    writeln!(
        target,
        "p cnf {var_count} {clause_count}",
        var_count = header.var_count,
        clause_count = header.clause_count
    )
}

/// Write an iterator of clauses as headerless DIMACS CNF.
///
/// Can be used with [`write_dimacs_header`] to implement incremental writing.
pub fn write_dimacs_clauses(
    target: &mut impl io::Write,
    clauses: impl IntoIterator<Item = impl IntoIterator<Item = impl Borrow<Lit>>>,
) -> io::Result<()> {
    for clause in clauses.into_iter() {
        for lit in clause.into_iter() {
            itoa::write(&mut *target, lit.borrow().to_dimacs())?;
            target.write_all(b" ")?;
        }
        target.write_all(b"0\n")?;
    }
    Ok(())
}

/// Write a formula as DIMACS CNF.
///
/// Use [`write_dimacs_header`] and [`write_dimacs_clauses`] to implement incremental writing.
pub fn write_dimacs(target: &mut impl io::Write, formula: &CnfFormula) -> io::Result<()> {
    write_dimacs_header(
        &mut *target,
        DimacsHeader {
            var_count: formula.var_count(),
            clause_count: formula.len(),
        },
    )?;
    write_dimacs_clauses(&mut *target, formula.iter())
}
