/*!
Simplification rules over a list of clauses.

Every function here builds a new clause list and leaves its input untouched,
so a caller can retry the opposite polarity from the same starting point.
*/

use std::collections::BTreeSet;

use crate::formula::{Clause, Literal};

/// Assigning a literal falsified every literal of some clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Every distinct literal occurring in any clause.
pub fn literals_appearing(clauses: &[Clause]) -> BTreeSet<Literal> {
    clauses.iter().flat_map(|clause| clause.iter()).collect()
}

/// Literals whose negation occurs nowhere in `clauses`.
pub fn pure_literals(clauses: &[Clause]) -> BTreeSet<Literal> {
    let literals = literals_appearing(clauses);
    literals
        .iter()
        .copied()
        .filter(|&literal| !literals.contains(&!literal))
        .collect()
}

/// Drops every clause containing a pure literal.
/// Returns the remaining clauses and the pure literals, which are all assigned at once.
pub fn eliminate_pure_literals(clauses: Vec<Clause>) -> (Vec<Clause>, Vec<Literal>) {
    let pure = pure_literals(&clauses);
    if pure.is_empty() {
        return (clauses, Vec::new());
    }

    let remaining = clauses
        .into_iter()
        .filter(|clause| !clause.iter().any(|literal| pure.contains(&literal)))
        .collect();

    (remaining, pure.into_iter().collect())
}

/// The literal of every unit clause, in clause order.
pub fn unit_clauses(clauses: &[Clause]) -> Vec<Literal> {
    clauses
        .iter()
        .filter(|clause| clause.is_unit())
        .flat_map(|clause| clause.iter())
        .collect()
}

/// Restricts `clauses` to the branch where `literal` is true.
///
/// Clauses containing `literal` are dropped, and `!literal` is struck from the others.
/// A clause holding both is dropped, never conflicted.
pub fn assign_literal(clauses: &[Clause], literal: Literal) -> Result<Vec<Clause>, Conflict> {
    let mut reduced = Vec::with_capacity(clauses.len());

    for clause in clauses {
        if clause.contains(literal) {
            continue;
        }

        if clause.contains(!literal) {
            let struck: Clause = clause.iter().filter(|&l| l != !literal).collect();
            if struck.is_empty() {
                return Err(Conflict);
            }
            reduced.push(struck);
        } else {
            reduced.push(clause.clone());
        }
    }

    Ok(reduced)
}

/// Assigns the first unit clause until none is left.
/// Returns the reduced clauses with the assigned literals in assignment order.
pub fn unit_propagate(mut clauses: Vec<Clause>) -> Result<(Vec<Clause>, Vec<Literal>), Conflict> {
    let mut assigned = Vec::new();

    while let Some(literal) = first_unit(&clauses) {
        clauses = assign_literal(&clauses, literal)?;
        assigned.push(literal);
    }

    Ok((clauses, assigned))
}

fn first_unit(clauses: &[Clause]) -> Option<Literal> {
    clauses
        .iter()
        .find(|clause| clause.is_unit())
        .and_then(|clause| clause.iter().next())
}

/// Whether some clause has no literal left.
pub fn has_empty_clause(clauses: &[Clause]) -> bool {
    clauses.iter().any(|clause| clause.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(raw: &[&[i64]]) -> Vec<Clause> {
        raw.iter().map(|c| Clause::from_dimacs(c).unwrap()).collect()
    }

    fn literals(raw: &[i64]) -> Vec<Literal> {
        raw.iter().map(|&l| Literal::from_dimacs(l).unwrap()).collect()
    }

    fn lit(raw: i64) -> Literal {
        Literal::from_dimacs(raw).unwrap()
    }

    #[test]
    fn appearing_and_pure() {
        let f = clauses(&[&[1, 2], &[1, 3], &[-2, -3], &[2, 2]]);

        let appearing: Vec<Literal> = literals_appearing(&f).into_iter().collect();
        assert_eq!(appearing, literals(&[1, -2, 2, -3, 3]));

        let pure: Vec<Literal> = pure_literals(&f).into_iter().collect();
        assert_eq!(pure, literals(&[1]));
    }

    #[test]
    fn eliminate_several_pure_literals() {
        let f = clauses(&[&[1, 2], &[-2, 3], &[2, -4], &[-2, 4]]);

        let (reduced, assigned) = eliminate_pure_literals(f);
        assert_eq!(assigned, literals(&[1, 3]));
        assert_eq!(reduced, clauses(&[&[2, -4], &[-2, 4]]));
    }

    #[test]
    fn eliminate_without_pure_literals() {
        let f = clauses(&[&[1, 2], &[-1, -2]]);

        let (reduced, assigned) = eliminate_pure_literals(f.clone());
        assert!(assigned.is_empty());
        assert_eq!(reduced, f);
    }

    #[test]
    fn units_in_order() {
        let f = clauses(&[&[3], &[1, 2], &[-1], &[2, 2], &[]]);
        assert_eq!(unit_clauses(&f), literals(&[3, -1]));
    }

    #[test]
    fn assign_drops_and_strikes() {
        let f = clauses(&[&[1, 2], &[-1, 3, -1], &[2, 3], &[]]);

        let reduced = assign_literal(&f, lit(1)).unwrap();
        assert_eq!(reduced, clauses(&[&[3], &[2, 3], &[]]));

        // the input is left as it was
        assert_eq!(f.len(), 4);
    }

    #[test]
    fn assign_conflict() {
        let f = clauses(&[&[2, 3], &[-1], &[1, 2]]);
        assert_eq!(assign_literal(&f, lit(1)), Err(Conflict));

        let f = clauses(&[&[-1, -1]]);
        assert_eq!(assign_literal(&f, lit(1)), Err(Conflict));
    }

    #[test]
    fn assign_tautology_is_dropped() {
        let f = clauses(&[&[-1, 1], &[1, -1, 2]]);

        assert_eq!(assign_literal(&f, lit(1)), Ok(Vec::new()));
        assert_eq!(assign_literal(&f, lit(-1)), Ok(Vec::new()));
    }

    #[test]
    fn propagate_chain() {
        let f = clauses(&[&[1], &[-1, 2], &[-2, 3, 4], &[-3, -2], &[5, 6, -4]]);

        let (reduced, assigned) = unit_propagate(f).unwrap();
        assert_eq!(assigned, literals(&[1, 2, -3, 4]));
        assert_eq!(reduced, clauses(&[&[5, 6]]));
    }

    #[test]
    fn propagate_conflicting_units() {
        let f = clauses(&[&[1], &[-1]]);
        assert_eq!(unit_propagate(f), Err(Conflict));

        let f = clauses(&[&[1], &[-1, 2], &[-2, -1]]);
        assert_eq!(unit_propagate(f), Err(Conflict));
    }

    #[test]
    fn propagate_without_units_is_identity() {
        let f = clauses(&[&[1, 2], &[-1, -2], &[]]);

        let (reduced, assigned) = unit_propagate(f.clone()).unwrap();
        assert!(assigned.is_empty());
        assert_eq!(reduced, f);
    }

    #[test]
    fn empty_clause_detection() {
        assert!(!has_empty_clause(&clauses(&[&[1], &[2, 3]])));
        assert!(has_empty_clause(&clauses(&[&[1], &[]])));
        assert!(!has_empty_clause(&[]));
    }
}
