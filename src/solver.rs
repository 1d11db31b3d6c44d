use crate::formula::{Cnf, Model};

mod brute_force;
mod dpll;
pub mod reduce;

pub use brute_force::BruteForceSolver;
pub use dpll::{DpllSolver, SearchStats};

/// Result of deciding a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The formula holds under the total model.
    Satisfiable(Model),
    Unsatisfiable,
}

impl Outcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Outcome::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Outcome::Satisfiable(model) => Some(model),
            Outcome::Unsatisfiable => None,
        }
    }

    pub fn into_model(self) -> Option<Model> {
        match self {
            Outcome::Satisfiable(model) => Some(model),
            Outcome::Unsatisfiable => None,
        }
    }
}

pub trait Solver {
    /// Creates a new solver instance.
    fn new(formula: Cnf) -> Self;

    /// Solves a CNF SAT problem with the solver.
    fn solve(self) -> Outcome;
}

/// Decides `formula` with the DPLL solver.
pub fn solve(formula: Cnf) -> Outcome {
    DpllSolver::new(formula).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn solve_runs_dpll() {
        let formula = parse_str("p cnf 3 3\n1 2 0\n-1 0\n-2 3 0\n").unwrap();
        let outcome = solve(formula.clone());

        let model = outcome.model().unwrap();
        assert!(formula.is_satisfied_by(model));
        assert_eq!(model.assignment(), &[false, true, true]);
        assert_eq!(outcome, DpllSolver::new(formula).solve());

        let formula = parse_str("p cnf 1 2\n1 0\n-1 0\n").unwrap();
        let outcome = solve(formula);
        assert_eq!(outcome, Outcome::Unsatisfiable);
        assert!(outcome.model().is_none());
    }
}
