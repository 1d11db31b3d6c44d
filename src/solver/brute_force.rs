use crate::formula::{Cnf, Model, Variable};

use super::{Outcome, Solver};

/// Tries every assignment of the variables occurring in the formula.
///
/// Exponential in the number of variables, only meant as a reference for small instances.
#[derive(Debug)]
pub struct BruteForceSolver {
    formula: Cnf,
}

impl BruteForceSolver {
    /// Enumerates assignments of `variables[depth..]`, true before false.
    fn guess(&self, variables: &[Variable], depth: usize, assignment: &mut Model) -> bool {
        let variable = match variables.get(depth) {
            Some(&variable) => variable,
            None => return self.formula.is_satisfied_by(assignment),
        };

        for &value in &[true, false] {
            assignment.set(variable, value);
            if self.guess(variables, depth + 1, assignment) {
                return true;
            }
        }

        false
    }
}

impl Solver for BruteForceSolver {
    fn new(formula: Cnf) -> Self {
        BruteForceSolver { formula }
    }

    fn solve(self) -> Outcome {
        let variables: Vec<Variable> = self.formula.variables().into_iter().collect();
        debug!(
            "brute force over {} of {} variables",
            variables.len(),
            self.formula.num_variables()
        );

        let mut model = Model::new(self.formula.num_variables());

        if self.guess(&variables, 0, &mut model) {
            Outcome::Satisfiable(model)
        } else {
            Outcome::Unsatisfiable
        }
    }
}
