use crate::formula::{Clause, Cnf, Literal, Model};

use super::{
    reduce::{
        assign_literal, eliminate_pure_literals, has_empty_clause, unit_propagate, Conflict,
    },
    Outcome, Solver,
};

/// Counters collected over one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branching decisions, not counting the flipped second branches.
    pub decisions: usize,
    /// Branches closed by an empty clause.
    pub conflicts: usize,
    /// Literals fixed by pure-literal elimination.
    pub pure_literals: usize,
    /// Literals fixed by unit propagation.
    pub propagations: usize,
}

/// What a simplified formula asks the search to do next.
enum Step {
    Satisfied,
    Conflict,
    Decide(Vec<Clause>, Literal),
}

/// A decision whose second polarity has not been tried yet.
struct Backtrack {
    /// Formula right before the decision.
    clauses: Vec<Clause>,
    /// Trail length right before the decision.
    trail_len: usize,
    /// The negated decision.
    literal: Literal,
}

#[derive(Debug)]
pub struct DpllSolver {
    formula: Cnf,
    /// Literals fixed along the current path, in assignment order
    trail: Vec<Literal>,
    stats: SearchStats,
}

impl DpllSolver {
    /// Solves the formula and also returns the search counters.
    pub fn solve_with_stats(mut self) -> (Outcome, SearchStats) {
        let num_variables = self.formula.num_variables();
        let clauses = std::mem::take(&mut self.formula).into_clauses();

        let outcome = if self.search(clauses) {
            Outcome::Satisfiable(Model::from_literals(num_variables, &self.trail))
        } else {
            Outcome::Unsatisfiable
        };

        debug!(
            "DPLL finished: {} after {} decisions, {} conflicts, {} pure literals, {} propagations",
            if outcome.is_satisfiable() { "SAT" } else { "UNSAT" },
            self.stats.decisions,
            self.stats.conflicts,
            self.stats.pure_literals,
            self.stats.propagations,
        );

        (outcome, self.stats)
    }

    /// Depth-first search over an explicit stack of pending backtracks.
    /// Branches are visited in the same order as the textbook recursion.
    fn search(&mut self, clauses: Vec<Clause>) -> bool {
        let mut pending: Vec<Backtrack> = Vec::new();
        let mut step = self.simplify(clauses);

        loop {
            step = match step {
                Step::Satisfied => return true,
                Step::Decide(clauses, literal) => {
                    self.stats.decisions += 1;
                    trace!("decide {} at depth {}", literal, pending.len() + 1);

                    let trail_len = self.trail.len();
                    let next = self.branch(&clauses, literal);
                    pending.push(Backtrack {
                        clauses,
                        trail_len,
                        literal: !literal,
                    });
                    next
                }
                Step::Conflict => {
                    self.stats.conflicts += 1;

                    let backtrack = match pending.pop() {
                        Some(backtrack) => backtrack,
                        None => return false,
                    };
                    trace!(
                        "backtrack to depth {}, trying {}",
                        pending.len() + 1,
                        backtrack.literal
                    );

                    self.trail.truncate(backtrack.trail_len);
                    self.branch(&backtrack.clauses, backtrack.literal)
                }
            };
        }
    }

    /// Fixes `literal` on top of `clauses` and simplifies the result.
    fn branch(&mut self, clauses: &[Clause], literal: Literal) -> Step {
        match assign_literal(clauses, literal) {
            Ok(reduced) => {
                self.trail.push(literal);
                self.simplify(reduced)
            }
            Err(Conflict) => Step::Conflict,
        }
    }

    /// Applies pure-literal elimination and unit propagation until neither fixes a literal,
    /// then picks a decision.
    fn simplify(&mut self, mut clauses: Vec<Clause>) -> Step {
        loop {
            if clauses.is_empty() {
                return Step::Satisfied;
            }
            if has_empty_clause(&clauses) {
                return Step::Conflict;
            }

            let (reduced, pure) = eliminate_pure_literals(clauses);
            let (reduced, units) = match unit_propagate(reduced) {
                Ok(propagated) => propagated,
                Err(Conflict) => return Step::Conflict,
            };

            let progressed = !pure.is_empty() || !units.is_empty();
            self.stats.pure_literals += pure.len();
            self.stats.propagations += units.len();
            self.trail.extend(pure);
            self.trail.extend(units);
            clauses = reduced;

            if !progressed {
                break;
            }
        }

        // Note: first-encountered literal, no heuristics
        match clauses.first().and_then(|clause| clause.iter().next()) {
            Some(literal) => Step::Decide(clauses, literal),
            None => Step::Conflict,
        }
    }
}

impl Solver for DpllSolver {
    fn new(formula: Cnf) -> Self {
        // the trail never outgrows the variables the clauses mention
        let trail = Vec::with_capacity(formula.variables().len());

        DpllSolver {
            formula,
            trail,
            stats: SearchStats::default(),
        }
    }

    fn solve(self) -> Outcome {
        self.solve_with_stats().0
    }
}
