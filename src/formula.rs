/*!
A module to represent conjunctive normal form formula.
*/

use std::{
    collections::BTreeSet, convert::TryFrom, fmt::Display, iter::FromIterator, num::NonZeroU32,
    str::FromStr,
};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum VariableParseError {
    #[snafu(display("Failed to parse variable ID"))]
    InvalidInteger { source: std::num::ParseIntError },
    #[snafu(display("Variable ID must be non-zero"))]
    ZeroId,
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: usize = std::u32::MAX as usize;

    /// Creates a variable from its DIMACS ID.
    /// Returns `None` for zero.
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Variable)
    }

    pub fn id(&self) -> u32 {
        self.0.get()
    }

    pub fn as_index(&self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Creates a variable from a raw index.
    /// Returns `None` if the index is invalid.
    pub fn from_index(index: usize) -> Option<Self> {
        let id = index.checked_add(1)?;
        Variable::new(u32::try_from(id).ok()?)
    }

    pub fn index(&self) -> VariableIdx {
        VariableIdx(self.as_index())
    }
}

impl FromStr for Variable {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.parse::<u32>().context(InvalidInteger)?;
        Variable::new(num).context(ZeroId)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Zero-based position of a variable in per-variable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableIdx(usize);

impl From<usize> for VariableIdx {
    fn from(index: usize) -> Self {
        VariableIdx(index)
    }
}

impl From<VariableIdx> for usize {
    fn from(index: VariableIdx) -> Self {
        index.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    /// Converts a signed DIMACS integer into a literal.
    /// Returns `None` for zero (the clause terminator) or an out-of-range magnitude.
    pub fn from_dimacs(value: i64) -> Option<Self> {
        let id = u32::try_from(value.unsigned_abs()).ok()?;
        Some(Literal::new(Variable::new(id)?, value > 0))
    }

    pub fn to_dimacs(&self) -> i64 {
        let id = i64::from(self.id.id());
        if self.positive {
            id
        } else {
            -id
        }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl FromStr for Literal {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (positive, id) = match s.strip_prefix('-') {
            Some(rest) => (false, rest.parse()?),
            None => (true, s.parse()?),
        };

        Ok(Literal { id, positive })
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            id: self.id,
            positive: !self.positive,
        }
    }
}

/// Disjunction of literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Builds a clause from signed DIMACS integers.
    /// Returns `None` if any of them is zero.
    pub fn from_dimacs(literals: &[i64]) -> Option<Self> {
        literals.iter().map(|&l| Literal::from_dimacs(l)).collect()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A clause is unit when it has exactly one literal.
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.iter()
            .any(|literal| model.value(literal.variable()) == Some(literal.positive()))
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Clause::new(iter.into_iter().collect())
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_variables: usize) -> Self {
        assert!(num_variables <= Variable::MAX_VARIABLE_ID);

        Cnf {
            num_variables,
            clauses: Vec::new(),
        }
    }

    /// Creates a formula whose variable count is the largest variable mentioned.
    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut cnf = Cnf::new(0);
        for clause in clauses {
            cnf.add_clause(clause);
        }
        cnf
    }

    /// Builds a formula from clauses of signed DIMACS integers.
    /// Returns `None` if any literal is zero.
    pub fn from_dimacs(clauses: &[&[i64]]) -> Option<Self> {
        let clauses = clauses
            .iter()
            .map(|clause| Clause::from_dimacs(clause))
            .collect::<Option<Vec<_>>>()?;
        Some(Cnf::from_clauses(clauses))
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn clauses(&self) -> &Vec<Clause> {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Adds a clause, growing the variable count if the clause mentions a larger variable.
    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max_id) = clause.iter().map(|l| l.variable().id() as usize).max() {
            self.num_variables = self.num_variables.max(max_id);
        }
        self.clauses.push(clause);
    }

    /// Distinct variables occurring in the clauses, in ascending order.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.iter().map(|literal| literal.variable()))
            .collect()
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(model))
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables)?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Represents a satisfying assignment for a formula.
///
/// Only a prefix of the variables is stored. Every variable past it, up to
/// `num_variables`, is true, and the prefix never ends with a true value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    num_variables: usize,
    assignment: TiVec<VariableIdx, bool>,
}

impl Model {
    /// The all-true model over `num_variables` variables.
    pub fn new(num_variables: usize) -> Self {
        Model {
            num_variables,
            assignment: TiVec::new(),
        }
    }

    /// Completes a partial assignment into a total one over `num_variables` variables.
    /// Variables missing from `literals` are set to true.
    ///
    /// # Panics
    ///
    /// Panics when a literal is out of range or a variable is fixed with both signs.
    pub fn from_literals(num_variables: usize, literals: &[Literal]) -> Self {
        let stored = literals
            .iter()
            .map(|literal| literal.variable().as_index() + 1)
            .max()
            .unwrap_or(0);
        assert!(
            stored <= num_variables,
            "x{} is outside a model of {} variables",
            stored,
            num_variables
        );

        let mut partial: TiVec<VariableIdx, Option<bool>> = vec![None; stored].into();
        for literal in literals {
            let slot = &mut partial[literal.variable().index()];
            assert_ne!(
                *slot,
                Some(!literal.positive()),
                "{} is assigned with both signs",
                literal.variable()
            );
            *slot = Some(literal.positive());
        }

        let mut model = Model {
            num_variables,
            assignment: partial.iter().map(|value| value.unwrap_or(true)).collect(),
        };
        model.trim();
        model
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Returns the value of `variable`, or `None` when it is outside the model.
    pub fn value(&self, variable: Variable) -> Option<bool> {
        if variable.as_index() >= self.num_variables {
            return None;
        }
        Some(self.assignment.get(variable.index()).copied().unwrap_or(true))
    }

    /// # Panics
    ///
    /// Panics when `variable` is outside the model.
    pub fn set(&mut self, variable: Variable, value: bool) {
        let idx = variable.as_index();
        assert!(
            idx < self.num_variables,
            "{} is outside a model of {} variables",
            variable,
            self.num_variables
        );

        if idx < self.assignment.len() {
            self.assignment[variable.index()] = value;
        } else if !value {
            self.assignment.raw.resize(idx, true);
            self.assignment.raw.push(false);
        }
        self.trim();
    }

    /// Materializes the value of every variable, in order.
    pub fn assignment(&self) -> Vec<bool> {
        self.literals().map(|literal| literal.positive()).collect()
    }

    /// The model as one literal per variable.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        (0..self.num_variables).filter_map(move |idx| {
            let value = self.assignment.get(VariableIdx::from(idx)).copied().unwrap_or(true);
            Variable::from_index(idx).map(|variable| Literal::new(variable, value))
        })
    }

    fn trim(&mut self) {
        while self.assignment.raw.last() == Some(&true) {
            self.assignment.raw.pop();
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Assignment:")?;
        for literal in self.literals() {
            write!(f, "\n  {}: {}", literal.variable(), literal.positive())?;
        }

        Ok(())
    }
}
