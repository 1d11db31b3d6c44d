use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, Literal, Variable, VariableParseError};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while parsing CNF file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read a line of CNF input"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Failed to parse line '{}' as clause", clause))]
    MalformedClause { clause: String },
    #[snafu(display("Invalid variable found in clause '{}'", clause))]
    MalformedVariable {
        clause: String,
        source: VariableParseError,
    },
    #[snafu(display(
        "Variable {} in clause '{}' exceeds the declared variable count {}",
        variable,
        clause,
        declared
    ))]
    VariableOutOfRange {
        clause: String,
        variable: u32,
        declared: usize,
    },
    #[snafu(display("Problem line 'p cnf <num_variables> <num_clauses>' is not found"))]
    MalformedProblemDefinition,
    #[snafu(display(
        "The number of clauses ({}) does not match the clauses number in the problem definition ({})",
        found,
        expected,
    ))]
    ClauseCountMismatch { expected: usize, found: usize },
}

/// Parse a line to a clause
fn parse_line(line: &str, num_variables: usize) -> Result<Clause, Error> {
    let splitted = line.split_whitespace().collect::<Vec<_>>();

    ensure!(
        splitted.last() == Some(&"0"),
        MalformedClause {
            clause: line.to_owned(),
        }
    );

    let mut literals = Vec::with_capacity(splitted.len() - 1);
    for s in &splitted[..splitted.len() - 1] {
        let literal = s.parse::<Literal>().with_context(|| MalformedVariable {
            clause: line.to_owned(),
        })?;

        let variable = literal.variable().id();
        ensure!(
            variable as usize <= num_variables,
            VariableOutOfRange {
                clause: line.to_owned(),
                variable,
                declared: num_variables,
            }
        );

        literals.push(literal);
    }

    Ok(Clause::new(literals))
}

/// Parses the problem line `p cnf <num_variables> <num_clauses>`
fn parse_problem_line(line: &str) -> Result<(usize, usize), Error> {
    let splitted = line.split_whitespace().collect::<Vec<_>>();

    // We only support CNF DIMACS format
    ensure!(
        splitted.len() == 4 && splitted[0] == "p" && splitted[1] == "cnf",
        MalformedProblemDefinition
    );

    match (splitted[2].parse::<usize>(), splitted[3].parse::<usize>()) {
        (Ok(num_variables), Ok(num_clauses)) if num_variables <= Variable::MAX_VARIABLE_ID => {
            Ok((num_variables, num_clauses))
        }
        _ => MalformedProblemDefinition.fail(),
    }
}

/// Parses CNF formula from a buffered reader
pub fn parse_reader(reader: impl BufRead) -> Result<Cnf, Error> {
    let mut lines = reader.lines();

    // only comments and blank lines may precede the problem definition
    let (num_variables, num_clauses) = loop {
        let line = match lines.next() {
            Some(line) => line.context(ReadError)?,
            None => return MalformedProblemDefinition.fail(),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        break parse_problem_line(trimmed)?;
    };

    let mut cnf = Cnf::new(num_variables);

    for line in lines {
        let line = line.context(ReadError)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            // empty line, comment
            continue;
        }
        if trimmed.starts_with('%') {
            // SATLIB end marker
            break;
        }
        cnf.add_clause(parse_line(trimmed, num_variables)?);
    }

    ensure!(
        cnf.clauses().len() == num_clauses,
        ClauseCountMismatch {
            found: cnf.clauses().len(),
            expected: num_clauses,
        }
    );

    let mentioned = cnf
        .variables()
        .into_iter()
        .next_back()
        .map_or(0, |variable| variable.as_index() + 1);
    if mentioned < num_variables {
        warn!(
            "header declares {} variables but the clauses only reach {}",
            num_variables, mentioned
        );
    }

    debug!(
        "parsed CNF with {} variables and {} clauses",
        cnf.num_variables(),
        cnf.clauses().len()
    );

    Ok(cnf)
}

/// Parses CNF formula from a string
pub fn parse_str(input: &str) -> Result<Cnf, Error> {
    parse_reader(input.as_bytes())
}

/// Parses CNF formula from a file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, Error> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path).context(IoError {
        path: path.to_owned(),
    })?);

    parse_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_comments() {
        let cnf = parse_str(
            "c a small formula\n\
             c\n\
             p cnf 3 2\n\
             1 -2 0\n\
             \n\
             c between clauses\n\
             2  3   -1 0\n",
        )
        .unwrap();

        assert_eq!(cnf.num_variables(), 3);
        assert_eq!(cnf, Cnf::from_dimacs(&[&[1, -2], &[2, 3, -1]]).unwrap());
    }

    #[test]
    fn declared_variables_are_kept() {
        let cnf = parse_str("p cnf 10 1\n1 0\n").unwrap();
        assert_eq!(cnf.num_variables(), 10);
        assert_eq!(cnf.variables().len(), 1);

        let cnf = parse_str("p cnf 4294967295 1\n1 0\n").unwrap();
        assert_eq!(cnf.num_variables(), 4_294_967_295);
        assert_eq!(cnf.variables().len(), 1);
    }

    #[test]
    fn empty_clause_line() {
        let cnf = parse_str("p cnf 1 2\n1 0\n0\n").unwrap();
        assert_eq!(cnf.clauses().len(), 2);
        assert!(cnf.clauses()[1].is_empty());
    }

    #[test]
    fn satlib_end_marker() {
        let cnf = parse_str("p cnf 2 1\n1 2 0\n%\n0\n\n").unwrap();
        assert_eq!(cnf.clauses().len(), 1);
    }

    #[test]
    fn missing_problem_line() {
        assert!(matches!(parse_str(""), Err(Error::MalformedProblemDefinition)));
        assert!(matches!(
            parse_str("c only comments\n"),
            Err(Error::MalformedProblemDefinition)
        ));
        assert!(matches!(
            parse_str("1 2 0\np cnf 2 1\n"),
            Err(Error::MalformedProblemDefinition)
        ));
        assert!(matches!(
            parse_str("p dnf 2 1\n1 2 0\n"),
            Err(Error::MalformedProblemDefinition)
        ));
        assert!(matches!(
            parse_str("p cnf two 1\n1 2 0\n"),
            Err(Error::MalformedProblemDefinition)
        ));
    }

    #[test]
    fn malformed_clauses() {
        assert!(matches!(
            parse_str("p cnf 2 1\n1 2\n"),
            Err(Error::MalformedClause { .. })
        ));
        assert!(matches!(
            parse_str("p cnf 2 1\n1 two 0\n"),
            Err(Error::MalformedVariable { .. })
        ));
        assert!(matches!(
            parse_str("p cnf 2 1\n1 0 2 0\n"),
            Err(Error::MalformedVariable {
                source: VariableParseError::ZeroId,
                ..
            })
        ));
        assert!(matches!(
            parse_str("p cnf 2 1\n1 3 0\n"),
            Err(Error::VariableOutOfRange {
                variable: 3,
                declared: 2,
                ..
            })
        ));
    }

    #[test]
    fn clause_count_mismatch() {
        assert!(matches!(
            parse_str("p cnf 2 3\n1 2 0\n-1 0\n"),
            Err(Error::ClauseCountMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            parse_file("testcases/does_not_exist.cnf"),
            Err(Error::IoError { .. })
        ));
    }
}
