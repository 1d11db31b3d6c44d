use std::{env::args, path::Path};

use dpll_sat::{
    parser::{self, parse_file},
    prelude::*,
    report::Report,
    solver::{BruteForceSolver, DpllSolver, Outcome, Solver},
};
use pretty_env_logger::formatted_builder;

fn usage_string() -> String {
    format!(
        "Usage: {} <solver_name> <command>

solver_name: dpll, naive

command:
    check <file_name> - decide the DIMACS CNF formula in the given file",
        args().next().unwrap_or_else(|| "dpll-sat".to_owned())
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown solver '{}'\n\n{}", name, usage_string()))]
    UnknownSolver { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Failed to parse CNF"))]
    ParserError { source: parser::Error },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

fn solve_path<T: Solver>(path: &Path) -> Result<Outcome, Error> {
    let formula = parse_file(path).context(ParserError)?;
    let solver = T::new(formula);
    Ok(solver.solve())
}

fn dispatch_command<T: Solver>(args: Vec<String>) -> Result<(), Error> {
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            match solve_path::<T>(path.as_ref())? {
                Outcome::Satisfiable(model) => println!("SAT {}", model),
                Outcome::Unsatisfiable => println!("UNSAT"),
            }
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else if cfg!(debug_assertions) {
        builder.parse_filters("dpll_sat=debug");
    } else {
        builder.parse_filters("dpll_sat=warn");
    }

    if builder.try_init().is_err() {
        eprintln!("Failed to initialize the logger");
    }
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    // solver name
    let solver_name = args.next();
    let remaining: Vec<_> = args.collect();

    match solver_name.as_deref() {
        Some("dpll") => dispatch_command::<DpllSolver>(remaining)?,
        Some("naive") => dispatch_command::<BruteForceSolver>(remaining)?,
        Some(name) => UnknownSolver {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
