use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::Error;
use clap::{App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use cdcl_core::Solver;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("CDCL_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("cdcl")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("[INPUT] 'The DIMACS CNF file to use (stdin if omitted)'")
        .arg_from_usage("[proof-file] --proof=[FILE] 'Write a resolution proof to the specified file on UNSAT'")
        .arg(
            Arg::from_usage("[quiet] -q --quiet 'Only print the result line'")
        )
        .get_matches();

    init_logging();

    let mut solver = Solver::new();

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file: &mut dyn io::Read = match matches.value_of("INPUT") {
        Some(path) => {
            info!("reading '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file
        }
        None => {
            info!("reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin
        }
    };

    solver.add_dimacs_cnf(file)?;

    match solver.solve() {
        cdcl_core::SolveResult::Sat => {
            println!("SAT");
            if !matches.is_present("quiet") {
                for (index, value) in solver.model().unwrap().into_iter().enumerate() {
                    let var = cdcl_formula::Var::from_index(index).to_dimacs();
                    println!("{}={}", var, value);
                }
            }
            Ok(10)
        }
        cdcl_core::SolveResult::Unsat => {
            println!("UNSAT");
            if let Some(path) = matches.value_of("proof-file") {
                info!("writing proof to '{}'", path);
                solver.write_proof(&mut fs::File::create(path)?)?;
            }
            Ok(20)
        }
        cdcl_core::SolveResult::Unknown => {
            println!("UNKNOWN");
            Ok(0)
        }
    }
}
