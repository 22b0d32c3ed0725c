//! CLI entry point: verify one election record and print the audit trail.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use scrutiny::params::Baseline;
use scrutiny::schema::ElectionRecord;
use scrutiny::verify::{verify_election, CliRecorder};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let name = args.first().map(String::as_str).unwrap_or("scrutiny");
        eprintln!("usage: {name} <path-to-record.json>");
        return ExitCode::FAILURE;
    }

    let record = match ElectionRecord::from_path(Path::new(&args[1])) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let baseline = Baseline::standard();
    let mut recorder = CliRecorder::new();
    if verify_election(&record, &baseline, &mut recorder) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
