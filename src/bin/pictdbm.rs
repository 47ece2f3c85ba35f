//! Thin entry point for the `pictdbm` command line manager.

use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match pictdb::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            exit_code_for(&report)
        }
    }
}

/// Recovers the concrete `PictDbError` a `miette::Report` was built from, if
/// any, and maps it to the stable exit code fixed by
/// `PictDbError::exit_code`. Anything that isn't a `PictDbError` (argument
/// parsing failures from clap, for instance) exits 1.
fn exit_code_for(report: &miette::Report) -> ExitCode {
    match report.downcast_ref::<pictdb::PictDbError>() {
        Some(err) => ExitCode::from(err.exit_code()),
        None => ExitCode::FAILURE,
    }
}
