//! Thin entry point for the `pictdb-server` HTTP front end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// pictDB webserver front end.
#[derive(Parser, Debug)]
#[command(name = "pictdb-server", version, about, long_about = None)]
struct Args {
    /// Path to the pictDB file to serve
    db_file: PathBuf,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let addr = format!("127.0.0.1:{}", args.port);
    match pictdb::http::run(&args.db_file, addr.as_str()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
