use clap::Parser;
use pullbacktrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
