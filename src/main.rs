//! tracewrap CLI — generate a tracing decorator for one Go interface
//!
//! One invocation is one generation run: resolve the interface out of the
//! package directory, validate it, render the decorator, write the file.
//! Exit code 0 on success, 1 on any usage or pipeline failure with the
//! message on stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use tracewrap::{Error, Generator, GoPackage};

#[derive(Parser, Debug)]
#[command(
    name = "tracewrap",
    version,
    about = "Generates OpenTracing decorators for Go interfaces",
    arg_required_else_help = true
)]
struct Cli {
    /// Interface name
    #[arg(short = 'i', long = "interface")]
    interface: String,

    /// Target struct name (default: <interface name>Tracer)
    #[arg(short = 's', long = "struct")]
    struct_name: Option<String>,

    /// Output filename
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Directory of the Go package that declares the interface
    package: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let package = GoPackage::load(&cli.package)?;
    Generator::new().generate(
        &package,
        &cli.interface,
        cli.struct_name.as_deref(),
        &cli.output,
    )
}
