use clap::Parser;
use std::process::ExitCode;

use desk_backend::logger;
use desk_backend::packager::PackageArgs;

fn main() -> ExitCode {
    let args = PackageArgs::parse();

    if let Err(e) = logger::init_cli(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if args.verbose {
        tracing::debug!("Packager args: {:?}", args);
    }

    if args.packager().package(args.options()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
