// This is the entry point for the CLI application.
// It parses the generator options and turns the outcome into an exit status.

use std::env;
use std::io;
use std::process;

use swagger_test_options::cli;

fn main() {
    cli::init_tracing();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let result = cli::run(
        env::args().skip(1),
        &mut stdout.lock(),
        &mut stderr.lock(),
    );

    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error writing output: {}", err);
            process::exit(cli::args::EXIT_FAILURE);
        }
    }
}
