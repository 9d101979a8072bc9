use std::io::{self, Write};

use tracing::debug;

use crate::generator::{generator_schema, GeneratorOptions};
use crate::parser::{ArgumentParser, ParseOutcome};

/// Exit status for a successful run, including `--help`
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when the arguments are rejected
pub const EXIT_FAILURE: i32 = 1;

/// Parse `args` (without the program name) against the generator options.
///
/// Help goes to `stdout` and exits successfully; errors go to `stderr` and
/// fail. On success the validated options are written to `stdout` as JSON.
pub fn run<I, S>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> io::Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = generator_schema();
    let parser = ArgumentParser::new(&schema);

    let options = match parser.parse(args) {
        Ok(ParseOutcome::HelpRequested(table)) => {
            writeln!(stdout, "{}", table)?;
            return Ok(EXIT_SUCCESS);
        }
        Ok(ParseOutcome::Options(options)) => options,
        Err(err) => {
            writeln!(stderr, "Error: {}", err)?;
            return Ok(EXIT_FAILURE);
        }
    };

    let generator_options = match GeneratorOptions::from_parsed(&options) {
        Ok(generator_options) => generator_options,
        Err(err) => {
            writeln!(stderr, "Error: {}", err)?;
            return Ok(EXIT_FAILURE);
        }
    };
    debug!(?generator_options, "resolved generator options");

    let json = serde_json::to_string_pretty(&options).map_err(io::Error::from)?;
    writeln!(stdout, "{}", json)?;
    Ok(EXIT_SUCCESS)
}
