pub mod cli;
pub mod generator;
pub mod parser;
pub mod utils;

// Re-export frequently used items for easier access
pub use generator::{generator_schema, GeneratorOptions};
pub use parser::{
    parse_arguments,
    ArgumentError,
    ArgumentParser,
    OptionSchema,
    OptionSpec,
    OptionValue,
    ParseOutcome,
    ParsedOptions,
};
pub use utils::{to_dash_case, to_identifier_case};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Argument error: {0}")]
    ArgumentError(#[from] parser::ArgumentError),

    #[error("Schema error: {0}")]
    SchemaError(#[from] parser::SchemaError),

    #[error("Generator error: {0}")]
    GeneratorError(#[from] generator::GeneratorError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Parse `tokens` against a schema declared as JSON.
///
/// Returns `None` when `--help` was requested instead of options.
pub fn parse_with_json_schema<I, S>(tokens: I, schema_json: &str) -> Result<Option<ParsedOptions>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = OptionSchema::from_json_str(schema_json)?;
    let outcome = parse_arguments(tokens, &schema)?;
    Ok(outcome.into_options())
}
