// This module turns `--name=value` tokens into validated, typed options according to a declared schema.

pub mod arguments;
pub mod help;
pub mod schema;

pub use arguments::{
    parse_arguments,
    ArgumentError,
    ArgumentParser,
    ParseOutcome,
    Result,
    HELP_OPTION,
};
pub use help::{HelpRow, HelpTable};
pub use schema::{
    ElementType,
    OptionKind,
    OptionSchema,
    OptionSpec,
    OptionValue,
    ParsedOptions,
    Pattern,
    SchemaError,
};
