// src/parser/arguments.rs

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, trace};

use super::help::HelpTable;
use super::schema::{ElementType, OptionKind, OptionSchema, OptionValue, ParsedOptions, Pattern};
use crate::utils::helpers::{to_dash_case, to_identifier_case};

/// `--name` or `--name=value`
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--(.*?)(?:=(.*))?$").expect("static regex must compile"));

/// Signed decimal integer, optionally followed by a fractional part that is dropped
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)(?:\.\d*)?\s*$").expect("static regex must compile"));

/// Name of the option that short-circuits the parse into a help listing
pub const HELP_OPTION: &str = "help";

#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("Unknown argument {0}")]
    UnknownArgument(String),

    #[error("Unknown option {0}")]
    UnknownOption(String),

    #[error("Option --{0} requires a value")]
    MissingValue(String),

    #[error("Option --{flag} expects a number, got {value:?}")]
    InvalidNumber { flag: String, value: String },

    #[error("Option --{flag} has a malformed pattern: {reason}")]
    MalformedPattern { flag: String, reason: String },

    #[error("Option --{0} is required")]
    MissingRequiredOption(String),
}

pub type Result<T> = std::result::Result<T, ArgumentError>;

/// What a successful parse produced
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every token was valid and every required option is present
    Options(ParsedOptions),
    /// `--help` was given; the caller should print the table and exit successfully
    HelpRequested(HelpTable),
}

impl ParseOutcome {
    /// The parsed options, or `None` when help was requested
    pub fn into_options(self) -> Option<ParsedOptions> {
        match self {
            ParseOutcome::Options(options) => Some(options),
            ParseOutcome::HelpRequested(_) => None,
        }
    }
}

/// Parses `--name=value` tokens against an [`OptionSchema`].
///
/// The parser holds no state between calls; the schema is only read.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentParser<'a> {
    schema: &'a OptionSchema,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(schema: &'a OptionSchema) -> Self {
        ArgumentParser { schema }
    }

    pub fn schema(&self) -> &'a OptionSchema {
        self.schema
    }

    /// The help listing for this parser's schema
    pub fn help_table(&self) -> HelpTable {
        HelpTable::from_schema(self.schema)
    }

    /// Scan, coerce and validate `tokens`.
    ///
    /// Tokens are processed left to right and the first malformed one aborts
    /// the parse. Help is checked once every token is stored, before required
    /// options are enforced and defaults are filled in.
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = ParsedOptions::new();

        for token in tokens {
            let (name, value) = self.parse_token(token.as_ref())?;
            options.insert(&name, value);
        }

        if options.get(HELP_OPTION).is_some_and(OptionValue::is_truthy) {
            debug!("help requested");
            return Ok(ParseOutcome::HelpRequested(self.help_table()));
        }

        for (name, spec) in self.schema.iter() {
            if options.contains_key(name) {
                continue;
            }
            if spec.required {
                return Err(ArgumentError::MissingRequiredOption(to_dash_case(name)));
            }
            if let Some(default) = &spec.default_value {
                debug!(option = name, value = %default, "using default");
                options.insert(name, default.clone());
            }
        }

        Ok(ParseOutcome::Options(options))
    }

    fn parse_token(&self, token: &str) -> Result<(String, OptionValue)> {
        let captures = TOKEN_PATTERN
            .captures(token)
            .ok_or_else(|| ArgumentError::UnknownArgument(token.to_string()))?;

        let dash_name = captures.get(1).map_or("", |m| m.as_str());
        let value = captures.get(2).map(|m| m.as_str());
        trace!(token, dash_name, ?value, "matched token");

        let name = to_identifier_case(dash_name, "-");
        let spec = self
            .schema
            .get(&name)
            .ok_or_else(|| ArgumentError::UnknownOption(name.clone()))?;

        let coerced = coerce_value(dash_name, &spec.kind, value)?;
        debug!(option = %name, value = %coerced, "parsed option");

        Ok((name, coerced))
    }
}

/// Parse `tokens` against `schema`; shorthand for [`ArgumentParser::parse`]
pub fn parse_arguments<I, S>(tokens: I, schema: &OptionSchema) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ArgumentParser::new(schema).parse(tokens)
}

fn coerce_value(flag: &str, kind: &OptionKind, value: Option<&str>) -> Result<OptionValue> {
    match kind {
        OptionKind::Boolean => Ok(OptionValue::Boolean(value.map_or(true, parse_boolean))),
        OptionKind::String => Ok(OptionValue::String(value.unwrap_or_default().to_string())),
        OptionKind::Number => {
            let value = require_value(flag, value)?;
            parse_number(flag, value).map(OptionValue::Number)
        }
        OptionKind::Regex { flags } => {
            let value = require_value(flag, value)?;
            compile_pattern(flag, value, flags).map(OptionValue::Regex)
        }
        OptionKind::Array { element } => {
            let value = require_value(flag, value)?;
            value
                .split(',')
                .map(str::trim)
                .map(|item| coerce_element(flag, *element, item))
                .collect::<Result<Vec<_>>>()
                .map(OptionValue::Array)
        }
    }
}

fn coerce_element(flag: &str, element: ElementType, item: &str) -> Result<OptionValue> {
    match element {
        ElementType::String => Ok(OptionValue::String(item.to_string())),
        ElementType::Boolean => Ok(OptionValue::Boolean(parse_boolean(item))),
        ElementType::Number => parse_number(flag, item).map(OptionValue::Number),
    }
}

fn require_value<'v>(flag: &str, value: Option<&'v str>) -> Result<&'v str> {
    value.ok_or_else(|| ArgumentError::MissingValue(flag.to_string()))
}

// Anything other than "true" (any case) is false.
fn parse_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

// Base-10 integer; a fractional part is truncated toward zero.
fn parse_number(flag: &str, value: &str) -> Result<i64> {
    NUMBER_PATTERN
        .captures(value)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .ok_or_else(|| ArgumentError::InvalidNumber {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}

fn compile_pattern(flag: &str, pattern: &str, flags: &str) -> Result<Pattern> {
    let malformed = |reason: String| ArgumentError::MalformedPattern {
        flag: flag.to_string(),
        reason,
    };

    let mut builder = RegexBuilder::new(pattern);
    for c in flags.chars() {
        match c {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'u' => builder.unicode(true),
            // global and sticky only affect iteration state
            'g' | 'y' => &mut builder,
            other => return Err(malformed(format!("unsupported flag '{}'", other))),
        };
    }

    builder
        .build()
        .map(|regex| Pattern::new(regex, flags))
        .map_err(|e| malformed(e.to_string()))
}
