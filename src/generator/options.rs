use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::parser::{ElementType, OptionSchema, OptionSpec, OptionValue, ParsedOptions};

pub const DEFAULT_FILE_TEMPLATE: &str = "templates/mocha-spec.js.hbs";
pub const DEFAULT_TEST_TEMPLATE: &str = "templates/mocha-test.js.hbs";
pub const DEFAULT_ASSERT_TEMPLATE: &str = "templates/assert-schema.js.hbs";
pub const DEFAULT_FILE_NAME: &str = "{{basePath}}-{{tag.name}}.spec.js";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid option {0}")]
    InvalidOption(String),

    #[error("Could not load API docs: {0}")]
    SourceError(String),

    #[error("Template error: {0}")]
    TemplateError(String),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Options accepted by the `generate-tests` tool, in help order
pub fn generator_schema() -> OptionSchema {
    OptionSchema::new()
        .option(
            "help",
            OptionSpec::boolean()
                .default_value(false)
                .description("Generates Mocha tests cases from Swagger/OpenAPI docs"),
        )
        .option(
            "basePath",
            OptionSpec::string()
                .required()
                .description("Base path to Swagger definitions, e.g. /rest/v1"),
        )
        .option(
            "listTags",
            OptionSpec::boolean()
                .default_value(false)
                .description("Lists tag names and descriptions"),
        )
        .option(
            "tags",
            OptionSpec::array(ElementType::String).description("Tag names to generate test files for"),
        )
        .option(
            "methods",
            OptionSpec::array(ElementType::String).description("HTTP methods to include in test files"),
        )
        .option(
            "matchPath",
            OptionSpec::regex("i").description("Only paths which match will be included in test files"),
        )
        .option(
            "requiredPropertiesOnly",
            OptionSpec::boolean()
                .default_value(false)
                .description("Only include required properties in generated models"),
        )
        .option(
            "fileTemplate",
            OptionSpec::string()
                .default_value(DEFAULT_FILE_TEMPLATE)
                .description("Handlebars template file for test file"),
        )
        .option(
            "testTemplate",
            OptionSpec::string()
                .default_value(DEFAULT_TEST_TEMPLATE)
                .description("Handlebars template file for test case"),
        )
        .option(
            "assertTemplate",
            OptionSpec::string()
                .default_value(DEFAULT_ASSERT_TEMPLATE)
                .description("Handlebars template file for schema assertions"),
        )
        .option(
            "fileName",
            OptionSpec::string()
                .default_value(DEFAULT_FILE_NAME)
                .description("Filename template to save test files as"),
        )
        .option(
            "directory",
            OptionSpec::string()
                .default_value(".")
                .description("Directory to save test files in"),
        )
        .option(
            "overwrite",
            OptionSpec::boolean()
                .default_value(false)
                .description("Set to true to overwrite test files"),
        )
}

/// Typed view of a successful parse against [`generator_schema`]
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub base_path: String,
    pub list_tags: bool,
    pub tags: Option<Vec<String>>,
    pub methods: Option<Vec<String>>,
    pub match_path: Option<Regex>,
    pub required_properties_only: bool,
    pub file_template: PathBuf,
    pub test_template: PathBuf,
    pub assert_template: PathBuf,
    pub file_name: String,
    pub directory: PathBuf,
    pub overwrite: bool,
}

impl GeneratorOptions {
    pub fn from_parsed(options: &ParsedOptions) -> Result<Self> {
        Ok(GeneratorOptions {
            base_path: required_str(options, "basePath")?.to_string(),
            list_tags: flag(options, "listTags"),
            tags: string_list(options, "tags")?,
            methods: string_list(options, "methods")?,
            match_path: options.get_regex("matchPath").cloned(),
            required_properties_only: flag(options, "requiredPropertiesOnly"),
            file_template: required_str(options, "fileTemplate")?.into(),
            test_template: required_str(options, "testTemplate")?.into(),
            assert_template: required_str(options, "assertTemplate")?.into(),
            file_name: required_str(options, "fileName")?.to_string(),
            directory: required_str(options, "directory")?.into(),
            overwrite: flag(options, "overwrite"),
        })
    }
}

fn required_str<'a>(options: &'a ParsedOptions, name: &str) -> Result<&'a str> {
    options
        .get_str(name)
        .ok_or_else(|| GeneratorError::InvalidOption(format!("{} must be a string", name)))
}

fn flag(options: &ParsedOptions, name: &str) -> bool {
    options.get_bool(name).unwrap_or(false)
}

fn string_list(options: &ParsedOptions, name: &str) -> Result<Option<Vec<String>>> {
    let Some(items) = options.get_array(name) else {
        return Ok(None);
    };

    items
        .iter()
        .map(|item| match item {
            OptionValue::String(s) => Ok(s.clone()),
            other => Err(GeneratorError::InvalidOption(format!(
                "{} must contain strings, found {}",
                name, other
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Supplies the Swagger/OpenAPI document for a base path
pub trait ApiDocsSource {
    fn fetch_api_docs(&self, base_path: &str) -> Result<Value>;
}

/// Writes test files for the documented API
pub trait TestGenerator {
    fn generate_tests(&self, api_docs: &Value, options: &GeneratorOptions) -> Result<()>;
}

/// A tag declared in the API docs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiTag {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorRun {
    /// `--list-tags` was given; nothing was generated
    Tags(Vec<ApiTag>),
    Generated,
}

/// Fetch the API docs and either list their tags or hand them to the generator
pub fn run_generator(
    source: &dyn ApiDocsSource,
    generator: &dyn TestGenerator,
    options: &GeneratorOptions,
) -> Result<GeneratorRun> {
    let api_docs = source.fetch_api_docs(&options.base_path)?;

    if options.list_tags {
        return Ok(GeneratorRun::Tags(api_tags(&api_docs)));
    }

    info!(
        base_path = %options.base_path,
        directory = %options.directory.display(),
        "generating tests"
    );
    generator.generate_tests(&api_docs, options)?;
    Ok(GeneratorRun::Generated)
}

fn api_tags(api_docs: &Value) -> Vec<ApiTag> {
    api_docs
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| {
                    let name = tag.get("name").and_then(Value::as_str)?;
                    Some(ApiTag {
                        name: name.to_string(),
                        description: tag
                            .get("description")
                            .and_then(Value::as_str)
                            .map(String::from),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
