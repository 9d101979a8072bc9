// src/parser/schema.rs

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported option type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported default value: {0}")]
    UnsupportedDefault(String),

    #[error("Option names must not be empty")]
    EmptyName,
}

/// Coercion applied to each element of an `array` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementType {
    #[default]
    String,
    Boolean,
    Number,
}

impl ElementType {
    fn from_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "string" => Ok(ElementType::String),
            "boolean" => Ok(ElementType::Boolean),
            "number" => Ok(ElementType::Number),
            other => Err(SchemaError::UnsupportedType(format!("array of {}", other))),
        }
    }
}

/// The declared type of an option, carrying the per-type settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionKind {
    #[default]
    String,
    Boolean,
    Number,
    /// Compiled with the given flags (e.g. `"i"`)
    Regex { flags: String },
    /// Comma separated, each element coerced as `element`
    Array { element: ElementType },
}

impl OptionKind {
    /// The type name shown in the help table
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionKind::String => "string",
            OptionKind::Boolean => "boolean",
            OptionKind::Number => "number",
            OptionKind::Regex { .. } => "regex",
            OptionKind::Array { .. } => "array",
        }
    }
}

/// A compiled pattern together with the flags it was declared with
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    flags: String,
}

impl Pattern {
    pub fn new(regex: Regex, flags: &str) -> Self {
        Pattern {
            regex,
            flags: flags.to_string(),
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
}

// Regex has no equality of its own; two patterns are equal when source and flags are.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.flags == other.flags
    }
}

/// Written as `/source/flags`
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.regex.as_str(), self.flags)
    }
}

/// A typed option value, either supplied on the command line or declared as a default
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Boolean(bool),
    Number(i64),
    Regex(Pattern),
    Array(Vec<OptionValue>),
}

impl OptionValue {
    /// Truthiness used to decide whether `--help` was requested.
    ///
    /// Empty strings, `false` and `0` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::String(s) => !s.is_empty(),
            OptionValue::Boolean(b) => *b,
            OptionValue::Number(n) => *n != 0,
            OptionValue::Regex(_) | OptionValue::Array(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            OptionValue::Regex(pattern) => Some(pattern.regex()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => write!(f, "{}", s),
            OptionValue::Boolean(b) => write!(f, "{}", b),
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Regex(pattern) => write!(f, "{}", pattern),
            OptionValue::Array(items) => {
                let joined = items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{}", joined)
            }
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::String(s) => serializer.serialize_str(s),
            OptionValue::Boolean(b) => serializer.serialize_bool(*b),
            OptionValue::Number(n) => serializer.serialize_i64(*n),
            OptionValue::Regex(pattern) => serializer.collect_str(pattern),
            OptionValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<Pattern> for OptionValue {
    fn from(value: Pattern) -> Self {
        OptionValue::Regex(value)
    }
}

impl From<Regex> for OptionValue {
    fn from(value: Regex) -> Self {
        OptionValue::Regex(Pattern::new(value, ""))
    }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        OptionValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for OptionValue {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(OptionValue::String(s)),
            Value::Bool(b) => Ok(OptionValue::Boolean(b)),
            Value::Number(n) => n
                .as_i64()
                .map(OptionValue::Number)
                .ok_or_else(|| SchemaError::UnsupportedDefault(format!("non-integer number {}", n))),
            Value::Array(items) => items
                .into_iter()
                .map(OptionValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(OptionValue::Array),
            other => Err(SchemaError::UnsupportedDefault(other.to_string())),
        }
    }
}

/// Declaration of a single recognised option
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawOptionSpec")]
pub struct OptionSpec {
    pub kind: OptionKind,
    pub required: bool,
    pub default_value: Option<OptionValue>,
    pub description: Option<String>,
}

impl OptionSpec {
    pub fn string() -> Self {
        Self::of_kind(OptionKind::String)
    }

    pub fn boolean() -> Self {
        Self::of_kind(OptionKind::Boolean)
    }

    pub fn number() -> Self {
        Self::of_kind(OptionKind::Number)
    }

    pub fn regex(flags: &str) -> Self {
        Self::of_kind(OptionKind::Regex {
            flags: flags.to_string(),
        })
    }

    pub fn array(element: ElementType) -> Self {
        Self::of_kind(OptionKind::Array { element })
    }

    pub fn of_kind(kind: OptionKind) -> Self {
        OptionSpec {
            kind,
            ..Default::default()
        }
    }

    /// Marks the option as required; a missing value aborts the parse
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value<V: Into<OptionValue>>(mut self, value: V) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// The JSON shape an option is declared in, e.g.
/// `{"type": "array", "arrayType": "number", "description": "..."}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptionSpec {
    #[serde(rename = "type")]
    option_type: Option<String>,
    array_type: Option<String>,
    regex_flags: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "present_value")]
    default_value: Option<Value>,
    description: Option<String>,
}

// An explicit `null` stays `Some(Value::Null)` so it is rejected instead of
// silently meaning "no default".
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawOptionSpec> for OptionSpec {
    type Error = SchemaError;

    fn try_from(raw: RawOptionSpec) -> Result<Self, Self::Error> {
        let kind = match raw.option_type.as_deref().unwrap_or("string") {
            "string" => OptionKind::String,
            "boolean" => OptionKind::Boolean,
            "number" => OptionKind::Number,
            "regex" => OptionKind::Regex {
                flags: raw.regex_flags.unwrap_or_default(),
            },
            "array" => OptionKind::Array {
                element: match raw.array_type.as_deref() {
                    Some(name) => ElementType::from_name(name)?,
                    None => ElementType::String,
                },
            },
            other => return Err(SchemaError::UnsupportedType(other.to_string())),
        };

        Ok(OptionSpec {
            kind,
            required: raw.required,
            default_value: raw.default_value.map(OptionValue::try_from).transpose()?,
            description: raw.description,
        })
    }
}

/// Ordered mapping from identifier-case option name to its declaration.
///
/// Declaration order is the row order of the help table.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, OptionSpec>")]
pub struct OptionSchema {
    entries: IndexMap<String, OptionSpec>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OptionSchema::insert`]
    pub fn option(mut self, name: &str, spec: OptionSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Declares an option. Redeclaring a name replaces it in place.
    pub fn insert(&mut self, name: &str, spec: OptionSpec) {
        self.entries.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a schema from its JSON declaration, keeping key order
    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(content)?)
    }
}

impl TryFrom<IndexMap<String, OptionSpec>> for OptionSchema {
    type Error = SchemaError;

    fn try_from(entries: IndexMap<String, OptionSpec>) -> Result<Self, Self::Error> {
        if entries.keys().any(String::is_empty) {
            return Err(SchemaError::EmptyName);
        }
        Ok(OptionSchema { entries })
    }
}

/// The validated result of a parse: option name to coerced value.
///
/// Keys keep the order they were stored in: supplied options first, then
/// injected defaults in schema order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: IndexMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, overwriting any earlier value for the same name
    pub fn insert(&mut self, name: &str, value: OptionValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_bool)
    }

    pub fn get_number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(OptionValue::as_number)
    }

    pub fn get_regex(&self, name: &str) -> Option<&Regex> {
        self.get(name).and_then(OptionValue::as_regex)
    }

    pub fn get_array(&self, name: &str) -> Option<&[OptionValue]> {
        self.get(name).and_then(OptionValue::as_array)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_json_keeps_declaration_order() {
        let schema = OptionSchema::from_json_str(
            r#"{
                "help": {"type": "boolean", "defaultValue": false},
                "basePath": {"required": true, "description": "Base path"},
                "tags": {"type": "array", "arrayType": "number"},
                "matchPath": {"type": "regex", "regexFlags": "i"}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["help", "basePath", "tags", "matchPath"]);

        let base_path = schema.get("basePath").unwrap();
        assert_eq!(base_path.kind, OptionKind::String);
        assert!(base_path.required);
        assert_eq!(base_path.description.as_deref(), Some("Base path"));

        assert_eq!(
            schema.get("help").unwrap().default_value,
            Some(OptionValue::Boolean(false))
        );
        assert_eq!(
            schema.get("tags").unwrap().kind,
            OptionKind::Array { element: ElementType::Number }
        );
        assert_eq!(
            schema.get("matchPath").unwrap().kind,
            OptionKind::Regex { flags: "i".to_string() }
        );
    }

    #[test]
    fn test_schema_from_json_rejects_unknown_type() {
        let result = OptionSchema::from_json_str(r#"{"when": {"type": "date"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_from_json_rejects_object_default() {
        let result = OptionSchema::from_json_str(r#"{"when": {"defaultValue": {"a": 1}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_redeclared_option_replaces_in_place() {
        let schema = OptionSchema::new()
            .option("first", OptionSpec::string())
            .option("second", OptionSpec::number())
            .option("first", OptionSpec::boolean());

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(schema.get("first").unwrap().kind, OptionKind::Boolean);
    }

    #[test]
    fn test_truthiness() {
        assert!(OptionValue::Boolean(true).is_truthy());
        assert!(!OptionValue::Boolean(false).is_truthy());
        assert!(!OptionValue::from("").is_truthy());
        assert!(OptionValue::from("yes").is_truthy());
        assert!(!OptionValue::Number(0).is_truthy());
        assert!(OptionValue::Array(Vec::new()).is_truthy());
    }

    #[test]
    fn test_parsed_options_serialize_as_object() {
        let mut options = ParsedOptions::new();
        options.insert("basePath", "/rest/v1".into());
        options.insert("tags", vec!["users", "roles"].into());
        options.insert("overwrite", true.into());
        options.insert(
            "matchPath",
            Pattern::new(Regex::new("^/users").unwrap(), "i").into(),
        );

        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(
            json,
            r#"{"basePath":"/rest/v1","tags":["users","roles"],"overwrite":true,"matchPath":"/^/users/i"}"#
        );
    }

    #[test]
    fn test_pattern_displays_with_flags() {
        let pattern = Pattern::new(Regex::new("^ab").unwrap(), "i");
        assert_eq!(pattern.to_string(), "/^ab/i");
        assert_eq!(OptionValue::from(pattern.clone()).to_string(), "/^ab/i");
        assert_ne!(pattern, Pattern::new(Regex::new("^ab").unwrap(), ""));
    }

    #[test]
    fn test_parsed_options_overwrite_keeps_position() {
        let mut options = ParsedOptions::new();
        options.insert("first", "a".into());
        options.insert("second", "b".into());
        options.insert("first", "c".into());

        let keys: Vec<&str> = options.keys().collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(options.get_str("first"), Some("c"));
    }

    #[test]
    fn test_schema_from_json_rejects_null_default() {
        let result = OptionSchema::from_json_str(r#"{"name": {"defaultValue": null}}"#);
        assert!(matches!(result, Err(SchemaError::JsonError(_))));
    }

    #[test]
    fn test_schema_from_json_rejects_empty_name() {
        let result = OptionSchema::from_json_str(r#"{"": {"type": "boolean"}}"#);
        assert!(result.is_err());
    }
}
