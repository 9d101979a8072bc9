// src/parser/help.rs

use std::fmt;

use tabled::builder::Builder;
use tabled::settings::Style;

use super::schema::OptionSchema;
use crate::utils::helpers::to_dash_case;

const HEADERS: [&str; 5] = ["argument", "type", "description", "required", "default"];

/// One line of the help listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRow {
    /// The `--dash-case` spelling a user types
    pub argument: String,
    pub option_type: String,
    pub description: String,
    pub required: bool,
    /// Rendered default value, if one is declared
    pub default: Option<String>,
}

/// Tabular help for a schema, one row per option in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTable {
    pub rows: Vec<HelpRow>,
}

impl HelpTable {
    pub fn from_schema(schema: &OptionSchema) -> Self {
        let rows = schema
            .iter()
            .map(|(name, spec)| HelpRow {
                argument: format!("--{}", to_dash_case(name)),
                option_type: spec.kind.type_name().to_string(),
                description: spec.description.clone().unwrap_or_default(),
                required: spec.required,
                default: spec.default_value.as_ref().map(ToString::to_string),
            })
            .collect();

        HelpTable { rows }
    }

    pub fn render(&self) -> String {
        let mut builder = Builder::new();
        builder.push_record(HEADERS.iter().map(|h| h.to_string()));

        for row in &self.rows {
            builder.push_record(vec![
                row.argument.clone(),
                row.option_type.clone(),
                row.description.clone(),
                row.required.to_string(),
                row.default.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }
}

impl fmt::Display for HelpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
