// Integration tests for the option parser, exercised through the public library API with a schema like the generator's.

#[cfg(test)]
mod tests {
    use swagger_test_options::{
        parse_arguments, parse_with_json_schema, to_dash_case, to_identifier_case, AppError,
        ArgumentError, OptionSchema, OptionValue, ParseOutcome,
    };

    const SCHEMA_JSON: &str = r#"{
        "help": {"type": "boolean", "defaultValue": false, "description": "Shows this table"},
        "basePath": {"required": true, "description": "Base path to Swagger definitions, e.g. /rest/v1"},
        "listTags": {"type": "boolean", "defaultValue": false},
        "tags": {"type": "array", "description": "Tag names to generate test files for"},
        "retries": {"type": "number", "defaultValue": 3},
        "matchPath": {"type": "regex", "regexFlags": "i"},
        "directory": {"defaultValue": "."}
    }"#;

    fn schema() -> OptionSchema {
        OptionSchema::from_json_str(SCHEMA_JSON).unwrap()
    }

    #[test]
    fn test_full_parse_with_defaults() {
        let outcome = parse_arguments(
            ["--base-path=/rest/v1", "--tags=users , roles", "--list-tags"],
            &schema(),
        )
        .unwrap();

        let options = outcome.into_options().unwrap();
        assert_eq!(options.get_str("basePath"), Some("/rest/v1"));
        assert_eq!(options.get_bool("listTags"), Some(true));
        assert_eq!(options.get("tags"), Some(&OptionValue::from(vec!["users", "roles"])));
        assert_eq!(options.get_number("retries"), Some(3));
        assert_eq!(options.get_str("directory"), Some("."));
        assert_eq!(options.get_bool("help"), Some(false));
        assert!(!options.contains_key("matchPath"));
    }

    #[test]
    fn test_every_present_key_is_declared() {
        let schema = schema();
        let options = parse_arguments(["--base-path=/a", "--match-path=users"], &schema)
            .unwrap()
            .into_options()
            .unwrap();

        for key in options.keys() {
            assert!(schema.contains(key), "undeclared key {}", key);
        }
    }

    #[test]
    fn test_help_short_circuits_required_check() {
        let outcome = parse_arguments(["--help"], &schema()).unwrap();
        let table = match outcome {
            ParseOutcome::HelpRequested(table) => table,
            other => panic!("expected help, got {:?}", other),
        };

        assert_eq!(table.rows.len(), 7);
        assert_eq!(table.rows[1].argument, "--base-path");
        assert!(table.rows[1].required);
        assert_eq!(table.rows[4].default.as_deref(), Some("3"));
        assert!(table.render().contains("--match-path"));
    }

    #[test]
    fn test_unknown_token_reported_before_missing_required() {
        let err = parse_arguments(["--tags=a", "oops"], &schema()).unwrap_err();
        assert!(matches!(err, ArgumentError::UnknownArgument(ref token) if token == "oops"));
    }

    #[test]
    fn test_unknown_option_uses_identifier_name() {
        let err = parse_arguments(["--base-path=/a", "--no-such-thing"], &schema()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown option noSuchThing");
    }

    #[test]
    fn test_json_schema_entry_point() {
        let options = parse_with_json_schema(["--base-path=/rest/v1"], SCHEMA_JSON)
            .unwrap()
            .unwrap();
        assert_eq!(options.get_str("basePath"), Some("/rest/v1"));

        let help = parse_with_json_schema(["--help=true"], SCHEMA_JSON).unwrap();
        assert!(help.is_none());

        let err = parse_with_json_schema(Vec::<String>::new(), "{not json").unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));

        let err = parse_with_json_schema(Vec::<String>::new(), SCHEMA_JSON).unwrap_err();
        assert!(matches!(
            err,
            AppError::ArgumentError(ArgumentError::MissingRequiredOption(_))
        ));
    }

    #[test]
    fn test_flag_spelling_round_trips() {
        for (name, _) in schema().iter() {
            assert_eq!(to_identifier_case(&to_dash_case(name), "-"), name);
        }
    }
}
