// End-to-end tests for the generate-tests binary: exit statuses and where output lands.

use assert_cmd::Command;
use predicates::prelude::*;

fn generate_tests() -> Command {
    Command::cargo_bin("generate-tests").unwrap()
}

#[test]
fn test_help_exits_zero_without_required_options() {
    generate_tests()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-path"))
        .stdout(predicate::str::contains("--list-tags"))
        .stdout(predicate::str::contains("--overwrite"))
        .stdout(predicate::str::contains("Handlebars template file for test case"));
}

#[test]
fn test_missing_required_option_exits_non_zero() {
    generate_tests()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Option --base-path is required"));
}

#[test]
fn test_unknown_argument_exits_non_zero() {
    generate_tests()
        .args(["--base-path=/rest/v1", "positional"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown argument positional"));
}

#[test]
fn test_malformed_pattern_exits_non_zero() {
    generate_tests()
        .args(["--base-path=/rest/v1", "--match-path=(users"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--match-path has a malformed pattern"));
}

#[test]
fn test_valid_arguments_print_options() {
    generate_tests()
        .args(["--base-path=/rest/v1", "--methods=GET, PUT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"basePath\": \"/rest/v1\""))
        .stdout(predicate::str::contains("\"PUT\""));
}
