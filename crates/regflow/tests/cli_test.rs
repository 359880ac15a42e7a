use predicates::prelude::*;
mod common;
use common::{TestProject, regflow};

const VALID: &str = r#"{
    "subscriptions": [
        {
            "subscriptionId": "11111111-2222-3333-4444-555555555555",
            "subscriptionName": "production",
            "providers": { "Microsoft.Storage": true }
        }
    ]
}"#;

/// --help lists every option
#[test]
fn test_cli_help() {
    regflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--apply-changes"))
        .stdout(predicate::str::contains("--tenant-id"))
        .stdout(predicate::str::contains("--client-id"))
        .stdout(predicate::str::contains("--client-secret"))
        .stdout(predicate::str::contains("--use-cli-creds"));
}

#[test]
fn test_cli_version() {
    regflow()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("regflow"));
}

/// -f is required
#[test]
fn test_missing_file_argument() {
    regflow()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_nonexistent_file() {
    let project = TestProject::new();
    regflow()
        .arg("-f")
        .arg(project.root.path().join("missing.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.json"));
}

/// Malformed JSON fails before authentication: no credentials are configured,
/// yet the reported error is the parse error.
#[test]
fn test_malformed_json_fails_before_authentication() {
    let project = TestProject::new();
    let path = project.write_desired_state("{ \"subscriptions\": [ ");

    regflow()
        .arg("--file")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("an error occurred parsing the json file"))
        .stderr(predicate::str::contains("authenticating").not());
}

#[test]
fn test_empty_subscriptions() {
    let project = TestProject::new();
    let path = project.write_desired_state(r#"{"subscriptions": []}"#);

    regflow()
        .arg("-f")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "at least one subscription must exist in the json file",
        ));
}

#[test]
fn test_subscription_without_providers() {
    let project = TestProject::new();
    let path = project.write_desired_state(r#"{"subscriptions": [{"subscriptionId": "abc"}]}"#);

    regflow()
        .arg("-f")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("providers property"));
}

/// A missing service principal field is fatal and names the variable to set
#[test]
fn test_missing_service_principal_settings() {
    let project = TestProject::new();
    let path = project.write_desired_state(VALID);

    regflow()
        .arg("-f")
        .arg(&path)
        .arg("--client-id")
        .arg("app")
        .arg("--client-secret")
        .arg("secret")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "The following error occurred authenticating with Azure",
        ))
        .stderr(predicate::str::contains("AZURE_TENANT_ID"));
}

/// Options left out on the command line are read from the environment
#[test]
fn test_service_principal_from_environment() {
    let project = TestProject::new();
    let path = project.write_desired_state(VALID);

    regflow()
        .arg("-f")
        .arg(&path)
        .env("AZURE_TENANT_ID", "tenant")
        .env("AZURE_CLIENT_ID", "app")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AZURE_CLIENT_SECRET"))
        .stderr(predicate::str::contains("AZURE_TENANT_ID").not());
}
