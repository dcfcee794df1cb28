//! End-to-end tests for the validation orchestrator

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect
#![allow(clippy::panic)] // Tests can panic

use azd_mcp_testing::schemas::{self, mem_uri, stable_and_alpha_loader, validator_for};
use azd_mcp_testing::{FixtureDir, ForbiddenLoader, StaticLoader, init_test_tracing};
use azd_mcp_tools::schema::{
    CandidateList, FileLoader, LoaderRegistry, SchemaCandidate, SchemaError, SchemaLoader,
    SchemaValidator, ValidationOutcome,
};
use futures::future::BoxFuture;
use reqwest::Url;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn failed_message(outcome: ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Failed { message } => message,
        ValidationOutcome::Matched { label } => panic!("expected failure, matched {label}"),
    }
}

#[tokio::test]
async fn test_valid_document_matches_stable() {
    init_test_tracing();
    let loader = stable_and_alpha_loader();
    let validator = validator_for(loader.clone(), &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    let outcome = validator.validate(&path).await;

    assert_eq!(
        outcome,
        ValidationOutcome::Matched {
            label: "stable".to_string()
        }
    );
    assert!(outcome.render().contains("valid against the stable schema"));
    // First match wins: alpha is never fetched
    assert_eq!(loader.calls(), ["mem://stable.json"]);
}

#[tokio::test]
async fn test_candidate_order_decides_between_equal_schemas() {
    // Same schema served under both labels
    let loader = StaticLoader::new()
        .with_json(mem_uri("alpha").as_str(), &schemas::stable())
        .with_json(mem_uri("stable").as_str(), &schemas::stable());
    let validator = validator_for(loader, &["alpha", "stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "alpha".to_string()
        }
    );
}

#[tokio::test]
async fn test_alpha_only_document_matches_alpha() {
    let loader = stable_and_alpha_loader();
    let validator = validator_for(loader.clone(), &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write(
        "azure.yaml",
        "name: testapp\nworkflows:\n  up:\n    steps: []\n",
    );

    let outcome = validator.validate(&path).await;

    assert_eq!(
        outcome,
        ValidationOutcome::Matched {
            label: "alpha".to_string()
        }
    );
    assert_eq!(outcome.render(), "The azure.yaml file is valid against the alpha schema.");
    assert_eq!(loader.calls(), ["mem://stable.json", "mem://alpha.json"]);
}

#[tokio::test]
async fn test_missing_name_reports_missing_property() {
    let validator = validator_for(stable_and_alpha_loader(), &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "some_field: value\n");

    let outcome = validator.validate(&path).await;
    let rendered: serde_json::Value = serde_json::from_str(&outcome.render()).expect("json");
    let message = failed_message(outcome);

    assert!(message.contains("missing property 'name'"), "{message}");
    assert_eq!(rendered["error"], true);
    assert_eq!(rendered["message"], message.as_str());
}

#[tokio::test]
async fn test_wrong_type_reports_type_mismatch() {
    let validator = validator_for(stable_and_alpha_loader(), &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: 123\n");

    let message = failed_message(validator.validate(&path).await);

    assert!(message.contains("jsonschema validation failed"), "{message}");
    assert!(message.contains("at '/name': got number, want string"), "{message}");
    assert!(!message.contains("missing property"));
    assert!(!message.contains("unmarshal"));
}

#[tokio::test]
async fn test_nested_violation_points_at_path() {
    let validator = validator_for(stable_and_alpha_loader(), &["stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write(
        "azure.yaml",
        "name: testapp\nservices:\n  api:\n    project: ./src/api\n",
    );

    let message = failed_message(validator.validate(&path).await);
    assert!(
        message.contains("at '/services/api': missing property 'host'"),
        "{message}"
    );
}

#[tokio::test]
async fn test_nonexistent_path_never_fetches() {
    let loader = ForbiddenLoader::new();
    let validator = validator_for(loader.clone(), &["stable", "alpha"]);

    let message = failed_message(validator.validate(Path::new("no/such/azure.yaml")).await);

    assert!(message.contains("not found"), "{message}");
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_syntax_error_is_distinct_from_validation() {
    let loader = ForbiddenLoader::new();
    let validator = validator_for(loader.clone(), &["stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: [unclosed\n");

    let message = failed_message(validator.validate(&path).await);

    assert!(message.starts_with("failed to unmarshal YAML"), "{message}");
    assert!(!message.contains("jsonschema validation failed"));
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_non_string_key_is_shape_error() {
    let loader = ForbiddenLoader::new();
    let validator = validator_for(loader.clone(), &["stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "? [a, b]\n: value\n");

    let message = failed_message(validator.validate(&path).await);

    assert!(message.starts_with("failed to convert YAML to JSON"), "{message}");
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_scalar_keys_are_shape_errors() {
    for document in ["name: app\n1: one\n", "name: app\ntrue: yes\n"] {
        let loader = ForbiddenLoader::new();
        let validator = validator_for(loader.clone(), &["stable", "alpha"]);
        let fixtures = FixtureDir::new();
        let path = fixtures.write("azure.yaml", document);

        let message = failed_message(validator.validate(&path).await);

        assert!(
            message.starts_with("failed to convert YAML to JSON"),
            "{document:?}: {message}"
        );
        assert!(message.contains("is not a string"), "{message}");
        assert_eq!(loader.call_count(), 0, "{document:?}");
    }
}

#[tokio::test]
async fn test_validation_error_preferred_over_later_fetch_error() {
    // Only stable is served; alpha answers 404
    let loader = StaticLoader::new().with_json(mem_uri("stable").as_str(), &schemas::stable());
    let validator = validator_for(loader, &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "some_field: value\n");

    let message = failed_message(validator.validate(&path).await);

    assert!(message.contains("missing property 'name'"), "{message}");
    assert!(!message.contains("HTTP status"));
}

#[tokio::test]
async fn test_validation_error_preferred_over_earlier_fetch_error() {
    let loader = StaticLoader::new().with_json(mem_uri("alpha").as_str(), &schemas::alpha());
    let validator = validator_for(loader, &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "some_field: value\n");

    let message = failed_message(validator.validate(&path).await);

    assert!(message.contains("jsonschema validation failed with 'mem://alpha.json'"), "{message}");
}

#[tokio::test]
async fn test_all_fetches_fail_reports_last_fetch_error() {
    let validator = validator_for(StaticLoader::new(), &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    let message = failed_message(validator.validate(&path).await);

    assert_eq!(
        message,
        "failed to fetch schema 'mem://alpha.json': HTTP status 404"
    );
}

#[tokio::test]
async fn test_unsupported_scheme_skips_candidate() {
    let loader = stable_and_alpha_loader();
    let loaders = LoaderRegistry::builder().with_loader("mem", loader).build();
    let candidates = CandidateList::new(vec![
        SchemaCandidate::new(Url::parse("ftp://example.com/azure.yaml.json").unwrap(), "legacy"),
        SchemaCandidate::new(mem_uri("stable"), "stable"),
    ])
    .unwrap();
    let validator = SchemaValidator::new(loaders, candidates);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "stable".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_and_invalid_schemas_are_skipped() {
    let loader = StaticLoader::new()
        .with_bytes(mem_uri("broken").as_str(), "{not json")
        .with_json(mem_uri("bogus").as_str(), &json!({"type": 12}))
        .with_json(mem_uri("stable").as_str(), &schemas::stable());
    let validator = validator_for(loader, &["broken", "bogus", "stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "stable".to_string()
        }
    );
}

#[tokio::test]
async fn test_compile_error_reported_when_nothing_else_happened() {
    let loader = StaticLoader::new().with_json(mem_uri("bogus").as_str(), &json!({"type": 12}));
    let validator = validator_for(loader, &["bogus"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    let message = failed_message(validator.validate(&path).await);
    assert!(message.starts_with("failed to compile schema 'mem://bogus.json'"), "{message}");
}

#[tokio::test]
async fn test_external_refs_fetched_through_registry() {
    let root = json!({
        "type": "object",
        "required": ["name"],
        "properties": {"name": {"$ref": "mem://common.json#/definitions/name"}}
    });
    let common = json!({"definitions": {"name": {"type": "string", "pattern": "^[a-z]+$"}}});
    let loader = StaticLoader::new()
        .with_json(mem_uri("stable").as_str(), &root)
        .with_json("mem://common.json", &common);
    let validator = validator_for(loader.clone(), &["stable"]);
    let fixtures = FixtureDir::new();

    let good = fixtures.write("good.yaml", "name: testapp\n");
    assert!(validator.validate(&good).await.is_match());
    assert_eq!(loader.calls(), ["mem://stable.json", "mem://common.json"]);

    let bad = fixtures.write("bad.yaml", "name: Test-App\n");
    assert!(!validator.validate(&bad).await.is_match());
}

#[tokio::test]
async fn test_missing_external_ref_skips_candidate() {
    let root = json!({"properties": {"name": {"$ref": "mem://gone.json"}}});
    let loader = StaticLoader::new()
        .with_json(mem_uri("stable").as_str(), &root)
        .with_json(mem_uri("alpha").as_str(), &schemas::alpha());
    let validator = validator_for(loader, &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "alpha".to_string()
        }
    );
}

/// Loader whose fetch never completes
#[derive(Clone)]
struct HangingLoader;

impl SchemaLoader for HangingLoader {
    fn fetch<'a>(&'a self, _uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, SchemaError>> {
        Box::pin(futures::future::pending())
    }
}

#[tokio::test]
async fn test_cancellation_interrupts_fetch() {
    let validator = validator_for(HangingLoader, &["stable", "alpha"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        validator.validate_with_cancellation(&path, &cancel),
    )
    .await
    .expect("cancellation ends the request");

    assert_eq!(failed_message(outcome), "schema validation cancelled");
}

#[tokio::test]
async fn test_precancelled_token_fetches_nothing() {
    let loader = ForbiddenLoader::new();
    let validator = validator_for(loader.clone(), &["stable"]);
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = validator.validate_with_cancellation(&path, &cancel).await;

    assert_eq!(failed_message(outcome), "schema validation cancelled");
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_file_scheme_candidate() {
    let fixtures = FixtureDir::new();
    let schema_path = fixtures.write("azure.yaml.json", schemas::stable().to_string());
    let candidates = CandidateList::new(vec![SchemaCandidate::new(
        Url::from_file_path(&schema_path).unwrap(),
        "pinned",
    )])
    .unwrap();
    let validator = SchemaValidator::new(
        LoaderRegistry::builder()
            .with_loader("file", FileLoader)
            .build(),
        candidates,
    );
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "pinned".to_string()
        }
    );
}

#[tokio::test]
async fn test_relative_file_candidate_loads_from_working_dir() {
    let mut schema = tempfile::Builder::new()
        .prefix("azure-schema-")
        .suffix(".json")
        .tempfile_in(".")
        .unwrap();
    std::io::Write::write_all(&mut schema, schemas::stable().to_string().as_bytes()).unwrap();
    let file_name = schema.path().file_name().unwrap().to_string_lossy().into_owned();

    let candidate = SchemaCandidate::parse(&format!("file:{file_name}"), "local").unwrap();
    let validator = SchemaValidator::new(
        LoaderRegistry::builder()
            .with_loader("file", FileLoader)
            .build(),
        CandidateList::new(vec![candidate]).unwrap(),
    );
    let fixtures = FixtureDir::new();
    let path = fixtures.write("azure.yaml", "name: testapp\n");

    assert_eq!(
        validator.validate(&path).await,
        ValidationOutcome::Matched {
            label: "local".to_string()
        }
    );
}
