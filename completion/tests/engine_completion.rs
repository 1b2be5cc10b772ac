//! Completion driven end to end from catalogs and custom providers.

use std::sync::Arc;

use cmdline_completion::*;
use cmdline_core::CommandRegistry;

const CATALOG: &str = r#"
version: "1.0.0"
commands:
  - name: deploy
    description: Roll out a release
    group: Release
    options:
      - long_names: [env]
        short_names: [e]
        value_type: !Enum [dev, staging, prod]
        description: Target environment
      - long_names: [dry-run]
        short_names: [n]
        value_type: Bool
      - long_names: [token]
        value_type: String
        hidden: true
    arguments:
      - index: 0
        name: service
        value_type: !Enum [api, web, worker]
  - name: deploy status
    description: Show rollout state
  - name: internal
    hidden: true
"#;

fn engine() -> CompletionEngine {
    let registry = CommandRegistry::from_yaml(CATALOG).unwrap();
    CompletionEngine::new(Arc::new(registry))
}

fn values(proposals: Vec<CompletionProposal>) -> Vec<String> {
    proposals.into_iter().map(|p| p.value).collect()
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

#[test]
fn test_composite_keeps_provider_order() {
    let composite = CompositeCompletionProvider::new()
        .with_provider(|_: &CompletionContext| vec![CompletionProposal::new("x")])
        .with_provider(|_: &CompletionContext| Vec::new())
        .with_provider(|_: &CompletionContext| {
            vec![CompletionProposal::new("y"), CompletionProposal::new("z")]
        });
    assert_eq!(composite.len(), 3);

    let proposals = composite.complete(&CompletionContext::default());
    assert_eq!(values(proposals), vec!["x", "y", "z"]);
}

// ---------------------------------------------------------------------------
// Catalog-driven completion
// ---------------------------------------------------------------------------

#[test]
fn test_top_level_skips_hidden_commands() {
    let proposals = engine().complete("", 0);
    assert_eq!(values(proposals.clone()), vec!["deploy"]);
    assert_eq!(proposals[0].category.as_deref(), Some("Release"));
    assert_eq!(proposals[0].description.as_deref(), Some("Roll out a release"));
}

#[test]
fn test_subcommand_options_and_arguments_together() {
    let line = "deploy ";
    let proposals = values(engine().complete(line, line.len()));
    assert_eq!(
        proposals,
        vec!["status", "--env", "-e", "--dry-run", "-n", "api", "web", "worker"]
    );
}

#[test]
fn test_option_names_hide_hidden_options() {
    let line = "deploy -";
    let proposals = values(engine().complete(line, line.len()));
    assert_eq!(proposals, vec!["--env", "-e", "--dry-run", "-n"]);
}

#[test]
fn test_enum_value_with_attached_prefix() {
    let line = "deploy --env=p";
    let proposals = engine().complete(line, line.len());
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].value, "--env=prod");
    assert_eq!(proposals[0].display, "prod");
}

#[test]
fn test_enum_value_after_short_option() {
    let line = "deploy -n -e s";
    assert_eq!(values(engine().complete(line, line.len())), vec!["staging"]);
}

#[test]
fn test_context_reports_consumed_command_words() {
    let line = "deploy status ";
    let context = engine().context(line, line.len());
    assert_eq!(context.consumed(), ["deploy", "status"]);
    assert_eq!(context.command().unwrap().name, "deploy status");
    assert!(context.words().is_empty());
}

#[test]
fn test_custom_provider_appended_after_builtins() {
    let engine = engine().with_provider(|c: &CompletionContext| {
        match c.argument() {
            Some(argument) if argument.name == "service" => {
                vec![CompletionProposal::new("batch jobs").with_category("Services")]
            }
            _ => Vec::new(),
        }
    });
    let line = "deploy -n w";
    let proposals = values(engine.complete(line, line.len()));
    assert_eq!(proposals, vec!["web", "worker", r"batch\ jobs"]);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_proposals_serialize_for_hosts() {
    let line = "deploy --env=p";
    let proposals = engine().complete(line, line.len());
    let json = serde_json::to_value(&proposals).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "value": "--env=prod",
            "display": "prod",
            "complete": true,
            "dont_quote": false
        }])
    );
}

#[test]
fn test_context_serializes_slot_and_words() {
    let line = "deploy -n -e s";
    let context = engine().context(line, line.len());
    let json = serde_json::to_value(&context).unwrap();
    assert_eq!(json["words"], serde_json::json!(["-n", "-e", "s"]));
    assert_eq!(json["consumed"], serde_json::json!(["deploy"]));
    assert_eq!(json["word_index"], 2);
    assert_eq!(json["position"], 1);
    assert_eq!(json["option"], 0);
    assert!(json["argument"].is_null());
    assert_eq!(json["command"]["name"], "deploy");
}
