use serde_json::json;
use sfn_offline::core::config::{IntegrationMocks, OfflineConfig};
use sfn_offline::core::state_machine::transform::apply_default_pipeline;
use sfn_offline::core::state_machine::Definition;

const PREPARE_MOCK: &str = "arn:aws:lambda:us-east-1:123456789012:function:prepare";
const GET_MOCK: &str = "arn:aws:lambda:us-east-1:123456789012:function:s3-get";

fn config() -> OfflineConfig {
    OfflineConfig {
        account_id: "123456789012".to_string(),
        region: "us-east-1".to_string(),
        distributed_map_mock_resource: Some(PREPARE_MOCK.to_string()),
        integration_mocks: IntegrationMocks {
            s3_get_object: Some(GET_MOCK.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn p1_distributed_map_after_pass_state() {
    let definition = Definition::from_value(json!({
        "StartAt": "A",
        "States": {
            "A": {"Type": "Pass", "Next": "M"},
            "M": {
                "Type": "Map",
                "ItemsPath": "$.items",
                "ItemProcessor": {
                    "ProcessorConfig": {"Mode": "DISTRIBUTED", "ExecutionType": "EXPRESS"},
                    "StartAt": "Work",
                    "States": {"Work": {"Type": "Pass", "End": true}}
                },
                "End": true
            }
        }
    }))
    .unwrap();

    let transformed = apply_default_pipeline(definition, &config())
        .unwrap()
        .to_value()
        .unwrap();

    let states = &transformed["States"];
    assert_eq!(states["A"]["Next"], "PrepareM");
    assert_eq!(states["PrepareM"]["Type"], "Task");
    assert_eq!(states["PrepareM"]["Resource"], PREPARE_MOCK);
    assert_eq!(states["PrepareM"]["Next"], "M");
    assert_eq!(states["PrepareM"]["Parameters"]["Items.$"], "$.items");
    assert!(states["M"].get("ItemsPath").is_none());
    assert!(states["M"]["ItemProcessor"].get("ProcessorConfig").is_none());
}

#[test]
fn p2_both_passes_apply_inside_the_map_body() {
    let definition = Definition::from_value(json!({
        "StartAt": "A",
        "States": {
            "A": {"Type": "Pass", "Next": "M"},
            "M": {
                "Type": "Map",
                "ItemProcessor": {
                    "ProcessorConfig": {"Mode": "DISTRIBUTED"},
                    "StartAt": "Read",
                    "States": {
                        "Read": {"Type": "Task", "Resource": "arn:aws:states:::aws-sdk:s3:getObject", "End": true}
                    }
                },
                "End": true
            }
        }
    }))
    .unwrap();

    let transformed = apply_default_pipeline(definition, &config())
        .unwrap()
        .to_value()
        .unwrap();

    assert_eq!(
        transformed["States"]["M"]["ItemProcessor"]["States"]["Read"]["Resource"],
        GET_MOCK
    );
    assert_eq!(transformed["States"]["PrepareM"]["Resource"], PREPARE_MOCK);
}

#[test]
fn p3_definition_without_rewrites_round_trips() {
    let raw = json!({
        "Comment": "no rewrites",
        "StartAt": "Invoke",
        "TimeoutSeconds": 60,
        "States": {
            "Invoke": {
                "Type": "Task",
                "Resource": "arn:aws:lambda:us-east-1:123456789012:function:work",
                "Retry": [{"ErrorEquals": ["States.ALL"], "MaxAttempts": 2}],
                "Catch": [{"ErrorEquals": ["States.ALL"], "Next": "Failed"}],
                "Next": "Done"
            },
            "Failed": {"Type": "Fail", "Error": "Boom"},
            "Done": {"Type": "Succeed"}
        }
    });

    let transformed = apply_default_pipeline(Definition::from_value(raw.clone()).unwrap(), &config())
        .unwrap()
        .to_value()
        .unwrap();

    assert_eq!(transformed, raw);
}

#[test]
fn p4_failing_pass_surfaces_its_error() {
    let config = OfflineConfig {
        distributed_map_mock_resource: None,
        ..config()
    };
    let definition = Definition::from_value(json!({
        "StartAt": "A",
        "States": {
            "A": {"Type": "Pass", "Next": "M"},
            "M": {
                "Type": "Map",
                "ItemProcessor": {
                    "ProcessorConfig": {"Mode": "DISTRIBUTED"},
                    "StartAt": "Work",
                    "States": {"Work": {"Type": "Pass", "End": true}}
                },
                "End": true
            }
        }
    }))
    .unwrap();

    let err = apply_default_pipeline(definition, &config).unwrap_err();

    assert_eq!(err.code, "SFO-CONFIG-003");
}

#[test]
fn p5_non_object_states_is_a_schema_error() {
    let err = Definition::from_value(json!({"StartAt": "A", "States": []})).unwrap_err();

    assert_eq!(err.code, "SFO-SCHEMA-001");
}
