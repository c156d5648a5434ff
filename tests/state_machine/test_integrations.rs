use serde_json::{json, Value};
use sfn_offline::core::config::IntegrationMocks;
use sfn_offline::core::error::AppError;
use sfn_offline::core::state_machine::transform::{
    DefinitionTransform, IntegrationMockTransform, UnsupportedIntegration,
};
use sfn_offline::core::state_machine::Definition;
use sfn_offline::core::types::ErrorCategory;

const GET_MOCK: &str = "arn:aws:lambda:us-east-1:123456789012:function:s3-get-mock";

fn mocks() -> IntegrationMocks {
    IntegrationMocks {
        s3_get_object: Some(GET_MOCK.to_string()),
        ..Default::default()
    }
}

fn substitute(raw: Value, mocks: IntegrationMocks) -> Result<Value, AppError> {
    let definition = Definition::from_value(raw).expect("parse");
    let substituted = IntegrationMockTransform::new(mocks).transform(definition)?;
    Ok(substituted.to_value().expect("serialize"))
}

#[test]
fn i1_get_object_task_resource_is_replaced() {
    let substituted = substitute(
        json!({
            "StartAt": "Read",
            "States": {
                "Read": {
                    "Type": "Task",
                    "Resource": "arn:aws:states:::aws-sdk:s3:getObject",
                    "Parameters": {"Bucket": "orders", "Key.$": "$.key"},
                    "End": true
                }
            }
        }),
        mocks(),
    )
    .expect("substitute");

    let read = &substituted["States"]["Read"];
    assert_eq!(read["Resource"], GET_MOCK);
    assert_eq!(read["Parameters"], json!({"Bucket": "orders", "Key.$": "$.key"}));
}

#[test]
fn i2_nested_scopes_are_substituted() {
    let substituted = substitute(
        json!({
            "StartAt": "Each",
            "States": {
                "Each": {
                    "Type": "Map",
                    "ItemProcessor": {
                        "StartAt": "Read",
                        "States": {
                            "Read": {"Type": "Task", "Resource": "arn:aws:states:::aws-sdk:s3:getObject", "End": true}
                        }
                    },
                    "Next": "Fan"
                },
                "Fan": {
                    "Type": "Parallel",
                    "Branches": [{
                        "StartAt": "ReadAgain",
                        "States": {
                            "ReadAgain": {"Type": "Task", "Resource": "arn:aws:states:::aws-sdk:s3:getObject", "End": true}
                        }
                    }],
                    "End": true
                }
            }
        }),
        mocks(),
    )
    .expect("substitute");

    assert_eq!(
        substituted["States"]["Each"]["ItemProcessor"]["States"]["Read"]["Resource"],
        GET_MOCK
    );
    assert_eq!(
        substituted["States"]["Fan"]["Branches"][0]["States"]["ReadAgain"]["Resource"],
        GET_MOCK
    );
}

#[test]
fn i3_supported_and_non_task_resources_are_untouched() {
    let raw = json!({
        "StartAt": "Invoke",
        "States": {
            "Invoke": {"Type": "Task", "Resource": "arn:aws:states:::lambda:invoke", "Next": "Sync"},
            "Sync": {"Type": "Task", "Resource": "arn:aws:states:::aws-sdk:s3:getObject.sync", "Next": "Note"},
            "Note": {"Type": "Pass", "Resource": "arn:aws:states:::aws-sdk:s3:getObject", "End": true}
        }
    });

    let substituted = substitute(raw.clone(), IntegrationMocks::default()).expect("substitute");

    assert_eq!(substituted, raw);
}

#[test]
fn i4_missing_mock_is_config_error() {
    let err = substitute(
        json!({
            "StartAt": "Write",
            "States": {
                "Write": {"Type": "Task", "Resource": "arn:aws:states:::aws-sdk:s3:putObject", "End": true}
            }
        }),
        mocks(),
    )
    .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConfigError);
    assert_eq!(err.code, "SFO-CONFIG-004");
    assert!(err.message.contains("s3PutObject"));
}

#[test]
fn i5_every_allow_listed_integration_uses_its_own_mock() {
    let all = IntegrationMocks {
        s3_get_object: Some("mock:get".to_string()),
        s3_put_object: Some("mock:put".to_string()),
        s3_list_objects_v2: Some("mock:list".to_string()),
        s3_delete_object: Some("mock:delete".to_string()),
    };

    for integration in UnsupportedIntegration::ALL {
        let substituted = substitute(
            json!({
                "StartAt": "Call",
                "States": {"Call": {"Type": "Task", "Resource": integration.resource_arn(), "End": true}}
            }),
            all.clone(),
        )
        .expect("substitute");

        assert_eq!(
            substituted["States"]["Call"]["Resource"],
            Value::String(all.get(integration).unwrap().to_string())
        );
    }
}
