use crate::core::state_machine::transform::UnsupportedIntegration;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod loader;
pub mod validation;

pub use loader::{ConfigLoader, LoadOverrides, ServiceFormat};
pub use validation::ConfigValidator;

/// State key → replacement resource identifier.
pub type TaskResourceMapping = IndexMap<String, String>;

pub const DEFAULT_STEP_FUNCTIONS_ENDPOINT: &str = "http://localhost:8083";

/// Settings read from `custom.step-functions-offline` in the service file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfflineConfig {
    /// Account used to build the placeholder role ARN (required)
    #[serde(default, deserialize_with = "string_or_number")]
    pub account_id: String,

    /// Region of the local registry (required)
    #[serde(default)]
    pub region: String,

    /// Local Step Functions endpoint
    #[serde(default = "default_step_functions_endpoint")]
    pub step_functions_endpoint: String,

    /// Resource of the synthesized Prepare tasks; needed once any distributed Map exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed_map_mock_resource: Option<String>,

    /// Replacement resources for unsupported direct integrations
    #[serde(default)]
    pub integration_mocks: IntegrationMocks,

    #[serde(rename = "TaskResourceMapping", default)]
    pub task_resource_mapping: TaskResourceMapping,
}

/// One optional mock per [`UnsupportedIntegration`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationMocks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_get_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_put_object: Option<String>,
    #[serde(
        rename = "s3ListObjectsV2",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub s3_list_objects_v2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_delete_object: Option<String>,
}

impl IntegrationMocks {
    pub fn get(&self, integration: UnsupportedIntegration) -> Option<&str> {
        match integration {
            UnsupportedIntegration::S3GetObject => self.s3_get_object.as_deref(),
            UnsupportedIntegration::S3PutObject => self.s3_put_object.as_deref(),
            UnsupportedIntegration::S3ListObjectsV2 => self.s3_list_objects_v2.as_deref(),
            UnsupportedIntegration::S3DeleteObject => self.s3_delete_object.as_deref(),
        }
    }
}

/// One entry of `stepFunctions.stateMachines`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateMachineSpec {
    /// Registered name; the map key is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw definition; task resource mapping is applied at load time
    pub definition: Value,
}

impl StateMachineSpec {
    pub fn registered_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }
}

/// A loaded service file: validated settings plus state machines in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub config: OfflineConfig,
    pub state_machines: IndexMap<String, StateMachineSpec>,
}

/// Account ids are often written unquoted in YAML.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

fn default_step_functions_endpoint() -> String {
    DEFAULT_STEP_FUNCTIONS_ENDPOINT.to_string()
}

impl Default for OfflineConfig {
    fn default() -> Self {
        OfflineConfig {
            account_id: String::new(),
            region: String::new(),
            step_functions_endpoint: default_step_functions_endpoint(),
            distributed_map_mock_resource: None,
            integration_mocks: IntegrationMocks::default(),
            task_resource_mapping: TaskResourceMapping::new(),
        }
    }
}

impl OfflineConfig {
    /// Placeholder execution role; the local engine never assumes it.
    pub fn role_arn(&self) -> String {
        format!("arn:aws:iam::{}:role/DummyRole", self.account_id)
    }
}
