//! Registration API of the local Step Functions engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod client;

pub use client::StepFunctionsClient;

/// Error code the registry returns when the name is already taken.
pub const STATE_MACHINE_ALREADY_EXISTS: &str = "StateMachineAlreadyExists";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStateMachineRequest {
    pub definition: String,
    pub name: String,
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateMachineRequest {
    pub state_machine_arn: String,
    pub definition: String,
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStateMachineOutput {
    pub state_machine_arn: String,
    #[serde(default)]
    pub creation_date: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateMachineOutput {
    #[serde(default)]
    pub update_date: Option<Value>,
    #[serde(default)]
    pub revision_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("State machine already exists: {message}")]
    AlreadyExists { message: String },
    #[error("Registry error {code}: {message}")]
    Service { code: String, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Deserialization error: {0}")]
    Decode(String),
}

/// Create/update surface of a state machine registry.
#[async_trait]
pub trait StateMachineRegistry: Send + Sync {
    async fn create_state_machine(
        &self,
        request: CreateStateMachineRequest,
    ) -> Result<CreateStateMachineOutput, RegistryError>;

    async fn update_state_machine(
        &self,
        request: UpdateStateMachineRequest,
    ) -> Result<UpdateStateMachineOutput, RegistryError>;
}
