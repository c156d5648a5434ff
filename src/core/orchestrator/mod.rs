#![allow(clippy::result_large_err)]

use crate::core::config::{OfflineConfig, ServiceDefinition, StateMachineSpec};
use crate::core::error::AppError;
use crate::core::registry::{
    CreateStateMachineRequest, RegistryError, StateMachineRegistry, UpdateStateMachineRequest,
};
use crate::core::state_machine::schema::Definition;
use crate::core::state_machine::transform::apply_default_pipeline;
use crate::core::types::{ErrorCategory, RegistrationOutcome};
use indexmap::IndexMap;
use serde::Serialize;

const CONFLICT_MESSAGE_PREFIX: &str = "State Machine Already Exists: ";

/// Identifier of one registered state machine. Created and updated machines look the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredStateMachine {
    /// Key under `stepFunctions.stateMachines`
    pub key: String,
    /// Name sent to the registry
    pub name: String,
    pub state_machine_arn: String,
    pub outcome: RegistrationOutcome,
}

/// Everything registered during one deploy run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub registered: Vec<RegisteredStateMachine>,
}

/// Parse a raw definition and run the rewrite pipeline over it.
pub fn transform_state_machine(
    config: &OfflineConfig,
    key: &str,
    spec: &StateMachineSpec,
) -> Result<Definition, AppError> {
    let definition = Definition::from_value(spec.definition.clone()).map_err(|mut err| {
        err.add_context("state_machine", key);
        err
    })?;
    apply_default_pipeline(definition, config).map_err(|mut err| {
        err.add_context("state_machine", key);
        err
    })
}

/// Dry run: transformed definitions keyed by state machine, without registering anything.
pub fn transform_all(
    service: &ServiceDefinition,
) -> Result<IndexMap<String, Definition>, AppError> {
    service
        .state_machines
        .iter()
        .map(|(key, spec)| {
            transform_state_machine(&service.config, key, spec).map(|def| (key.clone(), def))
        })
        .collect()
}

/// Extract the ARN from `State Machine Already Exists: 'arn:...'`.
pub fn existing_arn_from_conflict(message: &str) -> Result<String, AppError> {
    let arn = message
        .replace(CONFLICT_MESSAGE_PREFIX, "")
        .replace('\'', "")
        .trim()
        .to_string();
    if !arn.starts_with("arn:") {
        return Err(AppError::new(
            ErrorCategory::RegistrationError,
            format!("could not find an ARN in conflict message '{}'", message),
        )
        .with_code("SFO-REG-002"));
    }
    Ok(arn)
}

/// Transforms and registers state machines one at a time.
pub struct DeploymentOrchestrator<R: StateMachineRegistry> {
    registry: R,
    config: OfflineConfig,
}

impl<R: StateMachineRegistry> DeploymentOrchestrator<R> {
    pub fn new(registry: R, config: OfflineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Stops at the first failure; machines registered before it stay registered.
    pub async fn deploy(
        &self,
        service: &ServiceDefinition,
    ) -> Result<DeploymentReport, AppError> {
        let mut report = DeploymentReport::default();
        for (key, spec) in &service.state_machines {
            let definition = transform_state_machine(&self.config, key, spec)?;
            let name = spec.registered_name(key);
            let (state_machine_arn, outcome) = self.register(name, &definition).await?;
            tracing::info!(
                state_machine = key.as_str(),
                arn = state_machine_arn.as_str(),
                %outcome,
                "registered state machine"
            );
            report.registered.push(RegisteredStateMachine {
                key: key.clone(),
                name: name.to_string(),
                state_machine_arn,
                outcome,
            });
        }
        Ok(report)
    }

    /// Create the machine, falling back to an update when the name is taken.
    pub async fn register(
        &self,
        name: &str,
        definition: &Definition,
    ) -> Result<(String, RegistrationOutcome), AppError> {
        let definition_json = definition.to_json_string()?;
        let role_arn = self.config.role_arn();

        let created = self
            .registry
            .create_state_machine(CreateStateMachineRequest {
                definition: definition_json.clone(),
                name: name.to_string(),
                role_arn: role_arn.clone(),
            })
            .await;

        match created {
            Ok(output) => Ok((output.state_machine_arn, RegistrationOutcome::Created)),
            Err(RegistryError::AlreadyExists { message }) => {
                tracing::warn!(
                    state_machine = name,
                    category = %ErrorCategory::RegistrationConflict,
                    "{}; updating instead",
                    message
                );

                let arn = existing_arn_from_conflict(&message)?;
                self.registry
                    .update_state_machine(UpdateStateMachineRequest {
                        state_machine_arn: arn.clone(),
                        definition: definition_json,
                        role_arn,
                    })
                    .await
                    .map_err(|err| registration_error(name, "update", err))?;
                Ok((arn, RegistrationOutcome::Updated))
            }
            Err(err) => Err(registration_error(name, "create", err)),
        }
    }
}

fn registration_error(name: &str, operation: &str, err: RegistryError) -> AppError {
    let mut error = AppError::with_source(
        ErrorCategory::RegistrationError,
        format!("failed to {} state machine '{}': {}", operation, name, err),
        Box::new(err),
    )
    .with_code("SFO-REG-001");
    error.add_context("state_machine", name);
    error
}
