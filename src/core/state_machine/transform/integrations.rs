use crate::core::config::IntegrationMocks;
use crate::core::error::AppError;
use crate::core::state_machine::schema::{Definition, StateKind};
use crate::core::state_machine::transform::DefinitionTransform;
use crate::core::types::ErrorCategory;
use serde_json::Value;
use std::fmt;

/// Direct service integrations the local engine cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedIntegration {
    S3GetObject,
    S3PutObject,
    S3ListObjectsV2,
    S3DeleteObject,
}

impl UnsupportedIntegration {
    pub const ALL: [UnsupportedIntegration; 4] = [
        UnsupportedIntegration::S3GetObject,
        UnsupportedIntegration::S3PutObject,
        UnsupportedIntegration::S3ListObjectsV2,
        UnsupportedIntegration::S3DeleteObject,
    ];

    pub fn resource_arn(self) -> &'static str {
        match self {
            UnsupportedIntegration::S3GetObject => "arn:aws:states:::aws-sdk:s3:getObject",
            UnsupportedIntegration::S3PutObject => "arn:aws:states:::aws-sdk:s3:putObject",
            UnsupportedIntegration::S3ListObjectsV2 => "arn:aws:states:::aws-sdk:s3:listObjectsV2",
            UnsupportedIntegration::S3DeleteObject => "arn:aws:states:::aws-sdk:s3:deleteObject",
        }
    }

    /// Key under `integrationMocks` in the service file.
    pub fn config_key(self) -> &'static str {
        match self {
            UnsupportedIntegration::S3GetObject => "s3GetObject",
            UnsupportedIntegration::S3PutObject => "s3PutObject",
            UnsupportedIntegration::S3ListObjectsV2 => "s3ListObjectsV2",
            UnsupportedIntegration::S3DeleteObject => "s3DeleteObject",
        }
    }

    pub fn from_resource(resource: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|integration| integration.resource_arn() == resource)
    }
}

impl fmt::Display for UnsupportedIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_arn())
    }
}

/// Swaps unsupported integration resources on Task states for configured mocks.
pub struct IntegrationMockTransform {
    mocks: IntegrationMocks,
}

impl IntegrationMockTransform {
    pub fn new(mocks: IntegrationMocks) -> Self {
        Self { mocks }
    }

    fn substitute_scope(&self, scope: &mut Definition) -> Result<(), AppError> {
        for (key, state) in scope.states.iter_mut() {
            if state.kind == StateKind::Task {
                if let Some(integration) = state
                    .resource_str()
                    .and_then(UnsupportedIntegration::from_resource)
                {
                    let mock = self.mocks.get(integration).ok_or_else(|| {
                        AppError::new(
                            ErrorCategory::ConfigError,
                            format!(
                                "state '{}' uses {} but integrationMocks.{} is not configured",
                                key,
                                integration,
                                integration.config_key()
                            ),
                        )
                        .with_code("SFO-CONFIG-004")
                    })?;
                    tracing::info!(
                        state = key.as_str(),
                        integration = integration.config_key(),
                        mock,
                        "substituted unsupported integration"
                    );
                    state.resource = Some(Value::String(mock.to_string()));
                }
            }
            for nested in state.nested_scopes_mut() {
                self.substitute_scope(nested)?;
            }
        }
        Ok(())
    }
}

impl DefinitionTransform for IntegrationMockTransform {
    fn name(&self) -> &'static str {
        "IntegrationMockTransform"
    }

    fn transform(&self, definition: Definition) -> Result<Definition, AppError> {
        let mut definition = definition;
        self.substitute_scope(&mut definition)?;
        Ok(definition)
    }
}
