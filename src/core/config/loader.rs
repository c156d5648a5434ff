#![allow(clippy::result_large_err)]

use super::{OfflineConfig, ServiceDefinition, StateMachineSpec, TaskResourceMapping};
use crate::core::config::validation::ConfigValidator;
use crate::core::error::AppError;
use crate::core::state_machine::transform::apply_task_resource_mapping;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::value::{Mapping, TaggedValue};
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};

/// Syntax of a service file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFormat {
    Yaml,
    Json,
}

impl ServiceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ServiceFormat::Json,
            _ => ServiceFormat::Yaml,
        }
    }
}

/// Command-line values that win over the service file and the environment.
#[derive(Debug, Clone, Default)]
pub struct LoadOverrides {
    pub mapping_file: Option<PathBuf>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceFile {
    #[serde(default)]
    custom: Option<CustomSection>,
    #[serde(rename = "stepFunctions", default)]
    step_functions: Option<StepFunctionsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomSection {
    #[serde(rename = "step-functions-offline", default)]
    offline: Option<OfflineConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct StepFunctionsSection {
    #[serde(rename = "stateMachines", default)]
    state_machines: IndexMap<String, StateMachineSpec>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a service file, apply overrides, validate, then map task resources.
    pub fn load_service(
        path: &Path,
        overrides: &LoadOverrides,
    ) -> Result<ServiceDefinition, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to read service file {}: {}", path.display(), e),
            )
            .with_code("SFO-CONFIG-005")
        })?;
        let mut service = Self::parse_service(&content, ServiceFormat::from_path(path))
            .map_err(|err| err.with_context(path.display().to_string()))?;

        if let Some(mapping_file) = &overrides.mapping_file {
            let extra = Self::load_mapping_file(mapping_file)?;
            service.config.task_resource_mapping.extend(extra);
        }
        Self::apply_env_overrides(&mut service.config);
        if let Some(endpoint) = &overrides.endpoint {
            service.config.step_functions_endpoint = endpoint.clone();
        }

        Self::finish(service)
    }

    /// Parse service file content without touching the filesystem or environment.
    pub fn parse_service(
        content: &str,
        format: ServiceFormat,
    ) -> Result<ServiceDefinition, AppError> {
        let parsed: ServiceFile = match format {
            ServiceFormat::Json => {
                serde_json::from_str::<ServiceFile>(content).map_err(|e| e.to_string())
            }
            ServiceFormat::Yaml => serde_yaml::from_str::<YamlValue>(content)
                .map(expand_intrinsic_tags)
                .and_then(serde_yaml::from_value::<ServiceFile>)
                .map_err(|e| e.to_string()),
        }
        .map_err(|message| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse service file: {}", message),
            )
            .with_code("SFO-CONFIG-005")
        })?;

        let config = parsed
            .custom
            .and_then(|custom| custom.offline)
            .unwrap_or_default();
        let state_machines = parsed
            .step_functions
            .map(|section| section.state_machines)
            .unwrap_or_default();
        if state_machines.is_empty() {
            tracing::warn!("service file declares no stepFunctions.stateMachines");
        }

        Ok(ServiceDefinition {
            config,
            state_machines,
        })
    }

    /// Validate and run the load-time resource mapping over every raw definition.
    pub fn finish(mut service: ServiceDefinition) -> Result<ServiceDefinition, AppError> {
        ConfigValidator::validate(&service.config)?;

        let mapping = &service.config.task_resource_mapping;
        for (key, spec) in service.state_machines.iter_mut() {
            apply_task_resource_mapping(&mut spec.definition, mapping);
            tracing::debug!(state_machine = key.as_str(), "applied task resource mapping");
        }
        Ok(service)
    }

    /// Load a flat JSON object of state key to resource identifier.
    pub fn load_mapping_file(path: &Path) -> Result<TaskResourceMapping, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to read mapping file {}: {}", path.display(), e),
            )
            .with_code("SFO-CONFIG-006")
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "Mapping file {} must be a flat object of strings: {}",
                    path.display(),
                    e
                ),
            )
            .with_code("SFO-CONFIG-006")
        })
    }

    /// Environment variables take precedence over service file values
    fn apply_env_overrides(config: &mut OfflineConfig) {
        if let Ok(account_id) = env::var("SFN_OFFLINE_ACCOUNT_ID") {
            config.account_id = account_id;
        }

        if let Ok(region) = env::var("SFN_OFFLINE_REGION") {
            config.region = region;
        }

        if let Ok(endpoint) = env::var("SFN_OFFLINE_ENDPOINT") {
            config.step_functions_endpoint = endpoint;
        }

        if let Ok(mock) = env::var("SFN_OFFLINE_DISTRIBUTED_MAP_MOCK") {
            config.distributed_map_mock_resource = Some(mock);
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "SFN_OFFLINE_ACCOUNT_ID - Override accountId",
            "SFN_OFFLINE_REGION - Override region",
            "SFN_OFFLINE_ENDPOINT - Override stepFunctionsEndpoint (default: http://localhost:8083)",
            "SFN_OFFLINE_DISTRIBUTED_MAP_MOCK - Override distributedMapMockResource",
        ]
    }
}

/// Rewrite short-form intrinsics (`!GetAtt a.Arn`) into their long form (`Fn::GetAtt: a.Arn`)
/// so they survive conversion to JSON and can be replaced by the resource mapping.
fn expand_intrinsic_tags(value: YamlValue) -> YamlValue {
    match value {
        YamlValue::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let tag = tag.to_string();
            let name = tag.trim_start_matches('!');
            let key = match name {
                "Ref" | "Condition" => name.to_string(),
                _ => format!("Fn::{}", name),
            };
            let mut long_form = Mapping::new();
            long_form.insert(YamlValue::String(key), expand_intrinsic_tags(value));
            YamlValue::Mapping(long_form)
        }
        YamlValue::Mapping(mapping) => YamlValue::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (key, expand_intrinsic_tags(value)))
                .collect(),
        ),
        YamlValue::Sequence(items) => {
            YamlValue::Sequence(items.into_iter().map(expand_intrinsic_tags).collect())
        }
        other => other,
    }
}
