#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::orchestrator::DeploymentReport;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;

/// Prefix of the variables downstream tooling reads registered ARNs from.
pub const ARN_ENV_PREFIX: &str = "OFFLINE_STEP_FUNCTIONS_ARN_";

/// How publication variables are written out.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EnvFormat {
    /// `KEY=value` lines
    #[default]
    Dotenv,
    /// `export KEY='value'` lines for `eval`
    Exports,
}

/// `arn:aws:states:us-east-1:123:stateMachine:Orders` → `OFFLINE_STEP_FUNCTIONS_ARN_Orders`.
pub fn arn_env_key(arn: &str) -> Result<String, AppError> {
    match arn.split(':').nth(6) {
        Some(segment) if !segment.is_empty() => Ok(format!("{}{}", ARN_ENV_PREFIX, segment)),
        _ => Err(AppError::new(
            ErrorCategory::ValidationError,
            format!("'{}' has no state machine name segment", arn),
        )
        .with_code("SFO-PUBLISH-001")),
    }
}

/// Variable name → ARN for every registered machine.
pub fn publication_vars(report: &DeploymentReport) -> Result<IndexMap<String, String>, AppError> {
    report
        .registered
        .iter()
        .map(|machine| {
            arn_env_key(&machine.state_machine_arn)
                .map(|key| (key, machine.state_machine_arn.clone()))
        })
        .collect()
}

pub fn render(vars: &IndexMap<String, String>, format: EnvFormat) -> String {
    vars.iter()
        .map(|(key, value)| match format {
            EnvFormat::Dotenv => format!("{}={}\n", key, value),
            EnvFormat::Exports => format!("export {}='{}'\n", key, value.replace('\'', "'\\''")),
        })
        .collect()
}
