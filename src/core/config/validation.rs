#![allow(clippy::result_large_err)]

use super::OfflineConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use url::Url;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the settings every run needs, before any definition is touched
    pub fn validate(config: &OfflineConfig) -> Result<(), AppError> {
        if config.account_id.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "Step Functions Offline: missing accountId",
            )
            .with_code("SFO-CONFIG-001")
            .with_suggestion("Set custom.step-functions-offline.accountId or SFN_OFFLINE_ACCOUNT_ID"));
        }

        if config.region.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "Step Functions Offline: missing region",
            )
            .with_code("SFO-CONFIG-002")
            .with_suggestion("Set custom.step-functions-offline.region or SFN_OFFLINE_REGION"));
        }

        let endpoint = Url::parse(&config.step_functions_endpoint).map_err(|err| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "invalid stepFunctionsEndpoint '{}': {}",
                    config.step_functions_endpoint, err
                ),
            )
            .with_code("SFO-CONFIG-007")
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "stepFunctionsEndpoint must use http or https, got '{}'",
                    endpoint.scheme()
                ),
            )
            .with_code("SFO-CONFIG-007"));
        }

        Ok(())
    }
}
