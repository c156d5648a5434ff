use crate::core::error::AppError;
use crate::core::registry::{
    CreateStateMachineOutput, CreateStateMachineRequest, RegistryError, StateMachineRegistry,
    UpdateStateMachineOutput, UpdateStateMachineRequest, STATE_MACHINE_ALREADY_EXISTS,
};
use crate::core::types::ErrorCategory;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

const AMZ_JSON: &str = "application/x-amz-json-1.0";
const TARGET_PREFIX: &str = "AWSStepFunctions";

/// AWS JSON 1.0 client for Step Functions Local.
///
/// Requests are unsigned and carry no region or credential scope.
pub struct StepFunctionsClient {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

impl StepFunctionsClient {
    #[allow(clippy::result_large_err)]
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("invalid stepFunctionsEndpoint '{}': {}", endpoint, err),
            )
            .with_code("SFO-CONFIG-007")
        })?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, RegistryError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        tracing::debug!(
            operation,
            endpoint = %self.endpoint,
            "calling state machine registry"
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .json(request)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        let header_type = response
            .headers()
            .get("x-amzn-ErrorType")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(decode_error(status, header_type, &body));
        }

        serde_json::from_slice(&body).map_err(|e| RegistryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StateMachineRegistry for StepFunctionsClient {
    async fn create_state_machine(
        &self,
        request: CreateStateMachineRequest,
    ) -> Result<CreateStateMachineOutput, RegistryError> {
        self.call("CreateStateMachine", &request).await
    }

    async fn update_state_machine(
        &self,
        request: UpdateStateMachineRequest,
    ) -> Result<UpdateStateMachineOutput, RegistryError> {
        self.call("UpdateStateMachine", &request).await
    }
}

fn decode_error(
    status: reqwest::StatusCode,
    header_type: Option<String>,
    body: &[u8],
) -> RegistryError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let raw_type = parsed.error_type.or(header_type).unwrap_or_default();
    let code = error_code(&raw_type);
    let message = parsed
        .message
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    if code == STATE_MACHINE_ALREADY_EXISTS {
        return RegistryError::AlreadyExists { message };
    }
    RegistryError::Service {
        code: if code.is_empty() {
            status.to_string()
        } else {
            code.to_string()
        },
        message,
    }
}

/// `com.amazonaws...#StateMachineAlreadyExists:extra` → `StateMachineAlreadyExists`.
fn error_code(raw: &str) -> &str {
    let after_hash = raw.rsplit('#').next().unwrap_or(raw);
    after_hash.split(':').next().unwrap_or(after_hash).trim()
}
