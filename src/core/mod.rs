pub mod config;
pub mod error;
pub mod orchestrator;
pub mod publish;
pub mod registry;
pub mod state_machine;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, LoadOverrides, OfflineConfig, ServiceDefinition};
pub use error::AppError;
pub use orchestrator::{DeploymentOrchestrator, DeploymentReport, RegisteredStateMachine};
pub use registry::{StateMachineRegistry, StepFunctionsClient};
pub use types::*;
