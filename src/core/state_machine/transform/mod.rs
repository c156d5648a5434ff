#![allow(clippy::result_large_err)] // Transform pipeline returns AppError for structured diagnostics.

use crate::core::error::AppError;
use crate::core::state_machine::schema::Definition;

pub mod distributed_map;
pub mod integrations;
mod pipeline;
pub mod resource_mapping;

pub use distributed_map::{DistributedMapTransform, PREPARE_PREFIX};
pub use integrations::{IntegrationMockTransform, UnsupportedIntegration};
pub use pipeline::apply_default_pipeline;
pub use resource_mapping::{apply_task_resource_mapping, TaskResourceMappingTransform};

/// One rewrite pass over an owned definition.
pub trait DefinitionTransform {
    fn name(&self) -> &'static str;
    fn transform(&self, definition: Definition) -> Result<Definition, AppError>;
}
