use crate::core::config::OfflineConfig;
use crate::core::error::AppError;
use crate::core::state_machine::schema::Definition;
use crate::core::state_machine::transform::distributed_map::DistributedMapTransform;
use crate::core::state_machine::transform::integrations::IntegrationMockTransform;
use crate::core::state_machine::transform::DefinitionTransform;

/// Flatten distributed Maps, then substitute unsupported integrations.
pub fn apply_default_pipeline(
    definition: Definition,
    config: &OfflineConfig,
) -> Result<Definition, AppError> {
    let transforms: Vec<Box<dyn DefinitionTransform>> = vec![
        Box::new(DistributedMapTransform::new(
            config.distributed_map_mock_resource.clone(),
        )),
        Box::new(IntegrationMockTransform::new(config.integration_mocks.clone())),
    ];
    let mut current = definition;
    for transform in transforms {
        tracing::debug!(transform = transform.name(), "applying definition transform");
        current = transform.transform(current)?;
    }
    Ok(current)
}
