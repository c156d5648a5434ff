use crate::core::config::TaskResourceMapping;
use crate::core::error::AppError;
use crate::core::state_machine::schema::Definition;
use crate::core::state_machine::transform::DefinitionTransform;
use crate::core::state_machine::walker::walk;
use serde_json::{Map, Value};

/// Marker of callback integrations: the integration ARN is fixed, only the invoked function moves.
pub const WAIT_FOR_TASK_TOKEN: &str = ".waitForTaskToken";

/// Rewrite `Resource` (or `Parameters.FunctionName` for callback integrations) of every
/// state whose key appears in `mapping`. Unmapped states are left alone.
pub fn apply_task_resource_mapping(definition: &mut Value, mapping: &TaskResourceMapping) {
    if mapping.is_empty() {
        return;
    }
    walk(definition, None, &mut |node, parent_key| {
        let Some(replacement) = parent_key.and_then(|key| mapping.get(key)) else {
            return;
        };
        if !node.contains_key("Resource") {
            return;
        }
        remap_node(node, parent_key.unwrap_or_default(), replacement);
    });
}

fn remap_node(node: &mut Map<String, Value>, state_key: &str, replacement: &str) {
    let is_callback = node
        .get("Resource")
        .and_then(Value::as_str)
        .is_some_and(|resource| resource.contains(WAIT_FOR_TASK_TOKEN));

    if !is_callback {
        tracing::debug!(state = state_key, resource = replacement, "mapped task resource");
        node.insert("Resource".to_string(), Value::String(replacement.to_string()));
        return;
    }

    let parameters = node
        .entry("Parameters")
        .or_insert_with(|| Value::Object(Map::new()));
    match parameters.as_object_mut() {
        Some(parameters) => {
            tracing::debug!(
                state = state_key,
                function = replacement,
                "mapped callback function name"
            );
            parameters.insert(
                "FunctionName".to_string(),
                Value::String(replacement.to_string()),
            );
        }
        None => tracing::warn!(
            state = state_key,
            "Parameters is not an object; callback function name left unmapped"
        ),
    }
}

/// Typed-tree form of [`apply_task_resource_mapping`].
pub struct TaskResourceMappingTransform {
    mapping: TaskResourceMapping,
}

impl TaskResourceMappingTransform {
    pub fn new(mapping: TaskResourceMapping) -> Self {
        Self { mapping }
    }
}

impl DefinitionTransform for TaskResourceMappingTransform {
    fn name(&self) -> &'static str {
        "TaskResourceMappingTransform"
    }

    fn transform(&self, definition: Definition) -> Result<Definition, AppError> {
        if self.mapping.is_empty() {
            return Ok(definition);
        }
        let mut raw = definition.to_value()?;
        apply_task_resource_mapping(&mut raw, &self.mapping);
        Definition::from_value(raw)
    }
}
