use crate::core::error::AppError;
use crate::core::state_machine::schema::{Definition, ItemReader, StateNode};
use crate::core::state_machine::transform::DefinitionTransform;
use crate::core::types::ErrorCategory;
use serde_json::{Map, Value};

/// Prefix of the synthesized Task that stands in for distributed item reading and batching.
pub const PREPARE_PREFIX: &str = "Prepare";

/// Replaces DISTRIBUTED Map processing with an inline Map fed by a `Prepare<key>` Task.
pub struct DistributedMapTransform {
    mock_resource: Option<String>,
}

impl DistributedMapTransform {
    pub fn new(mock_resource: Option<String>) -> Self {
        Self { mock_resource }
    }

    fn flatten_scope(&self, scope: &mut Definition) -> Result<(), AppError> {
        let keys: Vec<String> = scope.states.keys().cloned().collect();
        for key in keys {
            let distributed = match scope.states.get(&key) {
                Some(state) => state.is_distributed_map(),
                None => continue,
            };
            if distributed {
                self.flatten_state(scope, &key)?;
            }
            if let Some(state) = scope.states.get_mut(&key) {
                for nested in state.nested_scopes_mut() {
                    self.flatten_scope(nested)?;
                }
            }
        }
        Ok(())
    }

    fn flatten_state(&self, scope: &mut Definition, key: &str) -> Result<(), AppError> {
        let resource = self.mock_resource.as_deref().ok_or_else(|| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "state '{}' is a distributed Map but no distributedMapMockResource is configured",
                    key
                ),
            )
            .with_code("SFO-CONFIG-003")
            .with_suggestion("Set custom.step-functions-offline.distributedMapMockResource")
        })?;

        let predecessor = unique_predecessor(scope, key)?;
        let prepare_key = format!("{}{}", PREPARE_PREFIX, key);
        if scope.states.contains_key(&prepare_key) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "cannot flatten distributed Map '{}': state '{}' already exists",
                    key, prepare_key
                ),
            )
            .with_code("SFO-FLATTEN-001"));
        }

        let Some(state) = scope.states.get_mut(key) else {
            return Ok(());
        };
        let captured = CapturedBatching::strip(state);
        let prepare = StateNode::task(resource, captured.into_parameters(), key);

        let position = scope.states.get_index_of(key).unwrap_or(scope.states.len());
        scope.states.shift_insert(position, prepare_key.clone(), prepare);
        if let Some(previous) = scope.states.get_mut(&predecessor) {
            previous.retarget(key, &prepare_key);
        }

        tracing::info!(
            state = key,
            predecessor = predecessor.as_str(),
            prepare = prepare_key.as_str(),
            "flattened distributed map"
        );
        Ok(())
    }
}

impl DefinitionTransform for DistributedMapTransform {
    fn name(&self) -> &'static str {
        "DistributedMapTransform"
    }

    fn transform(&self, definition: Definition) -> Result<Definition, AppError> {
        let mut definition = definition;
        self.flatten_scope(&mut definition)?;
        Ok(definition)
    }
}

fn unique_predecessor(scope: &Definition, key: &str) -> Result<String, AppError> {
    let predecessors = scope.predecessors_of(key);
    match predecessors.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(AppError::new(
            ErrorCategory::LookupError,
            format!("no predecessor state transitions to distributed Map '{}'", key),
        )
        .with_code("SFO-LOOKUP-001")
        .with_context(key.to_string())
        .with_suggestion("A distributed Map cannot be the StartAt state of its scope")),
        many => Err(AppError::new(
            ErrorCategory::LookupError,
            format!(
                "distributed Map '{}' has {} predecessors ({}); only one is supported",
                key,
                many.len(),
                many.join(", ")
            ),
        )
        .with_code("SFO-LOOKUP-002")
        .with_context(key.to_string())),
    }
}

/// Distributed-only settings lifted off a Map before it runs inline.
#[derive(Debug, Default)]
struct CapturedBatching {
    items_path: Option<String>,
    reader: Option<ItemReader>,
    max_items_per_batch: Option<Value>,
    batch_input: Option<Map<String, Value>>,
}

impl CapturedBatching {
    fn strip(state: &mut StateNode) -> Self {
        let batcher = state.item_batcher.take();
        let (max_items_per_batch, batch_input) = match batcher {
            Some(batcher) => (batcher.max_items_per_batch, batcher.batch_input),
            None => (None, None),
        };
        if let Some(processor) = state.item_processor.as_mut() {
            processor.processor_config = None;
        }
        state.max_concurrency_path = None;
        state.label = None;
        state.tolerated_failure_percentage_path = None;

        CapturedBatching {
            items_path: state.items_path.take(),
            reader: state.item_reader.take(),
            max_items_per_batch,
            batch_input,
        }
    }

    fn into_parameters(self) -> Value {
        let mut parameters = Map::new();
        parameters.insert(
            "Items.$".to_string(),
            Value::String(self.items_path.unwrap_or_else(|| "$".to_string())),
        );
        if let Some(reader) = self.reader {
            let mut item_reader = Map::new();
            if let Some(reader_parameters) = reader.parameters {
                item_reader.insert("Parameters".to_string(), reader_parameters);
            }
            if let Some(resource) = reader.resource {
                item_reader.insert("Resource".to_string(), resource);
            }
            if let Some(reader_config) = reader.reader_config {
                item_reader.insert("ReaderConfig".to_string(), reader_config);
            }
            parameters.insert("ItemReader".to_string(), Value::Object(item_reader));
        }
        if let Some(max_items) = self.max_items_per_batch {
            parameters.insert("MaxItemsPerBatch".to_string(), max_items);
        }
        for (field, value) in self.batch_input.into_iter().flatten() {
            parameters.insert(field, value);
        }
        Value::Object(parameters)
    }
}
