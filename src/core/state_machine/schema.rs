#![allow(clippy::result_large_err)] // Schema APIs return AppError to keep definition context attached.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A `States` scope: the root of a state machine, an `ItemProcessor`, or a `Parallel` branch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Definition {
    /// `StartAt`, `Comment`, `TimeoutSeconds` and anything else carried verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(rename = "States")]
    pub states: IndexMap<String, StateNode>,
}

/// Closed set of state kinds the transforms reason about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKind {
    Task,
    Map,
    Choice,
    Pass,
    Wait,
    Succeed,
    Fail,
    Parallel,
    /// Passed through unchanged.
    Unknown(String),
}

impl StateKind {
    pub fn as_str(&self) -> &str {
        match self {
            StateKind::Task => "Task",
            StateKind::Map => "Map",
            StateKind::Choice => "Choice",
            StateKind::Pass => "Pass",
            StateKind::Wait => "Wait",
            StateKind::Succeed => "Succeed",
            StateKind::Fail => "Fail",
            StateKind::Parallel => "Parallel",
            StateKind::Unknown(other) => other,
        }
    }
}

impl From<String> for StateKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Task" => StateKind::Task,
            "Map" => StateKind::Map,
            "Choice" => StateKind::Choice,
            "Pass" => StateKind::Pass,
            "Wait" => StateKind::Wait,
            "Succeed" => StateKind::Succeed,
            "Fail" => StateKind::Fail,
            "Parallel" => StateKind::Parallel,
            _ => StateKind::Unknown(value),
        }
    }
}

impl Serialize for StateKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StateKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(StateKind::from)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a `States` mapping.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateNode {
    #[serde(rename = "Type")]
    pub kind: StateKind,
    /// Usually a string ARN, but service files may still hold an intrinsic such as `Fn::GetAtt`.
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(rename = "Parameters", default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(rename = "Next", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(rename = "Default", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "Choices", default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoiceRule>>,
    #[serde(rename = "ItemProcessor", default, skip_serializing_if = "Option::is_none")]
    pub item_processor: Option<ItemProcessor>,
    #[serde(rename = "ItemBatcher", default, skip_serializing_if = "Option::is_none")]
    pub item_batcher: Option<ItemBatcher>,
    #[serde(rename = "ItemReader", default, skip_serializing_if = "Option::is_none")]
    pub item_reader: Option<ItemReader>,
    #[serde(rename = "ItemsPath", default, skip_serializing_if = "Option::is_none")]
    pub items_path: Option<String>,
    #[serde(
        rename = "MaxConcurrencyPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_concurrency_path: Option<String>,
    #[serde(rename = "Label", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        rename = "ToleratedFailurePercentagePath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tolerated_failure_percentage_path: Option<String>,
    #[serde(rename = "Branches", default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<Definition>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single rule of a Choice state. Condition fields are kept verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChoiceRule {
    #[serde(flatten)]
    pub condition: Map<String, Value>,
    #[serde(rename = "Next", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemProcessor {
    #[serde(
        rename = "ProcessorConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub processor_config: Option<ProcessorConfig>,
    #[serde(flatten)]
    pub definition: Definition,
}

impl ItemProcessor {
    pub fn mode(&self) -> Option<&ProcessorMode> {
        self.processor_config
            .as_ref()
            .and_then(|config| config.mode.as_ref())
    }

    pub fn is_distributed(&self) -> bool {
        matches!(self.mode(), Some(ProcessorMode::Distributed))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcessorConfig {
    #[serde(rename = "Mode", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProcessorMode>,
    /// `ExecutionType` and friends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorMode {
    Inline,
    Distributed,
    Other(String),
}

impl ProcessorMode {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessorMode::Inline => "INLINE",
            ProcessorMode::Distributed => "DISTRIBUTED",
            ProcessorMode::Other(other) => other,
        }
    }
}

impl Serialize for ProcessorMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProcessorMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "INLINE" => ProcessorMode::Inline,
            "DISTRIBUTED" => ProcessorMode::Distributed,
            _ => ProcessorMode::Other(raw),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemBatcher {
    #[serde(
        rename = "MaxItemsPerBatch",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_items_per_batch: Option<Value>,
    #[serde(rename = "BatchInput", default, skip_serializing_if = "Option::is_none")]
    pub batch_input: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemReader {
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(rename = "Parameters", default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(rename = "ReaderConfig", default, skip_serializing_if = "Option::is_none")]
    pub reader_config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition {
    /// Parse a raw JSON definition into the typed tree.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        serde_json::from_value(value).map_err(|err| {
            AppError::new(
                ErrorCategory::SerializationError,
                format!("definition does not match state machine shape: {}", err),
            )
            .with_code("SFO-SCHEMA-001")
        })
    }

    pub fn to_value(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Compact JSON string as sent to the registry.
    pub fn to_json_string(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn start_at(&self) -> Option<&str> {
        self.extra.get("StartAt").and_then(Value::as_str)
    }

    /// Names of the states in this scope that transition to `target`.
    pub fn predecessors_of(&self, target: &str) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, state)| state.transitions_to(target))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl StateNode {
    /// A plain Task state with the given resource, parameters and successor.
    pub fn task(resource: impl Into<String>, parameters: Value, next: impl Into<String>) -> Self {
        StateNode {
            kind: StateKind::Task,
            resource: Some(Value::String(resource.into())),
            parameters: Some(parameters),
            next: Some(next.into()),
            default: None,
            choices: None,
            item_processor: None,
            item_batcher: None,
            item_reader: None,
            items_path: None,
            max_concurrency_path: None,
            label: None,
            tolerated_failure_percentage_path: None,
            branches: None,
            extra: Map::new(),
        }
    }

    pub fn resource_str(&self) -> Option<&str> {
        self.resource.as_ref().and_then(Value::as_str)
    }

    pub fn is_distributed_map(&self) -> bool {
        self.kind == StateKind::Map
            && self
                .item_processor
                .as_ref()
                .is_some_and(ItemProcessor::is_distributed)
    }

    /// True when `Next`, or for Choice states `Default` or any `Choices[i].Next`, names `target`.
    pub fn transitions_to(&self, target: &str) -> bool {
        if self.next.as_deref() == Some(target) {
            return true;
        }
        if self.kind != StateKind::Choice {
            return false;
        }
        self.default.as_deref() == Some(target)
            || self
                .choices
                .iter()
                .flatten()
                .any(|rule| rule.next.as_deref() == Some(target))
    }

    /// Point every edge that names `from` at `to`.
    pub fn retarget(&mut self, from: &str, to: &str) {
        if self.kind == StateKind::Choice {
            for rule in self.choices.iter_mut().flatten() {
                if rule.next.as_deref() == Some(from) {
                    rule.next = Some(to.to_string());
                }
            }
            if self.default.as_deref() == Some(from) {
                self.default = Some(to.to_string());
            }
            if self.next.as_deref() == Some(from) {
                self.next = Some(to.to_string());
            }
        } else {
            self.next = Some(to.to_string());
        }
    }

    /// Child scopes: the `ItemProcessor` of a Map and every `Parallel` branch.
    pub fn nested_scopes_mut(&mut self) -> impl Iterator<Item = &mut Definition> + '_ {
        self.item_processor
            .iter_mut()
            .map(|processor| &mut processor.definition)
            .chain(self.branches.iter_mut().flatten())
    }
}
