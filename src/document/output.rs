use crate::translator::RegisterField;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The control runtime's node configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub info: Value,
    pub networks: IndexMap<String, OutputNetwork>,
    pub user_node_vars: IndexMap<String, VariableType>,
    /// Reserved by the runtime; always written empty.
    pub node_var_values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableType {
    #[serde(rename = "type")]
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNetwork {
    pub enable: bool,
    pub dynamic_enable_starting: bool,
    #[serde(rename = "type")]
    pub network_type: String,
    pub timeout_usec: u64,
    pub update_cycle_trigger_count: u64,
    pub execution_order: i64,
    pub connections: IndexMap<usize, Connection>,
    pub nodes: IndexMap<String, OutputNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub config: Map<String, Value>,
}

impl OutputNode {
    pub const SERIAL_DEVICE_TYPE: &'static str = "em_serial_device";

    pub fn new(node_type: &str, config: Map<String, Value>) -> Self {
        Self {
            node_type: node_type.to_string(),
            config,
        }
    }

    pub fn is_serial_device(&self) -> bool {
        self.node_type == Self::SERIAL_DEVICE_TYPE
    }

    /// The register list `field` inside `config.device`, for serial devices only.
    pub fn serial_registers_mut(&mut self, field: RegisterField) -> Option<&mut Vec<Value>> {
        if !self.is_serial_device() {
            return None;
        }
        self.config
            .get_mut("device")?
            .get_mut(field.as_str())?
            .as_array_mut()
    }

    pub fn serial_registers(&self, field: RegisterField) -> Option<&Vec<Value>> {
        if !self.is_serial_device() {
            return None;
        }
        self.config.get("device")?.get(field.as_str())?.as_array()
    }
}

/// A resolved, port-name-addressed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub src_node: String,
    pub src_port: String,
    pub dst_node: String,
    pub dst_port: String,
}
