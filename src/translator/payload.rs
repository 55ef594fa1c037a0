//! Typed node payloads, decoded once from the editor's JSON before translation.
//!
//! Nested tagged unions (gate kind, math operator, register kind) are plain
//! serde enums, so an unexpected variant is caught here rather than at each
//! use site.

use super::NodeTag;
use crate::error::ConvertError;
use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

/// Decodes `payload` into the handler's payload type, classifying failures.
pub(crate) fn decode<T: DeserializeOwned>(
    tag: NodeTag,
    node_id: &str,
    payload: &Value,
) -> Result<T, ConvertError> {
    T::deserialize(payload).map_err(|e| {
        let message = e.to_string();
        // serde reports unknown enum tags as "unknown variant `X`, expected ..."
        match message.strip_prefix("unknown variant `") {
            Some(rest) => {
                let value = rest.split('`').next().unwrap_or_default();
                ConvertError::unsupported(node_id, "variant", value)
            }
            None => ConvertError::malformed(node_id, tag.as_str(), message),
        }
    })
}

/// Value types as named by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PinType {
    Bool,
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
    #[serde(rename = "STRING")]
    Text,
    #[serde(rename = "UNDEFINED")]
    Undefined,
    #[serde(rename = "SERIAL")]
    Serial,
    #[serde(rename = "NONE")]
    Nothing,
}

impl PinType {
    pub fn editor_name(self) -> &'static str {
        match self {
            PinType::Bool => "Bool",
            PinType::U8 => "U8",
            PinType::U16 => "U16",
            PinType::U32 => "U32",
            PinType::I8 => "I8",
            PinType::I16 => "I16",
            PinType::I32 => "I32",
            PinType::F32 => "F32",
            PinType::F64 => "F64",
            PinType::Text => "STRING",
            PinType::Undefined => "UNDEFINED",
            PinType::Serial => "SERIAL",
            PinType::Nothing => "NONE",
        }
    }

    /// The runtime's name for this type; editor-only types have none.
    pub fn runtime_name(self) -> Option<&'static str> {
        convert_type(self.editor_name())
    }

    pub(crate) fn require_runtime(self, node_id: &str) -> Result<&'static str, ConvertError> {
        self.runtime_name()
            .ok_or_else(|| ConvertError::unsupported(node_id, "pin type", self.editor_name()))
    }
}

/// Maps an editor primitive type name onto the runtime's type name.
pub fn convert_type(editor_name: &str) -> Option<&'static str> {
    let runtime = match editor_name {
        "U8" => "uint8",
        "U16" => "uint16",
        "U32" => "uint32",
        "I8" => "int8",
        "I16" => "int16",
        "I32" => "int32",
        "F32" => "float",
        "F64" => "double",
        "Bool" => "bool",
        _ => return None,
    };
    Some(runtime)
}

/// A loosely-typed scalar: the editor stores some numbers as text fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstantPayload {
    pub itype: PinType,
    pub value: Scalar,
    pub node_name: String,
}

/// Optional bounds: `None` when the field is absent, `Some(None)` when it is
/// present but null.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInputPayload {
    pub itype: PinType,
    #[serde(default, deserialize_with = "present")]
    pub min: Option<Option<Number>>,
    #[serde(default, deserialize_with = "present")]
    pub max: Option<Option<Number>>,
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Option<Number>>,
    #[serde(default, deserialize_with = "present")]
    pub timeout: Option<Option<Number>>,
    pub node_name: String,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<Number>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOutputPayload {
    pub itype: PinType,
    pub node_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PiControllerPayload {
    pub p: Number,
    pub i: Number,
    pub i_limit: Number,
    pub output_min: Number,
    pub output_max: Number,
    pub node_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VelEstimatorPayload {
    pub alpha: Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum GateType {
    #[serde(rename = "AND")]
    And(usize),
    #[serde(rename = "OR")]
    Or(usize),
    #[serde(rename = "NAND")]
    Nand(usize),
    #[serde(rename = "NOR")]
    Nor(usize),
    #[serde(rename = "XOR")]
    Xor(usize),
    #[serde(rename = "NOT")]
    Not,
}

impl GateType {
    /// Lower-cased gate name and its input count.
    pub fn layout(self) -> (&'static str, usize) {
        match self {
            GateType::And(n) => ("and", n),
            GateType::Or(n) => ("or", n),
            GateType::Nand(n) => ("nand", n),
            GateType::Nor(n) => ("nor", n),
            GateType::Xor(n) => ("xor", n),
            GateType::Not => ("not", 1),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogicGatePayload {
    pub gtype: GateType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparatorPayload {
    pub itype: PinType,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum MathOperator {
    Nary(String, usize),
    BinaryOperation(String),
    UnaryOperation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MathOperationPayload {
    pub itype: PinType,
    pub operator: MathOperator,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiplexerPayload {
    pub itype: PinType,
    pub input_bits: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitwisePayload {
    pub num_bits: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDelayPayload {
    pub cycles: u64,
    pub rising_edge: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDetectPayload {
    pub rising_edge: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CycleDelayPayload {
    pub cycles: u64,
    pub itype: PinType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConverterPayload {
    pub input_type: PinType,
    pub output_type: PinType,
    pub direct_mode: bool,
    pub input_min: Scalar,
    pub input_max: Scalar,
    pub output_min: Scalar,
    pub output_max: Scalar,
    pub invert: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrintPayload {
    pub name: String,
    pub itype: PinType,
}

/// Payload of node types that only carry a user-chosen name.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerialDevicePayload {
    pub enabled: bool,
    pub addr: Number,
    pub timeout: Number,
    pub descriptor: String,
    pub node_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum SerialRegister {
    AsyncReg { update_cycles: Number },
    CyclicReg { sync_node: bool, cyclic_index: Number },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerialRegisterPayload {
    pub name: String,
    pub dev: SerialRegister,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerialSetPayload {
    pub name: String,
    pub value: Scalar,
}
