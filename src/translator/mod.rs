//! The node translator: editor node → runtime node record and pin table.
//!
//! Every supported node type is listed exactly once in the `define_node_tags!`
//! table below, together with its payload type and translation function. The
//! macro generates the closed [`NodeTag`] enum and the exhaustive dispatch in
//! [`translate`], so adding a node type without a translation is a compile
//! error.

use crate::document::OutputNode;
use crate::error::ConvertError;
use crate::naming::synthesized_key;
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub mod fixtures;
mod nodes;
pub mod payload;
pub mod pins;
pub mod serial;

pub use nodes::{MAX_INPUT_COUNT, MAX_SELECT_BITS, snap_bit_width};
pub use payload::{PinType, convert_type};
pub use pins::PinTable;
pub use serial::{RegisterEntry, RegisterField, SerialFragment, SerialRole};

use payload::*;

/// A concrete runtime node produced by the translator.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedNode {
    pub key: String,
    pub node: OutputNode,
    pub pins: PinTable,
}

/// Result of translating one editor node.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    Node(TranslatedNode),
    /// Virtual serial nodes become register fragments folded into a device.
    Serial(SerialFragment),
}

impl Translation {
    /// A node keyed by its user-assigned name.
    fn node(key: String, node_type: &str, config: Map<String, Value>, pins: PinTable) -> Self {
        Translation::Node(TranslatedNode {
            key,
            node: OutputNode::new(node_type, config),
            pins,
        })
    }

    /// A node with no user-assigned name, keyed as `{type}_{raw_id}`.
    fn anonymous(
        raw_id: &str,
        node_type: &str,
        config: Map<String, Value>,
        pins: PinTable,
    ) -> Self {
        Self::node(synthesized_key(node_type, raw_id), node_type, config, pins)
    }
}

macro_rules! define_node_tags {
    ( $( ($variant:ident, $payload:ty, $handler:path) ),* $(,)? ) => {
        /// The closed set of editor node types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeTag {
            $( $variant, )*
        }

        impl NodeTag {
            pub const ALL: &'static [NodeTag] = &[ $( NodeTag::$variant, )* ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( NodeTag::$variant => stringify!($variant), )*
                }
            }
        }

        /// Translates one editor node of type `tag`.
        ///
        /// Fails with `UnsupportedTag` for unknown nested variants or editor-only
        /// value types, and with `MalformedPayload` for missing or ill-typed fields.
        pub fn translate(
            tag: NodeTag,
            payload: &Value,
            raw_id: &str,
        ) -> Result<Translation, ConvertError> {
            let translation = match tag {
                $(
                    NodeTag::$variant => {
                        let decoded: $payload = payload::decode(tag, raw_id, payload)?;
                        $handler(decoded, raw_id)?
                    }
                )*
            };
            tracing::trace!(raw_id, tag = tag.as_str(), "translated node");
            Ok(translation)
        }
    };
}

define_node_tags! {
    (Constant, ConstantPayload, nodes::constant),
    (ApiInput, ApiInputPayload, nodes::api_input),
    (ApiOutput, ApiOutputPayload, nodes::api_output),
    (PIController, PiControllerPayload, nodes::pi_controller),
    (VelEstimator, VelEstimatorPayload, nodes::vel_estimator),
    (LogicGate, LogicGatePayload, nodes::logic_gate),
    (Comparator, ComparatorPayload, nodes::comparator),
    (MathOperation, MathOperationPayload, nodes::math_operation),
    (Multiplexer, MultiplexerPayload, nodes::multiplexer),
    (BitwiseSplit, BitwisePayload, nodes::bitwise_split),
    (BitwiseJoin, BitwisePayload, nodes::bitwise_join),
    (EdgeDelay, EdgeDelayPayload, nodes::edge_delay),
    (EdgeDetect, EdgeDetectPayload, nodes::edge_detect),
    (CycleDelay, CycleDelayPayload, nodes::cycle_delay),
    (Converter, ConverterPayload, nodes::converter),
    (Print, PrintPayload, nodes::print),
    (Kins, NamedPayload, nodes::kins),
    (Mouse, NamedPayload, nodes::mouse),
    (SerialDevice, SerialDevicePayload, nodes::serial_device),
    (SerialRead, SerialRegisterPayload, nodes::serial_read),
    (SerialWrite, SerialRegisterPayload, nodes::serial_write),
    (SerialSet, SerialSetPayload, nodes::serial_set),
    (GetGlobalVariable, NamedPayload, nodes::get_global_variable),
    (SetGlobalVariable, NamedPayload, nodes::set_global_variable),
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown node type '{}', expected one of: {}",
                    s,
                    NodeTag::ALL.iter().join(", ")
                )
            })
    }
}

/// Editor type names that older files use for current node types.
pub const LEGACY_ALIASES: [(&str, NodeTag); 2] = [
    ("GlobalVariableInput", NodeTag::GetGlobalVariable),
    ("GlobalVariableOutput", NodeTag::SetGlobalVariable),
];

/// Maps editor type names onto node tags.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    tags: AHashMap<String, NodeTag>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TagRegistry {
    /// All node tags under their own names plus the legacy aliases.
    pub fn new() -> Self {
        let mut tags: AHashMap<String, NodeTag> = NodeTag::ALL
            .iter()
            .map(|tag| (tag.as_str().to_string(), *tag))
            .collect();
        for (alias, tag) in LEGACY_ALIASES {
            tags.insert(alias.to_string(), tag);
        }
        Self { tags }
    }

    pub fn with_alias(mut self, editor_name: &str, tag: NodeTag) -> Self {
        self.tags.insert(editor_name.to_string(), tag);
        self
    }

    pub fn resolve(&self, editor_name: &str, raw_id: &str) -> Result<NodeTag, ConvertError> {
        self.tags
            .get(editor_name)
            .copied()
            .ok_or_else(|| ConvertError::unsupported(raw_id, "node type", editor_name))
    }
}
