use crate::error::ConvertError;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// The editor's saved program: document info, global variables and networks.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub info: Value,
    #[serde(default)]
    pub set_node_vars: Vec<GlobalVariable>,
    pub networks: Vec<NetworkDocument>,
}

/// A user-declared global node variable.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub pin_type: String,
}

/// One network as saved by the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDocument {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub dynamic_enable_starting: bool,
    pub net_type: String,
    pub timeout: u64,
    pub update_cycle_trigger_count: u64,
    pub execution_index: i64,
    pub nodes: NodeGraph,
}

/// The editor's graph: node table plus point-to-point wires.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeGraph {
    #[serde(deserialize_with = "node_entries")]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

static NO_PAYLOAD: Value = Value::Null;

/// A node exactly as stored in the editor's node table.
///
/// `value` is the editor's tagged union: `{"<Tag>": {payload}}`, or a bare
/// string for payload-less variants.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: String,
    pub value: Value,
}

impl RawNode {
    pub fn new(id: impl Into<String>, tag: &str, payload: Value) -> Self {
        let mut value = serde_json::Map::new();
        value.insert(tag.to_string(), payload);
        Self {
            id: id.into(),
            value: Value::Object(value),
        }
    }

    /// Splits the tagged union into its tag name and payload.
    pub fn variant(&self) -> Result<(&str, &Value), ConvertError> {
        match &self.value {
            Value::String(tag) => Ok((tag.as_str(), &NO_PAYLOAD)),
            Value::Object(map) if map.len() == 1 => map
                .iter()
                .next()
                .map(|(tag, payload)| (tag.as_str(), payload))
                .ok_or_else(|| self.shape_error()),
            _ => Err(self.shape_error()),
        }
    }

    fn shape_error(&self) -> ConvertError {
        ConvertError::malformed(
            &self.id,
            "node",
            "node value must be a single-entry object keyed by the node type",
        )
    }
}

#[derive(Deserialize)]
struct NodeSlot {
    value: Value,
}

/// Reads the node table in document order, keeping repeated ids so the
/// assembler can reject them instead of silently keeping the last one.
fn node_entries<'de, D>(deserializer: D) -> Result<Vec<RawNode>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<RawNode>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of node id to node entry")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, slot)) = map.next_entry::<String, NodeSlot>()? {
                nodes.push(RawNode {
                    id,
                    value: slot.value,
                });
            }
            Ok(nodes)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// A directed, pin-index-addressed edge between two raw nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wire {
    pub out_pin: OutPinRef,
    pub in_pin: InPinRef,
}

impl Wire {
    pub fn new(
        src: impl Into<String>,
        output: usize,
        dst: impl Into<String>,
        input: usize,
    ) -> Self {
        Self {
            out_pin: OutPinRef {
                node: src.into(),
                output,
            },
            in_pin: InPinRef {
                node: dst.into(),
                input,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutPinRef {
    #[serde(deserialize_with = "raw_id")]
    pub node: String,
    pub output: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InPinRef {
    #[serde(deserialize_with = "raw_id")]
    pub node: String,
    pub input: usize,
}

/// Node ids in wires are numbers in editor files but strings in the node table.
fn raw_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    match Id::deserialize(deserializer) {
        Ok(Id::Number(n)) => Ok(n.to_string()),
        Ok(Id::Text(s)) => Ok(s),
        Err(_) => Err(de::Error::custom(
            "wire node id must be a non-negative integer or a string",
        )),
    }
}
