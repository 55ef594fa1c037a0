//! The network assembler: drives the translator over a network's nodes,
//! folds virtual serial nodes into their devices and resolves wires into
//! named connections.

use crate::document::{NetworkDocument, OutputNetwork, OutputNode, RawNode, Wire};
use crate::error::ConvertError;
use crate::translator::{self, NodeTag, PinTable, TagRegistry, Translation};
use ahash::AHashMap;
use indexmap::IndexMap;

mod serial;
mod wiring;

pub use serial::SerialTables;

/// Pin table of a concrete node, as indexed by its raw editor id.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    /// Resolved key of the node in the runtime node table.
    pub name: String,
    pub tag: NodeTag,
    pub pins: PinTable,
}

/// Assembles editor networks into runtime networks.
pub struct NetworkAssembler<'a> {
    registry: &'a TagRegistry,
}

impl<'a> NetworkAssembler<'a> {
    pub fn new(registry: &'a TagRegistry) -> Self {
        Self { registry }
    }

    pub fn assemble(&self, network: &NetworkDocument) -> Result<OutputNetwork, ConvertError> {
        let mut state = NetworkState::new(&network.name);

        for raw in &network.nodes.nodes {
            state.add_node(self.registry, raw)?;
        }

        let remaining = state.fold_serial_wires(&network.nodes.wires)?;
        let connections = state.resolve_wires(&remaining)?;

        tracing::info!(
            network = %network.name,
            nodes = state.nodes.len(),
            connections = connections.len(),
            folded_wires = network.nodes.wires.len() - remaining.len(),
            "assembled network"
        );

        Ok(OutputNetwork {
            enable: network.enabled,
            dynamic_enable_starting: network.dynamic_enable_starting,
            network_type: network.net_type.to_lowercase(),
            timeout_usec: network.timeout,
            update_cycle_trigger_count: network.update_cycle_trigger_count,
            execution_order: network.execution_index,
            connections: connections.into_iter().enumerate().collect(),
            nodes: state.nodes,
        })
    }
}

/// Per-network scratch state; nothing here outlives one `assemble` call.
pub(crate) struct NetworkState<'n> {
    network: &'n str,
    nodes: IndexMap<String, OutputNode>,
    index: AHashMap<String, IndexedNode>,
    serial: SerialTables,
}

impl<'n> NetworkState<'n> {
    fn new(network: &'n str) -> Self {
        Self {
            network,
            nodes: IndexMap::new(),
            index: AHashMap::new(),
            serial: SerialTables::default(),
        }
    }

    fn add_node(&mut self, registry: &TagRegistry, raw: &RawNode) -> Result<(), ConvertError> {
        let (editor_name, payload) = raw.variant()?;
        let tag = registry.resolve(editor_name, &raw.id)?;

        if self.index.contains_key(&raw.id) {
            return Err(self.duplicate_reference(&raw.id, "pin index"));
        }
        if let Some(table) = self.serial.table_containing(&raw.id) {
            return Err(self.duplicate_reference(&raw.id, table));
        }

        match translator::translate(tag, payload, &raw.id)? {
            Translation::Serial(fragment) => {
                tracing::debug!(
                    raw_id = %raw.id,
                    tag = %tag,
                    register = fragment.name(),
                    "queued serial register"
                );
                self.serial
                    .insert(raw.id.clone(), fragment)
                    .map_err(|table| self.duplicate_reference(&raw.id, table))?;
            }
            Translation::Node(translated) => {
                if self.nodes.contains_key(&translated.key) {
                    return Err(ConvertError::DuplicateKey {
                        kind: "node key".to_string(),
                        key: translated.key,
                        scope: format!("network '{}'", self.network),
                    });
                }
                tracing::debug!(
                    raw_id = %raw.id,
                    tag = %tag,
                    key = %translated.key,
                    "translated node"
                );
                self.nodes.insert(translated.key.clone(), translated.node);
                self.index.insert(
                    raw.id.clone(),
                    IndexedNode {
                        name: translated.key,
                        tag,
                        pins: translated.pins,
                    },
                );
            }
        }
        Ok(())
    }

    fn duplicate_reference(&self, raw_id: &str, table: &str) -> ConvertError {
        ConvertError::DuplicatePinReference {
            node_id: raw_id.to_string(),
            table: table.to_string(),
            network: self.network.to_string(),
        }
    }
}

pub(crate) fn unresolved_wire(
    network: &str,
    wire_index: usize,
    wire: &Wire,
    reason: impl Into<String>,
) -> ConvertError {
    ConvertError::UnresolvedWire {
        network: network.to_string(),
        wire_index,
        src_node: wire.out_pin.node.clone(),
        src_pin: wire.out_pin.output,
        dst_node: wire.in_pin.node.clone(),
        dst_pin: wire.in_pin.input,
        reason: reason.into(),
    }
}
