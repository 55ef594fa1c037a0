use super::{IndexedNode, NetworkState, unresolved_wire};
use crate::document::{Connection, Wire};
use crate::error::ConvertError;
use crate::translator::SerialFragment;

impl NetworkState<'_> {
    /// Resolves the wires left after serial folding into named connections.
    ///
    /// A wire touching a folded read (as source) or write (as destination)
    /// expands into one connection per device that register was folded into,
    /// in folding order. Every other wire yields exactly one connection.
    pub(super) fn resolve_wires(
        &self,
        wires: &[(usize, &Wire)],
    ) -> Result<Vec<Connection>, ConvertError> {
        let mut connections = Vec::with_capacity(wires.len());
        for (wire_index, wire) in wires {
            self.resolve_wire(*wire_index, wire, &mut connections)?;
        }
        Ok(connections)
    }

    fn resolve_wire(
        &self,
        wire_index: usize,
        wire: &Wire,
        connections: &mut Vec<Connection>,
    ) -> Result<(), ConvertError> {
        let src = wire.out_pin.node.as_str();
        let dst = wire.in_pin.node.as_str();
        let read = self.serial.reads.get(src);
        let write = self.serial.writes.get(dst);

        match (read, write) {
            (Some(_), Some(_)) => Err(unresolved_wire(
                self.network,
                wire_index,
                wire,
                "a serial read cannot be wired directly to a serial write",
            )),
            (Some(read), None) => {
                let dst_node = self.indexed(dst, wire_index, wire)?;
                let dst_port = self.input_port(dst_node, wire_index, wire)?;
                for device in self.attached_devices(src, read, wire_index, wire)? {
                    connections.push(Connection {
                        src_node: device.clone(),
                        src_port: read.name().to_string(),
                        dst_node: dst_node.name.clone(),
                        dst_port: dst_port.to_string(),
                    });
                }
                Ok(())
            }
            (None, Some(write)) => {
                let src_node = self.indexed(src, wire_index, wire)?;
                let src_port = self.output_port(src_node, wire_index, wire)?;
                for device in self.attached_devices(dst, write, wire_index, wire)? {
                    connections.push(Connection {
                        src_node: src_node.name.clone(),
                        src_port: src_port.to_string(),
                        dst_node: device.clone(),
                        dst_port: write.name().to_string(),
                    });
                }
                Ok(())
            }
            (None, None) => {
                let src_node = self.indexed(src, wire_index, wire)?;
                let dst_node = self.indexed(dst, wire_index, wire)?;
                connections.push(Connection {
                    src_node: src_node.name.clone(),
                    src_port: self.output_port(src_node, wire_index, wire)?.to_string(),
                    dst_node: dst_node.name.clone(),
                    dst_port: self.input_port(dst_node, wire_index, wire)?.to_string(),
                });
                Ok(())
            }
        }
    }

    fn indexed(
        &self,
        raw_id: &str,
        wire_index: usize,
        wire: &Wire,
    ) -> Result<&IndexedNode, ConvertError> {
        self.index.get(raw_id).ok_or_else(|| {
            unresolved_wire(
                self.network,
                wire_index,
                wire,
                format!("node '{}' is not in the network's node table", raw_id),
            )
        })
    }

    fn output_port<'s>(
        &self,
        node: &'s IndexedNode,
        wire_index: usize,
        wire: &Wire,
    ) -> Result<&'s str, ConvertError> {
        node.pins.output_port(wire.out_pin.output).ok_or_else(|| {
            unresolved_wire(
                self.network,
                wire_index,
                wire,
                format!(
                    "{} node '{}' has no output pin {}",
                    node.tag, node.name, wire.out_pin.output
                ),
            )
        })
    }

    fn input_port<'s>(
        &self,
        node: &'s IndexedNode,
        wire_index: usize,
        wire: &Wire,
    ) -> Result<&'s str, ConvertError> {
        node.pins.input_port(wire.in_pin.input).ok_or_else(|| {
            unresolved_wire(
                self.network,
                wire_index,
                wire,
                format!(
                    "{} node '{}' has no input pin {}",
                    node.tag, node.name, wire.in_pin.input
                ),
            )
        })
    }

    fn attached_devices<'f>(
        &self,
        raw_id: &str,
        fragment: &'f SerialFragment,
        wire_index: usize,
        wire: &Wire,
    ) -> Result<&'f [String], ConvertError> {
        if fragment.device_names.is_empty() {
            return Err(unresolved_wire(
                self.network,
                wire_index,
                wire,
                format!(
                    "serial register '{}' (node '{}') is not wired to any serial device",
                    fragment.name(),
                    raw_id
                ),
            ));
        }
        Ok(&fragment.device_names)
    }
}
