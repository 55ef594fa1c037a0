use super::{NetworkState, unresolved_wire};
use crate::document::Wire;
use crate::error::ConvertError;
use crate::translator::{SerialFragment, SerialRole};
use ahash::AHashMap;

/// Register fragments of a network's virtual serial nodes, keyed by raw id.
#[derive(Debug, Default)]
pub struct SerialTables {
    pub reads: AHashMap<String, SerialFragment>,
    pub writes: AHashMap<String, SerialFragment>,
    pub sets: AHashMap<String, SerialFragment>,
}

impl SerialTables {
    pub fn table(&self, role: SerialRole) -> &AHashMap<String, SerialFragment> {
        match role {
            SerialRole::Read => &self.reads,
            SerialRole::Write => &self.writes,
            SerialRole::Set => &self.sets,
        }
    }

    pub fn table_mut(&mut self, role: SerialRole) -> &mut AHashMap<String, SerialFragment> {
        match role {
            SerialRole::Read => &mut self.reads,
            SerialRole::Write => &mut self.writes,
            SerialRole::Set => &mut self.sets,
        }
    }

    /// Stores a fragment; on a repeated raw id returns the table's name.
    pub fn insert(&mut self, raw_id: String, fragment: SerialFragment) -> Result<(), &'static str> {
        let role = fragment.role;
        let table = self.table_mut(role);
        if table.contains_key(&raw_id) {
            return Err(role.table_name());
        }
        table.insert(raw_id, fragment);
        Ok(())
    }

    pub fn table_containing(&self, raw_id: &str) -> Option<&'static str> {
        [SerialRole::Read, SerialRole::Write, SerialRole::Set]
            .into_iter()
            .find(|role| self.table(*role).contains_key(raw_id))
            .map(SerialRole::table_name)
    }

    /// The virtual node a wire attaches to a physical device, if any.
    ///
    /// Returns the fragment's role, the virtual raw id and the device's raw id.
    fn folding_target<'w>(&self, wire: &'w Wire) -> Option<(SerialRole, &'w str, &'w str)> {
        let src = wire.out_pin.node.as_str();
        let dst = wire.in_pin.node.as_str();
        if self.writes.contains_key(src) {
            Some((SerialRole::Write, src, dst))
        } else if self.reads.contains_key(dst) {
            Some((SerialRole::Read, dst, src))
        } else if self.sets.contains_key(src) {
            Some((SerialRole::Set, src, dst))
        } else {
            None
        }
    }
}

impl NetworkState<'_> {
    /// Folds every serial register wire into its device and returns the
    /// wires left for generic resolution, in order, with their original index.
    pub(super) fn fold_serial_wires<'w>(
        &mut self,
        wires: &'w [Wire],
    ) -> Result<Vec<(usize, &'w Wire)>, ConvertError> {
        let mut remaining = Vec::with_capacity(wires.len());
        for (wire_index, wire) in wires.iter().enumerate() {
            match self.serial.folding_target(wire) {
                Some((role, virtual_id, device_id)) => {
                    self.fold_into_device(wire_index, wire, role, virtual_id, device_id)?
                }
                None => remaining.push((wire_index, wire)),
            }
        }
        Ok(remaining)
    }

    fn fold_into_device(
        &mut self,
        wire_index: usize,
        wire: &Wire,
        role: SerialRole,
        virtual_id: &str,
        device_id: &str,
    ) -> Result<(), ConvertError> {
        let network = self.network;
        let device_name = self
            .index
            .get(device_id)
            .map(|device| device.name.clone())
            .ok_or_else(|| {
                unresolved_wire(
                    network,
                    wire_index,
                    wire,
                    format!(
                        "serial {} node '{}' is wired to unknown node '{}'",
                        role.table_name(),
                        virtual_id,
                        device_id
                    ),
                )
            })?;

        let Some(fragment) = self.serial.table_mut(role).get_mut(virtual_id) else {
            return Err(unresolved_wire(
                network,
                wire_index,
                wire,
                format!("serial node '{}' has no register fragment", virtual_id),
            ));
        };

        let registers = self
            .nodes
            .get_mut(&device_name)
            .and_then(|device| device.serial_registers_mut(fragment.field))
            .ok_or_else(|| {
                unresolved_wire(
                    network,
                    wire_index,
                    wire,
                    format!(
                        "serial register '{}' is wired to '{}', which is not a serial device",
                        fragment.name(),
                        device_name
                    ),
                )
            })?;

        registers.push(fragment.entry.to_value());
        tracing::debug!(
            network,
            device = %device_name,
            register = fragment.name(),
            field = fragment.field.as_str(),
            "folded serial register into device"
        );
        fragment.device_names.push(device_name);
        Ok(())
    }
}
