use serde_json::{Number, Value, json};

/// Which virtual serial node produced a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialRole {
    Read,
    Write,
    Set,
}

impl SerialRole {
    pub fn table_name(self) -> &'static str {
        match self {
            SerialRole::Read => "reads",
            SerialRole::Write => "writes",
            SerialRole::Set => "sets",
        }
    }
}

/// The list fields of a serial device's `config.device` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterField {
    CyclicWriteRegs,
    CyclicReadRegs,
    AsyncWriteRegs,
    AsyncReadRegs,
    Set,
}

impl RegisterField {
    /// In the order they appear in a device config.
    pub const ALL: [RegisterField; 5] = [
        RegisterField::CyclicWriteRegs,
        RegisterField::CyclicReadRegs,
        RegisterField::AsyncWriteRegs,
        RegisterField::AsyncReadRegs,
        RegisterField::Set,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegisterField::CyclicWriteRegs => "cyclic_write_regs",
            RegisterField::CyclicReadRegs => "cyclic_read_regs",
            RegisterField::AsyncWriteRegs => "async_write_regs",
            RegisterField::AsyncReadRegs => "async_read_regs",
            RegisterField::Set => "set",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterEntry {
    Async {
        name: String,
        update_rate_cycles: Number,
    },
    Cyclic {
        name: String,
        cyclic_index: Number,
        sync_with_node: bool,
    },
    Set {
        name: String,
        value: f64,
    },
}

impl RegisterEntry {
    pub fn name(&self) -> &str {
        match self {
            RegisterEntry::Async { name, .. }
            | RegisterEntry::Cyclic { name, .. }
            | RegisterEntry::Set { name, .. } => name,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RegisterEntry::Async {
                name,
                update_rate_cycles,
            } => json!({
                "name": name,
                "update_rate_cycles": update_rate_cycles,
            }),
            RegisterEntry::Cyclic {
                name,
                cyclic_index,
                sync_with_node,
            } => json!({
                "name": name,
                "cyclic_index": cyclic_index,
                "sync_with_node": sync_with_node,
            }),
            RegisterEntry::Set { name, value } => json!({
                "name": name,
                "value": value,
            }),
        }
    }
}

/// A register entry waiting to be folded into the device(s) it is wired to.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialFragment {
    pub role: SerialRole,
    pub field: RegisterField,
    pub entry: RegisterEntry,
    /// Resolved names of the devices this fragment was folded into, in wire order.
    pub device_names: Vec<String>,
}

impl SerialFragment {
    pub fn new(role: SerialRole, field: RegisterField, entry: RegisterEntry) -> Self {
        Self {
            role,
            field,
            entry,
            device_names: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }
}
