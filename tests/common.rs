//! Common test utilities for building editor networks and documents.
use osrc_netconv::document::{GlobalVariable, NodeGraph};
use osrc_netconv::prelude::*;
use serde_json::{Value, json};

/// Builds a network with the editor's usual header fields.
#[allow(dead_code)]
pub fn network(name: &str, nodes: Vec<RawNode>, wires: Vec<Wire>) -> NetworkDocument {
    NetworkDocument {
        name: name.to_string(),
        enabled: true,
        dynamic_enable_starting: false,
        net_type: "Cyclic".to_string(),
        timeout: 1000,
        update_cycle_trigger_count: 1,
        execution_index: 0,
        nodes: NodeGraph { nodes, wires },
    }
}

#[allow(dead_code)]
pub fn document(networks: Vec<NetworkDocument>) -> InputDocument {
    InputDocument {
        info: json!({ "version": "1.2.0" }),
        set_node_vars: Vec::new(),
        networks,
    }
}

#[allow(dead_code)]
pub fn global(name: &str, pin_type: &str) -> GlobalVariable {
    GlobalVariable {
        name: name.to_string(),
        pin_type: pin_type.to_string(),
    }
}

#[allow(dead_code)]
pub fn constant(id: &str, name: &str, itype: &str, value: Value) -> RawNode {
    RawNode::new(
        id,
        "Constant",
        json!({ "itype": itype, "value": value, "node_name": name }),
    )
}

#[allow(dead_code)]
pub fn api_output(id: &str, name: &str, itype: &str) -> RawNode {
    RawNode::new(id, "ApiOutput", json!({ "itype": itype, "node_name": name }))
}

#[allow(dead_code)]
pub fn api_input(id: &str, name: &str, itype: &str) -> RawNode {
    RawNode::new(id, "ApiInput", json!({ "itype": itype, "node_name": name }))
}

#[allow(dead_code)]
pub fn serial_device(id: &str, name: &str) -> RawNode {
    RawNode::new(
        id,
        "SerialDevice",
        json!({
            "enabled": true,
            "addr": 3,
            "timeout": 5,
            "descriptor": "motor_driver",
            "node_name": name,
        }),
    )
}

#[allow(dead_code)]
pub fn async_read(id: &str, name: &str, update_cycles: u64) -> RawNode {
    RawNode::new(
        id,
        "SerialRead",
        json!({ "name": name, "dev": { "AsyncReg": { "update_cycles": update_cycles } } }),
    )
}

#[allow(dead_code)]
pub fn cyclic_write(id: &str, name: &str, cyclic_index: u64) -> RawNode {
    RawNode::new(
        id,
        "SerialWrite",
        json!({
            "name": name,
            "dev": { "CyclicReg": { "sync_node": true, "cyclic_index": cyclic_index } },
        }),
    )
}

#[allow(dead_code)]
pub fn serial_set(id: &str, name: &str, value: Value) -> RawNode {
    RawNode::new(id, "SerialSet", json!({ "name": name, "value": value }))
}

/// The same document in the editor's on-disk JSON form: one network with a
/// constant driving an API output, wire ids written as numbers.
#[allow(dead_code)]
pub fn editor_json() -> String {
    json!({
        "info": { "version": "1.2.0", "author": "cell-3" },
        "set_node_vars": [
            { "name": "speed_limit", "pin_type": "F64" },
            { "name": "armed", "pin_type": "Bool" }
        ],
        "networks": [
            {
                "name": "main",
                "enabled": true,
                "dynamic_enable_starting": false,
                "net_type": "Cyclic",
                "timeout": 1000,
                "update_cycle_trigger_count": 1,
                "execution_index": 0,
                "nodes": {
                    "nodes": {
                        "1": {
                            "value": { "Constant": { "itype": "F64", "value": "2+3*4", "node_name": "gain" } },
                            "position": [10.0, 20.0]
                        },
                        "2": {
                            "value": { "ApiOutput": { "itype": "F64", "node_name": "gain_out" } },
                            "position": [120.0, 20.0]
                        }
                    },
                    "wires": [
                        { "out_pin": { "node": 1, "output": 0 }, "in_pin": { "node": 2, "input": 0 } }
                    ]
                }
            },
            {
                "name": "aux",
                "enabled": false,
                "net_type": "Async",
                "timeout": 500,
                "update_cycle_trigger_count": 10,
                "execution_index": 1,
                "nodes": {
                    "nodes": {
                        "7": { "value": { "EdgeDetect": { "rising_edge": true } } }
                    },
                    "wires": []
                }
            }
        ]
    })
    .to_string()
}
