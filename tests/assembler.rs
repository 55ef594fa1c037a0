mod common;

use common::*;
use osrc_netconv::prelude::*;
use osrc_netconv::translator::RegisterField;
use serde_json::json;

fn assemble(network: &NetworkDocument) -> std::result::Result<OutputNetwork, ConvertError> {
    let registry = TagRegistry::new();
    NetworkAssembler::new(&registry).assemble(network)
}

fn connection(src_node: &str, src_port: &str, dst_node: &str, dst_port: &str) -> Connection {
    Connection {
        src_node: src_node.to_string(),
        src_port: src_port.to_string(),
        dst_node: dst_node.to_string(),
        dst_port: dst_port.to_string(),
    }
}

#[test]
fn test_plain_wire_resolves_to_port_names() {
    let net = network(
        "main",
        vec![
            constant("1", "gain", "F64", json!("1.5")),
            api_output("2", "gain_out", "F64"),
        ],
        vec![Wire::new("1", 0, "2", 0)],
    );

    let assembled = assemble(&net).unwrap();
    assert_eq!(assembled.nodes.len(), 2);
    assert_eq!(
        assembled.nodes.keys().collect::<Vec<_>>(),
        vec!["gain", "gain_out"]
    );
    assert_eq!(assembled.connections.len(), 1);
    assert_eq!(
        assembled.connections[&0usize],
        connection("gain", "output", "gain_out", "input")
    );
}

#[test]
fn test_network_header_fields() {
    let mut net = network("main", vec![], vec![]);
    net.net_type = "Cyclic".to_string();
    net.enabled = false;
    net.dynamic_enable_starting = true;
    net.timeout = 250;
    net.update_cycle_trigger_count = 4;
    net.execution_index = 3;

    let assembled = assemble(&net).unwrap();
    assert_eq!(assembled.network_type, "cyclic");
    assert!(!assembled.enable);
    assert!(assembled.dynamic_enable_starting);
    assert_eq!(assembled.timeout_usec, 250);
    assert_eq!(assembled.update_cycle_trigger_count, 4);
    assert_eq!(assembled.execution_order, 3);
    assert!(assembled.nodes.is_empty());
    assert!(assembled.connections.is_empty());
}

#[test]
fn test_async_read_folds_into_device() {
    // device -> read -> api output
    let net = network(
        "serial",
        vec![
            serial_device("10", "drive"),
            async_read("11", "position", 10),
            api_output("12", "position_out", "I32"),
        ],
        vec![Wire::new("10", 0, "11", 0), Wire::new("11", 0, "12", 0)],
    );

    let assembled = assemble(&net).unwrap();
    assert_eq!(assembled.nodes.len(), 2, "virtual read must not become a node");

    let device = &assembled.nodes["drive"];
    let reads = device.serial_registers(RegisterField::AsyncReadRegs).unwrap();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0], json!({ "name": "position", "update_rate_cycles": 10 }));
    assert_eq!(
        device
            .serial_registers(RegisterField::CyclicReadRegs)
            .map(Vec::len),
        Some(0)
    );

    assert_eq!(assembled.connections.len(), 1);
    assert_eq!(
        assembled.connections[&0usize],
        connection("drive", "position", "position_out", "input")
    );
}

#[test]
fn test_read_fans_out_to_every_device() {
    // device A, device B -> read -> api output
    let net = network(
        "serial",
        vec![
            serial_device("1", "left"),
            serial_device("2", "right"),
            async_read("3", "position", 10),
            api_output("4", "position_out", "I32"),
        ],
        vec![
            Wire::new("1", 0, "3", 0),
            Wire::new("2", 0, "3", 0),
            Wire::new("3", 0, "4", 0),
        ],
    );

    let assembled = assemble(&net).unwrap();
    assert_eq!(assembled.nodes.len(), 3);
    for device in ["left", "right"] {
        let reads = assembled.nodes[device]
            .serial_registers(RegisterField::AsyncReadRegs)
            .unwrap();
        assert_eq!(
            reads,
            &vec![json!({ "name": "position", "update_rate_cycles": 10 })]
        );
    }

    let connections: Vec<_> = assembled.connections.values().cloned().collect();
    assert_eq!(
        connections,
        vec![
            connection("left", "position", "position_out", "input"),
            connection("right", "position", "position_out", "input"),
        ]
    );
    assert_eq!(
        assembled.connections.keys().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn test_write_fans_out_to_every_device() {
    // api input -> write -> device A, device B
    let net = network(
        "serial",
        vec![
            api_input("1", "torque_cmd", "F32"),
            cyclic_write("2", "torque", 0),
            serial_device("3", "left"),
            serial_device("4", "right"),
        ],
        vec![
            Wire::new("1", 0, "2", 0),
            Wire::new("2", 0, "3", 0),
            Wire::new("2", 0, "4", 0),
        ],
    );

    let assembled = assemble(&net).unwrap();
    for device in ["left", "right"] {
        let writes = assembled.nodes[device]
            .serial_registers(RegisterField::CyclicWriteRegs)
            .unwrap();
        assert_eq!(
            writes,
            &vec![json!({ "name": "torque", "cyclic_index": 0, "sync_with_node": true })]
        );
    }

    let connections: Vec<_> = assembled.connections.values().cloned().collect();
    assert_eq!(
        connections,
        vec![
            connection("torque_cmd", "output", "left", "torque"),
            connection("torque_cmd", "output", "right", "torque"),
        ]
    );
    assert_eq!(
        assembled.connections.keys().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn test_set_folds_without_connections() {
    let net = network(
        "serial",
        vec![serial_device("1", "drive"), serial_set("2", "mode", json!(8))],
        vec![Wire::new("2", 0, "1", 0)],
    );

    let assembled = assemble(&net).unwrap();
    let sets = assembled.nodes["drive"]
        .serial_registers(RegisterField::Set)
        .unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["name"], json!("mode"));
    assert_eq!(sets[0]["value"].as_f64(), Some(8.0));
    assert!(assembled.connections.is_empty());
}

#[test]
fn test_wires_are_renumbered_after_folding() {
    let net = network(
        "mixed",
        vec![
            serial_device("1", "drive"),
            serial_set("2", "mode", json!(1)),
            constant("3", "k", "F64", json!(2)),
            api_output("4", "k_out", "F64"),
        ],
        vec![Wire::new("2", 0, "1", 0), Wire::new("3", 0, "4", 0)],
    );

    let assembled = assemble(&net).unwrap();
    assert_eq!(assembled.connections.len(), 1);
    assert_eq!(
        assembled.connections[&0usize],
        connection("k", "output", "k_out", "input")
    );
}

#[test]
fn test_duplicate_node_key() {
    let net = network(
        "main",
        vec![
            constant("1", "X", "F64", json!(1)),
            constant("2", "X", "F64", json!(2)),
        ],
        vec![],
    );

    let err = assemble(&net).unwrap_err();
    assert_eq!(
        err,
        ConvertError::DuplicateKey {
            kind: "node key".to_string(),
            key: "X".to_string(),
            scope: "network 'main'".to_string(),
        }
    );
}

#[test]
fn test_duplicate_raw_id() {
    let net = network(
        "main",
        vec![
            constant("1", "a", "F64", json!(1)),
            constant("1", "b", "F64", json!(2)),
        ],
        vec![],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::DuplicatePinReference { ref node_id, .. }) if node_id == "1"
    ));

    let net = network(
        "main",
        vec![
            async_read("5", "position", 1),
            async_read("5", "velocity", 1),
        ],
        vec![],
    );
    match assemble(&net).unwrap_err() {
        ConvertError::DuplicatePinReference { table, .. } => assert_eq!(table, "reads"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_wire_to_unknown_node() {
    let net = network(
        "main",
        vec![constant("1", "gain", "F64", json!(1))],
        vec![Wire::new("1", 0, "99", 0)],
    );
    match assemble(&net).unwrap_err() {
        ConvertError::UnresolvedWire {
            network,
            wire_index,
            dst_node,
            ..
        } => {
            assert_eq!(network, "main");
            assert_eq!(wire_index, 0);
            assert_eq!(dst_node, "99");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_wire_to_missing_pin() {
    let net = network(
        "main",
        vec![
            constant("1", "gain", "F64", json!(1)),
            api_output("2", "out", "F64"),
        ],
        vec![Wire::new("1", 0, "2", 1)],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::UnresolvedWire { dst_pin: 1, .. })
    ));

    let net = network(
        "main",
        vec![
            constant("1", "gain", "F64", json!(1)),
            api_output("2", "out", "F64"),
        ],
        vec![Wire::new("1", 3, "2", 0)],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::UnresolvedWire { src_pin: 3, .. })
    ));
}

#[test]
fn test_register_wired_to_non_device() {
    let net = network(
        "serial",
        vec![
            constant("1", "k", "F64", json!(1)),
            async_read("2", "position", 1),
        ],
        vec![Wire::new("1", 0, "2", 0)],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::UnresolvedWire { .. })
    ));
}

#[test]
fn test_unfolded_read_is_unresolved() {
    let net = network(
        "serial",
        vec![
            async_read("1", "position", 1),
            api_output("2", "position_out", "I32"),
        ],
        vec![Wire::new("1", 0, "2", 0)],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::UnresolvedWire { .. })
    ));
}

#[test]
fn test_read_wired_directly_to_write_is_rejected() {
    let net = network(
        "serial",
        vec![
            serial_device("1", "source"),
            serial_device("2", "sink"),
            async_read("3", "position", 1),
            cyclic_write("4", "target", 0),
        ],
        vec![
            Wire::new("1", 0, "3", 0),
            Wire::new("4", 0, "2", 0),
            Wire::new("3", 0, "4", 0),
        ],
    );
    match assemble(&net).unwrap_err() {
        ConvertError::UnresolvedWire { wire_index, .. } => assert_eq!(wire_index, 2),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_node_type() {
    let net = network(
        "main",
        vec![RawNode::new("1", "Oscilloscope", json!({}))],
        vec![],
    );
    assert!(matches!(
        assemble(&net),
        Err(ConvertError::UnsupportedTag { ref kind, .. }) if kind == "node type"
    ));
}
