//! One translation function per node type.
//!
//! Each takes the decoded payload and the raw node id and returns either a
//! concrete runtime node with its pin table, or a serial register fragment.

use super::fixtures;
use super::payload::*;
use super::pins::PinTable;
use super::serial::{RegisterEntry, RegisterField, SerialFragment, SerialRole};
use super::{NodeTag, Translation};
use crate::document::OutputNode;
use crate::error::ConvertError;
use crate::expression;
use crate::naming::camel_to_snake;
use serde_json::{Map, Value, json};

/// Upper bound on multiplexer select bits (2^16 data inputs).
pub const MAX_SELECT_BITS: u32 = 16;

/// Upper bound on the input count of logic gates and N-ary math operations.
pub const MAX_INPUT_COUNT: usize = 256;

/// Snaps a raw bit count up to the nearest supported word width.
///
/// Returns the width and the runtime element type, or `None` above 32 bits.
pub fn snap_bit_width(num_bits: u32) -> Option<(usize, &'static str)> {
    match num_bits {
        0..=8 => Some((8, "uint8")),
        9..=16 => Some((16, "uint16")),
        17..=32 => Some((32, "uint32")),
        _ => None,
    }
}

/// A config object with its fields in the given order.
fn config<const N: usize>(fields: [(&str, Value); N]) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn input_count(tag: NodeTag, count: usize, raw_id: &str) -> Result<usize, ConvertError> {
    if count > MAX_INPUT_COUNT {
        return Err(ConvertError::malformed(
            raw_id,
            tag.as_str(),
            format!(
                "{} inputs exceeds the supported maximum of {}",
                count, MAX_INPUT_COUNT
            ),
        ));
    }
    Ok(count)
}

pub(super) fn constant(p: ConstantPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value_type = p.itype.require_runtime(raw_id)?;
    let value = if value_type == "bool" {
        Value::Bool(constant_bool(&p.value).ok_or_else(|| {
            ConvertError::malformed(
                raw_id,
                NodeTag::Constant.as_str(),
                format!("'{:?}' is not a boolean constant", p.value),
            )
        })?)
    } else {
        Value::from(constant_number(&p.value, raw_id)?)
    };

    Ok(Translation::node(
        p.node_name,
        "constant",
        config([("type", value_type.into()), ("value", value)]),
        PinTable::new().output("output"),
    ))
}

fn constant_bool(value: &Scalar) -> Option<bool> {
    match value {
        Scalar::Bool(b) => Some(*b),
        Scalar::Number(n) if *n == 1.0 => Some(true),
        Scalar::Number(n) if *n == 0.0 => Some(false),
        Scalar::Number(_) => None,
        Scalar::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    }
}

fn constant_number(value: &Scalar, raw_id: &str) -> Result<f64, ConvertError> {
    let tag = NodeTag::Constant.as_str();
    match value {
        Scalar::Number(n) if n.is_finite() => Ok(*n),
        Scalar::Number(n) => Err(ConvertError::malformed(
            raw_id,
            tag,
            format!("constant value {} is not finite", n),
        )),
        Scalar::Text(source) => expression::evaluate(source).map_err(|e| {
            ConvertError::malformed(raw_id, tag, format!("invalid expression '{}': {}", source, e))
        }),
        Scalar::Bool(b) => Err(ConvertError::malformed(
            raw_id,
            tag,
            format!("boolean {} given for a numeric constant", b),
        )),
    }
}

pub(super) fn api_input(p: ApiInputPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let mut inner = Map::new();
    inner.insert("type".into(), p.itype.require_runtime(raw_id)?.into());
    let optional = [
        ("min", p.min),
        ("max", p.max),
        ("default", p.default),
        ("timeout", p.timeout),
    ];
    // Present fields are copied even when null; absent ones stay absent.
    for (field, value) in optional {
        if let Some(value) = value {
            inner.insert(field.into(), value.map_or(Value::Null, Value::Number));
        }
    }

    Ok(Translation::node(
        p.node_name,
        "api_input",
        config([("config", Value::Object(inner))]),
        PinTable::new().output("output"),
    ))
}

pub(super) fn api_output(p: ApiOutputPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value_type = p.itype.require_runtime(raw_id)?;
    Ok(Translation::node(
        p.node_name,
        "api_output",
        config([("type", value_type.into())]),
        PinTable::new().input("input"),
    ))
}

pub(super) fn pi_controller(
    p: PiControllerPayload,
    _raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(Translation::node(
        p.node_name,
        "pi_controller",
        config([
            ("Kp", p.p.into()),
            ("Ki", p.i.into()),
            ("i_limit", p.i_limit.into()),
            ("output_min", p.output_min.into()),
            ("output_max", p.output_max.into()),
        ]),
        PinTable::new()
            .input("input")
            .input("reset")
            .output("output")
            .output("saturation"),
    ))
}

pub(super) fn vel_estimator(
    p: VelEstimatorPayload,
    raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(Translation::anonymous(
        raw_id,
        "vel_estimator",
        config([("alpha", p.alpha.into())]),
        PinTable::new().input("input").output("output"),
    ))
}

pub(super) fn logic_gate(p: LogicGatePayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let (gate_type, count) = p.gtype.layout();
    let count = input_count(NodeTag::LogicGate, count, raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "logic_gate",
        config([
            ("gate_type", gate_type.into()),
            ("input_count", count.into()),
        ]),
        PinTable::new().numbered_inputs("input", count).output("output"),
    ))
}

pub(super) fn comparator(p: ComparatorPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value_type = p.itype.require_runtime(raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "comparator",
        config([
            ("type", value_type.into()),
            ("comparator_type", camel_to_snake(&p.comparison).into()),
        ]),
        PinTable::new()
            .input("input_0")
            .input("input_1")
            .output("output"),
    ))
}

pub(super) fn math_operation(
    p: MathOperationPayload,
    raw_id: &str,
) -> Result<Translation, ConvertError> {
    let mut cfg = Map::new();
    cfg.insert("type".into(), p.itype.require_runtime(raw_id)?.into());

    let count = match &p.operator {
        MathOperator::Nary(op, count) => {
            let count = input_count(NodeTag::MathOperation, *count, raw_id)?;
            cfg.insert("op_type".into(), "nary".into());
            cfg.insert("op".into(), op.to_lowercase().into());
            cfg.insert("input_count".into(), count.into());
            count
        }
        MathOperator::BinaryOperation(op) => {
            cfg.insert("op_type".into(), "binary".into());
            cfg.insert("op".into(), op.to_lowercase().into());
            2
        }
        MathOperator::UnaryOperation(op) => {
            cfg.insert("op_type".into(), "unary".into());
            cfg.insert("op".into(), op.to_lowercase().into());
            1
        }
    };

    Ok(Translation::anonymous(
        raw_id,
        "math_operation",
        cfg,
        PinTable::new().numbered_inputs("input", count).output("output"),
    ))
}

pub(super) fn multiplexer(
    p: MultiplexerPayload,
    raw_id: &str,
) -> Result<Translation, ConvertError> {
    if p.input_bits > MAX_SELECT_BITS {
        return Err(ConvertError::malformed(
            raw_id,
            NodeTag::Multiplexer.as_str(),
            format!(
                "{} select bits exceeds the supported maximum of {}",
                p.input_bits, MAX_SELECT_BITS
            ),
        ));
    }
    let bits = p.input_bits as usize;
    let value_type = p.itype.require_runtime(raw_id)?;

    Ok(Translation::anonymous(
        raw_id,
        "multiplexer",
        config([("input_bits", bits.into()), ("type", value_type.into())]),
        PinTable::new()
            .numbered_inputs("select_bit", bits)
            .numbered_inputs("input", 1 << bits)
            .output("output"),
    ))
}

fn bit_width(
    tag: NodeTag,
    num_bits: u32,
    raw_id: &str,
) -> Result<(usize, &'static str), ConvertError> {
    snap_bit_width(num_bits).ok_or_else(|| {
        ConvertError::malformed(
            raw_id,
            tag.as_str(),
            format!("{} bits is wider than the supported 32", num_bits),
        )
    })
}

pub(super) fn bitwise_split(p: BitwisePayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let (bits, value_type) = bit_width(NodeTag::BitwiseSplit, p.num_bits, raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "bitwise_split",
        config([("type", value_type.into())]),
        PinTable::new()
            .input("input")
            .numbered_outputs("output_bit", bits),
    ))
}

pub(super) fn bitwise_join(p: BitwisePayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let (bits, value_type) = bit_width(NodeTag::BitwiseJoin, p.num_bits, raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "bitwise_join",
        config([("type", value_type.into())]),
        PinTable::new()
            .numbered_inputs("input_bit", bits)
            .output("output"),
    ))
}

pub(super) fn edge_delay(p: EdgeDelayPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    Ok(Translation::anonymous(
        raw_id,
        "edge_delay",
        config([
            ("rising_edge", p.rising_edge.into()),
            ("falling_edge", (!p.rising_edge).into()),
            ("cycles", p.cycles.into()),
        ]),
        PinTable::new().input("input").output("output"),
    ))
}

pub(super) fn edge_detect(p: EdgeDetectPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    Ok(Translation::anonymous(
        raw_id,
        "edge_detect",
        config([
            ("rising_edge", p.rising_edge.into()),
            ("falling_edge", (!p.rising_edge).into()),
        ]),
        PinTable::new().input("input").output("output"),
    ))
}

pub(super) fn cycle_delay(p: CycleDelayPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value_type = p.itype.require_runtime(raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "cycle_delay",
        config([("cycles", p.cycles.into()), ("type", value_type.into())]),
        PinTable::new().input("input").output("output"),
    ))
}

/// A blank bound means zero; anything else must parse as a finite number.
fn converter_bound(value: &Scalar, field: &str, raw_id: &str) -> Result<f64, ConvertError> {
    let parsed = match value {
        Scalar::Text(text) if text.is_empty() => Some(0.0),
        Scalar::Text(text) => text.trim().parse::<f64>().ok(),
        Scalar::Number(n) => Some(*n),
        Scalar::Bool(_) => None,
    };
    parsed.filter(|n| n.is_finite()).ok_or_else(|| {
        ConvertError::malformed(
            raw_id,
            NodeTag::Converter.as_str(),
            format!("invalid {} value: {:?}", field, value),
        )
    })
}

pub(super) fn converter(p: ConverterPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let bounds = [
        ("input_min", converter_bound(&p.input_min, "input_min", raw_id)?),
        ("input_max", converter_bound(&p.input_max, "input_max", raw_id)?),
        ("output_min", converter_bound(&p.output_min, "output_min", raw_id)?),
        ("output_max", converter_bound(&p.output_max, "output_max", raw_id)?),
    ];

    let mut cfg = config([
        ("input_type", p.input_type.require_runtime(raw_id)?.into()),
        ("output_type", p.output_type.require_runtime(raw_id)?.into()),
        ("mode", "direct".into()),
        ("invert", p.invert.into()),
    ]);
    if !p.direct_mode {
        for (field, value) in bounds {
            cfg.insert(field.into(), Value::from(value));
        }
        cfg.insert("mode".into(), "scale".into());
    }

    Ok(Translation::anonymous(
        raw_id,
        "converter",
        cfg,
        PinTable::new().input("input").output("output"),
    ))
}

pub(super) fn print(p: PrintPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value_type = p.itype.require_runtime(raw_id)?;
    Ok(Translation::anonymous(
        raw_id,
        "print",
        config([("name", p.name.into()), ("type", value_type.into())]),
        PinTable::new().input("input").input("enable"),
    ))
}

pub(super) fn kins(p: NamedPayload, _raw_id: &str) -> Result<Translation, ConvertError> {
    Ok(Translation::node(
        p.name,
        "kins",
        fixtures::kins_config(),
        PinTable::new()
            .inputs_from(fixtures::KINS_INPUTS)
            .outputs_from(fixtures::KINS_OUTPUTS),
    ))
}

pub(super) fn mouse(p: NamedPayload, _raw_id: &str) -> Result<Translation, ConvertError> {
    Ok(Translation::node(
        p.name,
        "mouse",
        fixtures::mouse_config(),
        PinTable::new()
            .inputs_from(fixtures::MOUSE_INPUTS)
            .outputs_from(fixtures::MOUSE_OUTPUTS),
    ))
}

pub(super) fn serial_device(
    p: SerialDevicePayload,
    _raw_id: &str,
) -> Result<Translation, ConvertError> {
    let mut device = Map::new();
    device.insert("device_descriptor".into(), p.descriptor.into());
    for field in RegisterField::ALL {
        device.insert(field.as_str().into(), Value::Array(Vec::new()));
    }

    let cfg = config([
        ("enabled", p.enabled.into()),
        (
            "comm",
            json!({
                "device_address": p.addr,
                "timeout_tries": p.timeout,
            }),
        ),
        ("device", Value::Object(device)),
    ]);

    // Register ports are not known here; wires to the virtual serial nodes
    // are rewritten onto the device during assembly.
    Ok(Translation::node(
        p.node_name,
        OutputNode::SERIAL_DEVICE_TYPE,
        cfg,
        PinTable::new().input("em_device"),
    ))
}

fn register_fragment(role: SerialRole, p: SerialRegisterPayload) -> Translation {
    let (field, entry) = match p.dev {
        SerialRegister::AsyncReg { update_cycles } => (
            match role {
                SerialRole::Write => RegisterField::AsyncWriteRegs,
                _ => RegisterField::AsyncReadRegs,
            },
            RegisterEntry::Async {
                name: p.name,
                update_rate_cycles: update_cycles,
            },
        ),
        SerialRegister::CyclicReg {
            sync_node,
            cyclic_index,
        } => (
            match role {
                SerialRole::Write => RegisterField::CyclicWriteRegs,
                _ => RegisterField::CyclicReadRegs,
            },
            RegisterEntry::Cyclic {
                name: p.name,
                cyclic_index,
                sync_with_node: sync_node,
            },
        ),
    };
    Translation::Serial(SerialFragment::new(role, field, entry))
}

pub(super) fn serial_read(
    p: SerialRegisterPayload,
    _raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(register_fragment(SerialRole::Read, p))
}

pub(super) fn serial_write(
    p: SerialRegisterPayload,
    _raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(register_fragment(SerialRole::Write, p))
}

pub(super) fn serial_set(p: SerialSetPayload, raw_id: &str) -> Result<Translation, ConvertError> {
    let value = match &p.value {
        Scalar::Number(n) => Some(*n),
        Scalar::Text(text) => text.trim().parse::<f64>().ok(),
        Scalar::Bool(_) => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| {
        ConvertError::malformed(
            raw_id,
            NodeTag::SerialSet.as_str(),
            format!("set value {:?} is not a number", p.value),
        )
    })?;

    Ok(Translation::Serial(SerialFragment::new(
        SerialRole::Set,
        RegisterField::Set,
        RegisterEntry::Set {
            name: p.name,
            value,
        },
    )))
}

pub(super) fn get_global_variable(
    p: NamedPayload,
    raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(Translation::anonymous(
        raw_id,
        "get_global_variable",
        config([("variables", json!({ "output": p.name }))]),
        PinTable::new().output("output"),
    ))
}

pub(super) fn set_global_variable(
    p: NamedPayload,
    raw_id: &str,
) -> Result<Translation, ConvertError> {
    Ok(Translation::anonymous(
        raw_id,
        "set_global_variable",
        config([("variables", json!({ "input": p.name }))]),
        PinTable::new().input("input").input("input_enable"),
    ))
}
