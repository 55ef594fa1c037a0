//! Physical parameter tables for the arm kinematics (`Kins`) and the
//! teleoperation input arm (`Mouse`).
//!
//! These are fixed per installation and are not part of the editor payload.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Denavit-Hartenberg parameters of one joint (degrees, metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DhParam {
    pub alpha: f64,
    pub a: f64,
    pub d: f64,
    pub theta: f64,
}

/// Position, velocity and acceleration limits of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisLimit {
    pub min_pos: i32,
    pub max_pos: i32,
    pub max_vel: i32,
    pub max_acc: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToolOffset {
    pub position: [f64; 3],
    pub orientation: [f64; 3],
}

/// Encoder counts per joint revolution.
///
/// Geared motors carry a fractional ratio; direct encoders are written as
/// plain integers, negative when the encoder runs reversed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CountPerRev {
    Geared(f64),
    Encoder(i32),
}

/// Encoder calibration of one motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointCalibration {
    pub count_per_rev: CountPerRev,
    pub home_pos: i32,
}

const fn dh(alpha: f64, a: f64, d: f64, theta: f64) -> DhParam {
    DhParam { alpha, a, d, theta }
}

const fn limit(min_pos: i32, max_pos: i32, max_vel: i32, max_acc: i32) -> AxisLimit {
    AxisLimit {
        min_pos,
        max_pos,
        max_vel,
        max_acc,
    }
}

pub const KINS_DH_PARAMS: [DhParam; 6] = [
    dh(-90.0, 0.150, 0.0, 0.0),
    dh(0.0, 0.570, 0.0, -90.0),
    dh(-90.0, 0.130, 0.0, 0.0),
    dh(90.0, 0.0, 0.640, 0.0),
    dh(-90.0, 0.0, 0.0, 90.0),
    dh(0.0, 0.0, 0.095, 0.0),
];

/// Joint limits in degrees, degrees/s and percent acceleration.
pub const KINS_JOINT_LIMITS: [AxisLimit; 6] = [
    limit(-90, 90, 140, 100),
    limit(-90, 90, 160, 100),
    limit(-78, 90, 170, 100),
    limit(0, 0, 335, 100),
    limit(-45, 225, 335, 100),
    limit(0, 0, 500, 100),
];

/// Cartesian limits: mm, m/s, m/s^2 for translation; degrees for rotation.
pub const KINS_CARTESIAN_LIMITS: [(&str, AxisLimit); 6] = [
    ("x", limit(-1000, 1000, 1, 10)),
    ("y", limit(-1000, 1000, 1, 10)),
    ("z", limit(-1000, 1000, 1, 10)),
    ("xangle", limit(-180, 180, 300, 100)),
    ("yangle", limit(-180, 180, 300, 100)),
    ("zangle", limit(-180, 180, 300, 100)),
];

pub const KINS_MAX_JOG_SPEED: f64 = 0.1;

pub const KINS_TOOLS: [ToolOffset; 3] = [
    // marker, offset to match the mouse pen tip
    ToolOffset {
        position: [0.02, 0.0, 0.037],
        orientation: [0.0, 0.0, 0.0],
    },
    // stamp
    ToolOffset {
        position: [0.0, 0.0, 0.1],
        orientation: [0.0, 0.0, 0.0],
    },
    // foam block holder
    ToolOffset {
        position: [0.02, 0.0, 0.046],
        orientation: [0.0, 0.0, 0.0],
    },
];

pub const KINS_INPUTS: [&str; 25] = [
    "j1_fbk_pos",
    "j2_fbk_pos",
    "j3_fbk_pos",
    "j4_fbk_pos",
    "j5_fbk_pos",
    "j6_fbk_pos",
    "j1_cmd_pos",
    "j2_cmd_pos",
    "j3_cmd_pos",
    "j4_cmd_pos",
    "j5_cmd_pos",
    "j6_cmd_pos",
    "x_cmd_pos",
    "y_cmd_pos",
    "z_cmd_pos",
    "xangle_cmd_pos",
    "yangle_cmd_pos",
    "zangle_cmd_pos",
    "jog_axis_select",
    "jog_vel",
    "jog_mode",
    "control_mode",
    "speed_override",
    "tool_select",
    "reset",
];

pub const KINS_OUTPUTS: [&str; 12] = [
    "j1_cmd_pos",
    "j2_cmd_pos",
    "j3_cmd_pos",
    "j4_cmd_pos",
    "j5_cmd_pos",
    "j6_cmd_pos",
    "x_fbk_pos",
    "y_fbk_pos",
    "z_fbk_pos",
    "xangle_fbk_pos",
    "yangle_fbk_pos",
    "zangle_fbk_pos",
];

pub const MOUSE_DH_PARAMS: [DhParam; 6] = [
    dh(-90.0, 0.0, 0.0, 0.0),
    dh(0.0, 0.210, 0.0, -90.0),
    dh(-90.0, 0.0, 0.0, 0.0),
    dh(90.0, 0.0, 0.210, 0.0),
    dh(-90.0, 0.0, 0.0, 90.0),
    dh(0.0, 0.0, 0.0, 0.0),
];

/// Quadrature counts per output revolution of the 57:13 geared motors.
pub const GEAR_MOTOR_COUNT_PER_REV: f64 = 57.0 / 13.0 * 1000.0 * 4.0;

pub const MOUSE_JOINT_PARAMS: [JointCalibration; 6] = [
    JointCalibration {
        count_per_rev: CountPerRev::Geared(GEAR_MOTOR_COUNT_PER_REV * 14.0),
        home_pos: 53000,
    },
    JointCalibration {
        count_per_rev: CountPerRev::Geared(GEAR_MOTOR_COUNT_PER_REV * 11.56),
        home_pos: -42000,
    },
    JointCalibration {
        count_per_rev: CountPerRev::Geared(GEAR_MOTOR_COUNT_PER_REV * 11.56),
        home_pos: -56300,
    },
    JointCalibration {
        count_per_rev: CountPerRev::Encoder(2048),
        home_pos: -49,
    },
    JointCalibration {
        count_per_rev: CountPerRev::Encoder(-2048),
        home_pos: -57,
    },
    JointCalibration {
        count_per_rev: CountPerRev::Encoder(-2048),
        home_pos: 1024,
    },
];

pub const MOUSE_INPUTS: [&str; 6] = [
    "j1_fbk_pos",
    "j2_fbk_pos",
    "j3_fbk_pos",
    "j4_fbk_pos",
    "j5_fbk_pos",
    "j6_fbk_pos",
];

pub const MOUSE_OUTPUTS: [&str; 6] = [
    "x_fbk_pos",
    "y_fbk_pos",
    "z_fbk_pos",
    "xangle_fbk_pos",
    "yangle_fbk_pos",
    "zangle_fbk_pos",
];

pub fn kins_config() -> Map<String, Value> {
    let limits: Map<String, Value> = KINS_JOINT_LIMITS
        .iter()
        .enumerate()
        .map(|(i, l)| (i.to_string(), json!(l)))
        .collect();
    let cartesian_limits: Map<String, Value> = KINS_CARTESIAN_LIMITS
        .iter()
        .map(|(axis, l)| (axis.to_string(), json!(l)))
        .collect();

    let mut config = Map::new();
    config.insert("dh_params".to_string(), json!(KINS_DH_PARAMS));
    config.insert("limits".to_string(), Value::Object(limits));
    config.insert("max_jog_speed".to_string(), json!(KINS_MAX_JOG_SPEED));
    config.insert("cartesian_limits".to_string(), Value::Object(cartesian_limits));
    config.insert("tools".to_string(), json!(KINS_TOOLS));
    config
}

pub fn mouse_config() -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("dh_params".to_string(), json!(MOUSE_DH_PARAMS));
    config.insert("joint_params".to_string(), json!(MOUSE_JOINT_PARAMS));
    config
}
