//! Node type registry.
//!
//! Every node tag the editor can place on the canvas is described here: its
//! input and output port names, its property schema and the default values
//! a freshly placed node starts with. Port layout is a pure function of the
//! tag and never varies per node instance.

use crate::graph::{Properties, PropertyValue};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Broad category of a node type, mirroring the editor palette groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFamily {
    Input,
    Process,
    Output,
    Unknown,
}

/// The closed set of node types known to the editor.
///
/// Tags that are not recognised (for example from a newer editor build) are
/// kept verbatim in `Unknown` so they survive import and can be mapped onto a
/// built-in type by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sensor,
    ModbusSensor,
    AnalogSensor,
    Constant,
    Calibration,
    Math,
    BinaryOp,
    BitShift,
    BitMask,
    Status,
    Telemetry,
    Unknown(String),
}

/// Default value of a schema entry. Kept `const`-friendly so the schema tables
/// can live in statics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Number(f64),
}

impl From<DefaultValue> for PropertyValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Text(s) => PropertyValue::Text(s.to_string()),
            DefaultValue::Number(n) => PropertyValue::Number(n),
        }
    }
}

/// One key of a node type's property schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub key: &'static str,
    /// `None` marks an optional key that new nodes do not carry.
    pub default: Option<DefaultValue>,
}

const fn text(key: &'static str, value: &'static str) -> PropertySpec {
    PropertySpec {
        key,
        default: Some(DefaultValue::Text(value)),
    }
}

const fn number(key: &'static str, value: f64) -> PropertySpec {
    PropertySpec {
        key,
        default: Some(DefaultValue::Number(value)),
    }
}

const fn optional(key: &'static str) -> PropertySpec {
    PropertySpec { key, default: None }
}

static SENSOR_PROPS: [PropertySpec; 6] = [
    text("register", "0xFA"),
    number("length", 3.0),
    text("decoder", "bme280_temp"),
    text("variable_name", "raw_temp"),
    optional("bus"),
    optional("address"),
];
static MODBUS_SENSOR_PROPS: [PropertySpec; 6] = [
    text("register", "40001"),
    number("length", 2.0),
    text("decoder", "modbus_float32_be"),
    text("variable_name", "modbus_value"),
    optional("bus"),
    optional("address"),
];
static ANALOG_SENSOR_PROPS: [PropertySpec; 6] = [
    text("register", "0x00"),
    number("length", 2.0),
    text("decoder", "raw_to_int"),
    text("variable_name", "analog_value"),
    optional("bus"),
    optional("address"),
];
static CONSTANT_PROPS: [PropertySpec; 2] = [text("name", "const_1"), number("value", 0.0)];
static CALIBRATION_PROPS: [PropertySpec; 2] =
    [text("expression", "$input * 1.0"), text("description", "")];
static MATH_PROPS: [PropertySpec; 2] = [text("function", "abs"), number("parameter", 0.0)];
static BINARY_OP_PROPS: [PropertySpec; 3] = [
    text("operation", "+"),
    text("input_a_name", "a"),
    text("input_b_name", "b"),
];
static BIT_SHIFT_PROPS: [PropertySpec; 2] = [text("operation", "<<"), number("shift_bits", 0.0)];
static BIT_MASK_PROPS: [PropertySpec; 2] = [text("mask", "0xFF"), text("operation", "&")];
static STATUS_PROPS: [PropertySpec; 3] = [
    text("sensor_id", "sensor_1"),
    text("sensor_type", "Sensor"),
    text("unit", "°C"),
];
static TELEMETRY_PROPS: [PropertySpec; 2] = [text("topic", "/topic"), text("field", "data")];

impl NodeKind {
    /// Every built-in type, in palette order.
    pub const BUILTIN: [NodeKind; 11] = [
        NodeKind::Sensor,
        NodeKind::ModbusSensor,
        NodeKind::AnalogSensor,
        NodeKind::Constant,
        NodeKind::Calibration,
        NodeKind::Math,
        NodeKind::BinaryOp,
        NodeKind::BitShift,
        NodeKind::BitMask,
        NodeKind::Status,
        NodeKind::Telemetry,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "input/sensor" => NodeKind::Sensor,
            "input/modbus_sensor" => NodeKind::ModbusSensor,
            "input/analog_sensor" => NodeKind::AnalogSensor,
            "input/constant" => NodeKind::Constant,
            "process/calibration" => NodeKind::Calibration,
            "process/math" => NodeKind::Math,
            "process/binary_op" => NodeKind::BinaryOp,
            "process/bit_shift" => NodeKind::BitShift,
            "process/bit_mask" => NodeKind::BitMask,
            "output/status" => NodeKind::Status,
            "output/telemetry" => NodeKind::Telemetry,
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Sensor => "input/sensor",
            NodeKind::ModbusSensor => "input/modbus_sensor",
            NodeKind::AnalogSensor => "input/analog_sensor",
            NodeKind::Constant => "input/constant",
            NodeKind::Calibration => "process/calibration",
            NodeKind::Math => "process/math",
            NodeKind::BinaryOp => "process/binary_op",
            NodeKind::BitShift => "process/bit_shift",
            NodeKind::BitMask => "process/bit_mask",
            NodeKind::Status => "output/status",
            NodeKind::Telemetry => "output/telemetry",
            NodeKind::Unknown(tag) => tag,
        }
    }

    pub fn family(&self) -> NodeFamily {
        match self {
            NodeKind::Sensor | NodeKind::ModbusSensor | NodeKind::AnalogSensor | NodeKind::Constant => {
                NodeFamily::Input
            }
            NodeKind::Calibration
            | NodeKind::Math
            | NodeKind::BinaryOp
            | NodeKind::BitShift
            | NodeKind::BitMask => NodeFamily::Process,
            NodeKind::Status | NodeKind::Telemetry => NodeFamily::Output,
            NodeKind::Unknown(_) => NodeFamily::Unknown,
        }
    }

    /// Raw register reads: the types that can populate `read.registers`.
    pub fn is_sensor(&self) -> bool {
        matches!(
            self,
            NodeKind::Sensor | NodeKind::ModbusSensor | NodeKind::AnalogSensor
        )
    }

    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Calibration | NodeKind::Math | NodeKind::BitShift | NodeKind::BitMask => {
                &["input"]
            }
            NodeKind::BinaryOp => &["a", "b"],
            NodeKind::Status | NodeKind::Telemetry => &["value"],
            _ => &[],
        }
    }

    pub fn outputs(&self) -> &'static [&'static str] {
        match self.family() {
            NodeFamily::Input => &["value"],
            NodeFamily::Process => &["result"],
            NodeFamily::Output | NodeFamily::Unknown => &[],
        }
    }

    /// Palette title shown on the node header.
    pub fn title(&self) -> &'static str {
        match self {
            NodeKind::Sensor => "Sensor Input",
            NodeKind::ModbusSensor => "Modbus Sensor",
            NodeKind::AnalogSensor => "Analog Sensor",
            NodeKind::Constant => "Constant",
            NodeKind::Calibration => "Calibration",
            NodeKind::Math => "Math Function",
            NodeKind::BinaryOp => "Binary Operation",
            NodeKind::BitShift => "Bit Shift",
            NodeKind::BitMask => "Bit Mask",
            NodeKind::Status => "Status Output",
            NodeKind::Telemetry => "Telemetry Output",
            NodeKind::Unknown(_) => "Node",
        }
    }

    pub fn property_specs(&self) -> &'static [PropertySpec] {
        match self {
            NodeKind::Sensor => &SENSOR_PROPS,
            NodeKind::ModbusSensor => &MODBUS_SENSOR_PROPS,
            NodeKind::AnalogSensor => &ANALOG_SENSOR_PROPS,
            NodeKind::Constant => &CONSTANT_PROPS,
            NodeKind::Calibration => &CALIBRATION_PROPS,
            NodeKind::Math => &MATH_PROPS,
            NodeKind::BinaryOp => &BINARY_OP_PROPS,
            NodeKind::BitShift => &BIT_SHIFT_PROPS,
            NodeKind::BitMask => &BIT_MASK_PROPS,
            NodeKind::Status => &STATUS_PROPS,
            NodeKind::Telemetry => &TELEMETRY_PROPS,
            NodeKind::Unknown(_) => &[],
        }
    }

    /// Property bag a newly placed node of this type starts with.
    pub fn default_properties(&self) -> Properties {
        self.property_specs()
            .iter()
            .filter_map(|spec| spec.default.map(|d| (spec.key, PropertyValue::from(d))))
            .collect()
    }

    /// Whether `key` belongs to this type's schema. Unknown types have no
    /// schema and accept anything.
    pub fn accepts_property(&self, key: &str) -> bool {
        match self {
            NodeKind::Unknown(_) => true,
            _ => self.property_specs().iter().any(|spec| spec.key == key),
        }
    }
}

impl FromStr for NodeKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeKind::from_tag(s))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_for_builtins() {
        for kind in NodeKind::BUILTIN {
            assert_eq!(NodeKind::from_tag(kind.tag()), kind);
        }
        assert_eq!(
            NodeKind::from_tag("process/filter"),
            NodeKind::Unknown("process/filter".to_string())
        );
    }

    #[test]
    fn port_layout_depends_only_on_type() {
        assert_eq!(NodeKind::BinaryOp.inputs(), ["a", "b"]);
        assert_eq!(NodeKind::BinaryOp.outputs(), ["result"]);
        assert!(NodeKind::Sensor.inputs().is_empty());
        assert_eq!(NodeKind::Constant.outputs(), ["value"]);
        assert!(NodeKind::Telemetry.outputs().is_empty());
    }

    #[test]
    fn sensor_defaults_leave_bus_unset() {
        let props = NodeKind::Sensor.default_properties();
        assert_eq!(props.text("variable_name").as_deref(), Some("raw_temp"));
        assert_eq!(props.number("length"), Some(3.0));
        assert!(!props.contains_key("bus"));
        assert!(NodeKind::Sensor.accepts_property("bus"));
        assert!(!NodeKind::Sensor.accepts_property("topic"));
    }
}
