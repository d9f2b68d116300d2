//! The compiled protocol document.
//!
//! A [`Document`] is the structured result of compiling a graph. Its section
//! order mirrors the emitted YAML and every symbol referenced by `calibrate`
//! or `map` is defined by an earlier register, constant or calibration entry.

use crate::graph::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;

mod artifact;
mod emitter;

pub use emitter::{quote, wrap_source};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text of the leading `#` comment line.
    pub header: String,
    pub id: String,
    pub device_type: String,
    pub bus: String,
    pub address: String,
    pub identify: Identify,
    pub read: ReadSection,
    pub constants: Vec<Constant>,
    pub calibrate: Vec<CalibrationEntry>,
    pub map: MapSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identify {
    pub whoami_reg: String,
    pub whoami_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadSection {
    pub interval_ms: u32,
    pub registers: Vec<Register>,
}

/// One raw register read performed by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    pub reg: String,
    pub len: u32,
    /// Decoder id, passed through verbatim.
    pub decode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    pub value: PropertyValue,
}

/// Where a calibration entry reads its operands from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalibrationSource {
    /// A single operand bound to `$input`.
    Single(String),
    /// Named operands, in port order. Unconnected ports are absent.
    Named(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    pub name: String,
    pub source: CalibrationSource,
    pub expr: String,
    pub description: Option<String>,
}

impl CalibrationEntry {
    /// Symbols this entry reads, in order.
    pub fn referenced_symbols(&self) -> Vec<&str> {
        match &self.source {
            CalibrationSource::Single(name) => vec![name.as_str()],
            CalibrationSource::Named(inputs) => inputs.iter().map(|(_, v)| v.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSection {
    pub status: Vec<StatusEntry>,
    pub telemetry: Vec<TelemetryTopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub sensor_id: String,
    pub sensor_type: String,
    /// Interpolation token such as `${calib_1}`, or empty when unconnected.
    pub value: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryTopic {
    pub topic: String,
    pub fields: Vec<TelemetryField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryField {
    pub field: String,
    pub value: String,
}

impl MapSection {
    /// Sets `topic`.`field`, overwriting an existing pair in place.
    pub fn set_telemetry(&mut self, topic: &str, field: &str, value: String) {
        let index = match self.telemetry.iter().position(|t| t.topic == topic) {
            Some(index) => index,
            None => {
                self.telemetry.push(TelemetryTopic {
                    topic: topic.to_string(),
                    fields: Vec::new(),
                });
                self.telemetry.len() - 1
            }
        };
        let fields = &mut self.telemetry[index].fields;
        match fields.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.value = value,
            None => fields.push(TelemetryField {
                field: field.to_string(),
                value,
            }),
        }
    }

    pub fn telemetry_value(&self, topic: &str, field: &str) -> Option<&str> {
        self.telemetry
            .iter()
            .find(|t| t.topic == topic)?
            .fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
    }
}

impl Document {
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.read.registers.iter().find(|r| r.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&PropertyValue> {
        self.constants.iter().find(|c| c.name == name).map(|c| &c.value)
    }

    pub fn calibration(&self, name: &str) -> Option<&CalibrationEntry> {
        self.calibrate.iter().find(|c| c.name == name)
    }

    /// Renders the document in the device protocol YAML layout.
    pub fn to_yaml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        emitter::write_document(f, self)
    }
}
