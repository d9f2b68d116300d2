use super::field::{FieldKind, FieldSpec};
use crate::graph::{Properties, format_number};
use itertools::Itertools;
use std::fmt;
use std::sync::OnceLock;

const PARITIES: [&str; 3] = ["none", "even", "odd"];

/// A physical bus and the connection settings it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BusProtocol {
    pub id: &'static str,
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// Problems found in a bus configuration. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.errors.iter().join("; "))
        }
    }
}

pub struct ProtocolCatalog {
    protocols: Vec<BusProtocol>,
}

impl ProtocolCatalog {
    pub fn builtin() -> &'static ProtocolCatalog {
        static CATALOG: OnceLock<ProtocolCatalog> = OnceLock::new();
        CATALOG.get_or_init(ProtocolCatalog::build_builtin)
    }

    fn build_builtin() -> Self {
        let modbus_address = || {
            FieldSpec::number("address", "Modbus address (1-247)")
                .placeholder("1")
                .required()
                .range(1.0, 247.0)
        };
        let serial = |id: &'static str, name: &'static str| BusProtocol {
            id,
            name,
            fields: vec![
                FieldSpec::number("baud_rate", "Baud rate").placeholder("9600").required(),
                FieldSpec::select("data_bits", "Data bits", [7, 8]).default(8),
                FieldSpec::select("parity", "Parity", PARITIES).default("none"),
                FieldSpec::select("stop_bits", "Stop bits", [1, 2]).default(1),
            ],
        };

        let protocols = vec![
            BusProtocol {
                id: "i2c",
                name: "I2C",
                fields: vec![
                    FieldSpec::text("address", "I2C address").placeholder("0x76").required(),
                    FieldSpec::text("whoami_reg", "WHO_AM_I register").placeholder("0xD0"),
                    FieldSpec::text("whoami_value", "Expected value").placeholder("0x60"),
                ],
            },
            serial("uart", "UART"),
            BusProtocol {
                id: "modbus-rtu",
                name: "Modbus RTU",
                fields: vec![
                    modbus_address(),
                    FieldSpec::select("baud_rate", "Baud rate", [4800, 9600, 19200, 38400, 57600, 115200])
                        .default(9600),
                    FieldSpec::select("parity", "Parity", PARITIES).default("none"),
                    FieldSpec::select("stop_bits", "Stop bits", [1, 2]).default(1),
                    FieldSpec::select("data_bits", "Data bits", [7, 8]).default(8),
                ],
            },
            BusProtocol {
                id: "modbus-ascii",
                name: "Modbus ASCII",
                fields: vec![
                    modbus_address(),
                    FieldSpec::select("baud_rate", "Baud rate", [4800, 9600, 19200, 38400]).default(9600),
                    FieldSpec::select("parity", "Parity", PARITIES).default("even"),
                    FieldSpec::select("stop_bits", "Stop bits", [1, 2]).default(1),
                ],
            },
            serial("rs485", "RS485"),
            BusProtocol {
                id: "analog",
                name: "Analog (4-20mA)",
                fields: vec![
                    FieldSpec::text("address", "ADC I2C address").placeholder("0x48"),
                    FieldSpec::number("adc_channel", "ADC channel")
                        .placeholder("0")
                        .range(0.0, 7.0),
                    FieldSpec::select("current_range", "Current range", ["4-20mA", "0-20mA"])
                        .default("4-20mA"),
                    FieldSpec::text("voltage_range", "Voltage range").placeholder("0-5V"),
                ],
            },
        ];

        Self { protocols }
    }

    pub fn get(&self, id: &str) -> Option<&BusProtocol> {
        self.protocols.iter().find(|p| p.id == id)
    }

    pub fn list(&self) -> impl Iterator<Item = &BusProtocol> {
        self.protocols.iter()
    }

    /// Checks `values` against the bus's fields. Unset values (blank, zero,
    /// false) fail `required` checks and skip range checks.
    pub fn validate(&self, bus: &str, values: &Properties) -> ValidationReport {
        let Some(protocol) = self.get(bus) else {
            return ValidationReport {
                errors: vec![format!("Unknown protocol: {}", bus)],
            };
        };

        let mut report = ValidationReport::default();
        for field in &protocol.fields {
            let value = values.get(field.name).filter(|v| !v.is_falsy());
            if field.required && value.is_none() {
                report.errors.push(format!("{} is required", field.label));
            }

            let (Some(value), FieldKind::Number { min, max, .. }) = (value, &field.kind) else {
                continue;
            };
            // Non-numeric input is left to the required check.
            let Some(n) = value.as_number().map(f64::trunc) else {
                continue;
            };
            if let Some(min) = min.filter(|min| n < *min) {
                report
                    .errors
                    .push(format!("{} must be at least {}", field.label, format_number(min)));
            }
            if let Some(max) = max.filter(|max| n > *max) {
                report
                    .errors
                    .push(format!("{} must be at most {}", field.label, format_number(max)));
            }
        }
        report
    }
}
