use super::field::FieldSpec;
use crate::document::quote;
use crate::graph::{Properties, PropertyValue, format_number};
use ahash::AHashMap;
use std::fmt::Write;
use std::sync::OnceLock;

const BYTE_ORDERS: [&str; 2] = ["big_endian", "little_endian"];
const WORD_ORDERS: [&str; 4] = ["ABCD", "CDAB", "BADC", "DCBA"];

const LEGACY_ALIASES: [(&str, &str); 14] = [
    ("bme280_temp", "raw_to_int"),
    ("bme280_pressure", "raw_to_int"),
    ("bme280_humidity", "raw_to_int"),
    ("dht22_temp", "raw_to_int"),
    ("dht22_humidity", "raw_to_int"),
    ("int8", "raw_to_int"),
    ("uint8", "raw_to_int"),
    ("int16_le", "raw_to_int"),
    ("int16_be", "raw_to_int"),
    ("uint16_le", "raw_to_int"),
    ("uint16_be", "raw_to_int"),
    ("int32_le", "raw_to_int"),
    ("int32_be", "raw_to_int"),
    ("float32", "ieee754_float"),
];

/// A decoder the device firmware knows, with the fields its form exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderType {
    pub id: &'static str,
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl DecoderType {
    fn new(id: &'static str, name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { id, name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A decoder selection plus the field values that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    pub decoder_type: String,
    pub fields: Properties,
}

impl DecoderConfig {
    pub fn new(decoder_type: impl Into<String>) -> Self {
        Self {
            decoder_type: decoder_type.into(),
            fields: Properties::new(),
        }
    }

    /// Renders the `decode:` entry of a register. A config without fields is
    /// the short `decode: "<id>"` form.
    pub fn to_yaml(&self) -> String {
        if self.fields.is_empty() {
            return format!("decode: {}", quote(&self.decoder_type));
        }

        let mut out = String::from("decode:\n");
        let _ = writeln!(out, "  type: {}", quote(&self.decoder_type));
        for (key, value) in self.fields.iter() {
            let rendered = match value {
                PropertyValue::Text(s) => quote(s),
                PropertyValue::Number(n) => format_number(*n),
                PropertyValue::Bool(b) => b.to_string(),
            };
            let _ = writeln!(out, "  {}: {}", key, rendered);
        }
        out
    }
}

pub struct DecoderCatalog {
    decoders: Vec<DecoderType>,
    aliases: AHashMap<&'static str, &'static str>,
}

impl DecoderCatalog {
    /// The decoders supported by RIVO devices.
    pub fn builtin() -> &'static DecoderCatalog {
        static CATALOG: OnceLock<DecoderCatalog> = OnceLock::new();
        CATALOG.get_or_init(DecoderCatalog::build_builtin)
    }

    fn build_builtin() -> Self {
        let word_order = || {
            vec![FieldSpec::select("byte_order", "Word order", WORD_ORDERS).default("ABCD")]
        };
        let decoders = vec![
            DecoderType::new(
                "raw_to_int",
                "Integer conversion",
                vec![
                    FieldSpec::select("byte_order", "Byte order", BYTE_ORDERS).default("big_endian"),
                    FieldSpec::checkbox("signed", "Signed", false),
                    FieldSpec::number("bits", "Bits").default(16).range(1.0, 64.0),
                    FieldSpec::number("bit_shift", "Bit shift (optional)").default(0),
                    FieldSpec::text("bit_mask", "Bit mask (optional)").placeholder("0xFF"),
                    FieldSpec::number("scale", "Scale").default(1.0).any_step(),
                    FieldSpec::number("offset", "Offset").default(0).any_step(),
                ],
            ),
            DecoderType::new(
                "ieee754_float",
                "IEEE 754 float",
                vec![
                    FieldSpec::select("byte_order", "Byte order", BYTE_ORDERS).default("big_endian"),
                    FieldSpec::select("precision", "Precision", [32, 64]).default(32),
                ],
            ),
            DecoderType::new("modbus_int16_be", "Modbus 16-bit integer (BE)", Vec::new()),
            DecoderType::new("modbus_uint16_be", "Modbus 16-bit unsigned integer (BE)", Vec::new()),
            DecoderType::new("modbus_int32_be", "Modbus 32-bit integer (ABCD)", word_order()),
            DecoderType::new("modbus_uint32_be", "Modbus 32-bit unsigned integer", word_order()),
            DecoderType::new("modbus_float32_be", "Modbus 32-bit float", word_order()),
            DecoderType::new(
                "bcd",
                "BCD (Binary-Coded Decimal)",
                vec![FieldSpec::checkbox("packed", "Packed BCD", true)],
            ),
            DecoderType::new(
                "ascii",
                "ASCII string",
                vec![
                    FieldSpec::checkbox("trim", "Trim whitespace", true),
                    FieldSpec::select("encoding", "Encoding", ["ascii", "utf8"]).default("ascii"),
                ],
            ),
            DecoderType::new(
                "bitmap",
                "Bit mask",
                vec![
                    FieldSpec::text("mask", "Mask").placeholder("0xFF").required(),
                    FieldSpec::number("shift", "Bit shift").default(0),
                ],
            ),
            DecoderType::new(
                "custom_expression",
                "Custom expression",
                vec![
                    FieldSpec::text("expression", "Expression")
                        .placeholder("${input} * 1.8 + 32")
                        .required(),
                ],
            ),
        ];

        Self {
            decoders,
            aliases: LEGACY_ALIASES.into_iter().collect(),
        }
    }

    /// Maps a legacy alias onto its base decoder id; other ids pass through.
    pub fn resolve_alias<'a>(&self, id: &'a str) -> &'a str {
        self.aliases.get(id).copied().unwrap_or(id)
    }

    pub fn is_alias(&self, id: &str) -> bool {
        self.aliases.contains_key(id)
    }

    /// Looks a decoder up by id or legacy alias.
    pub fn get(&self, id: &str) -> Option<&DecoderType> {
        let id = self.resolve_alias(id);
        self.decoders.iter().find(|d| d.id == id)
    }

    /// Base decoders in declaration order. Aliases are not listed.
    pub fn list(&self) -> impl Iterator<Item = &DecoderType> {
        self.decoders.iter()
    }

    /// Builds a config from submitted form values. Only fields the decoder
    /// declares are kept, and blank text counts as not submitted.
    pub fn build_config(&self, id: &str, form: &Properties) -> Option<DecoderConfig> {
        let decoder = self.get(id)?;
        let mut config = DecoderConfig::new(id);
        for field in &decoder.fields {
            match form.get(field.name) {
                Some(PropertyValue::Text(s)) if s.is_empty() => {}
                Some(value) => {
                    config.fields.insert(field.name, value.clone());
                }
                None => {}
            }
        }
        Some(config)
    }

    /// Expands a plain decoder string into a config.
    pub fn convert_legacy(&self, id: &str) -> DecoderConfig {
        if id == "bme280_temp" {
            let mut config = DecoderConfig::new("raw_to_int");
            config.fields = [
                ("byte_order", PropertyValue::from("big_endian")),
                ("signed", PropertyValue::from(true)),
                ("bits", PropertyValue::from(20)),
                ("bit_shift", PropertyValue::from(4)),
                ("scale", PropertyValue::from(0.01)),
                ("offset", PropertyValue::from(0)),
            ]
            .into_iter()
            .collect();
            return config;
        }
        DecoderConfig::new(self.resolve_alias(id))
    }
}
