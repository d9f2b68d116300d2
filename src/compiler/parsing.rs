use crate::document::CalibrationSource;
use crate::graph::{Node, PropertyValue, format_number};
use ahash::AHashMap;

/// Expression and operands synthesized for one processing node.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCalibration {
    pub source: CalibrationSource,
    pub expr: String,
    pub description: Option<String>,
}

/// Defines the contract for turning a processing node type into a
/// `calibrate` entry.
///
/// `inputs` holds the resolved symbol of each input port in port order, with
/// an empty string for ports that have no incoming link.
pub trait ProcessParser: Send + Sync {
    fn node_type(&self) -> &str;
    /// Number of input ports the parser reads.
    fn arity(&self) -> usize;
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration;
}

/// Single-operand source; an unconnected port reads the literal `input`.
fn single_input(inputs: &[String]) -> CalibrationSource {
    let input = inputs
        .first()
        .filter(|s| !s.is_empty())
        .map_or("input", String::as_str);
    CalibrationSource::Single(input.to_string())
}

fn single(expr: String, inputs: &[String]) -> ParsedCalibration {
    ParsedCalibration {
        source: single_input(inputs),
        expr,
        description: None,
    }
}

struct CalibrationParser;
impl ProcessParser for CalibrationParser {
    fn node_type(&self) -> &str {
        "process/calibration"
    }
    fn arity(&self) -> usize {
        1
    }
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration {
        let props = &node.properties;
        ParsedCalibration {
            source: single_input(inputs),
            expr: props.text_or("expression", "$input"),
            description: props.text("description"),
        }
    }
}

struct MathParser;
impl ProcessParser for MathParser {
    fn node_type(&self) -> &str {
        "process/math"
    }
    fn arity(&self) -> usize {
        1
    }
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration {
        let props = &node.properties;
        let function = props.text_or("function", "abs");
        // Text that is only whitespace counts as 0; the empty string is unset.
        let parameter = match props.get("parameter") {
            Some(PropertyValue::Text(text)) if text.is_empty() => None,
            Some(PropertyValue::Text(text)) if text.trim().is_empty() => Some(0.0),
            Some(value) => value.as_number(),
            None => None,
        };
        let expr = match parameter {
            Some(parameter) if function == "pow" => {
                format!("pow($input, {})", format_number(parameter))
            }
            _ => format!("{}($input)", function),
        };
        single(expr, inputs)
    }
}

struct BinaryOpParser;
impl ProcessParser for BinaryOpParser {
    fn node_type(&self) -> &str {
        "process/binary_op"
    }
    fn arity(&self) -> usize {
        2
    }
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration {
        let props = &node.properties;
        let a_key = props.trimmed_or("input_a_name", "a");
        let b_key = props.trimmed_or("input_b_name", "b");
        let operation = props.text_or("operation", "+");

        let mut named: Vec<(String, String)> = Vec::new();
        for (key, source) in [(&a_key, inputs.first()), (&b_key, inputs.get(1))] {
            let Some(source) = source.filter(|s| !s.is_empty()) else {
                continue;
            };
            // Equal key names collapse onto one entry, the later port wins.
            match named.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = source.clone(),
                None => named.push((key.clone(), source.clone())),
            }
        }

        ParsedCalibration {
            source: CalibrationSource::Named(named),
            expr: format!("${} {} ${}", a_key, operation, b_key),
            description: None,
        }
    }
}

struct BitShiftParser;
impl ProcessParser for BitShiftParser {
    fn node_type(&self) -> &str {
        "process/bit_shift"
    }
    fn arity(&self) -> usize {
        1
    }
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration {
        let props = &node.properties;
        let operation = match props.text("operation").as_deref() {
            Some(">>") => ">>",
            _ => "<<",
        };
        let bits = props.number("shift_bits").unwrap_or(0.0);
        single(format!("$input {} {}", operation, format_number(bits)), inputs)
    }
}

struct BitMaskParser;
impl ProcessParser for BitMaskParser {
    fn node_type(&self) -> &str {
        "process/bit_mask"
    }
    fn arity(&self) -> usize {
        1
    }
    fn parse(&self, node: &Node, inputs: &[String]) -> ParsedCalibration {
        let props = &node.properties;
        let operation = props.text_or("operation", "&");
        let mask = props.text_or("mask", "0xFF");
        single(format!("$input {} {}", operation, mask), inputs)
    }
}

/// Generates registration and by-name construction for the built-in parsers.
macro_rules! define_process_parsers {
    ( $( ($struct_name:ident, $node_type:literal) ),* $(,)? ) => {
        pub(super) fn register_default_parsers(registry: &mut AHashMap<String, Box<dyn ProcessParser>>) {
            $( registry.insert($node_type.to_string(), Box::new($struct_name)); )*
        }

        pub(super) fn create_parser_by_name(name: &str) -> Option<Box<dyn ProcessParser>> {
            match name {
                $( $node_type => Some(Box::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_process_parsers! {
    (CalibrationParser, "process/calibration"),
    (MathParser, "process/math"),
    (BinaryOpParser, "process/binary_op"),
    (BitShiftParser, "process/bit_shift"),
    (BitMaskParser, "process/bit_mask"),
}
