//! Unit tests for core rivo-protocol types.
use rivo_protocol::document::{CalibrationEntry, CalibrationSource, MapSection};
use rivo_protocol::prelude::*;

#[test]
fn test_property_value_display() {
    assert_eq!(format!("{}", PropertyValue::Number(42.0)), "42");
    assert_eq!(format!("{}", PropertyValue::Number(0.25)), "0.25");
    assert_eq!(format!("{}", PropertyValue::Bool(true)), "true");
    assert_eq!(format!("{}", PropertyValue::from("0xFA")), "0xFA");
}

#[test]
fn test_property_value_json() {
    let value = PropertyValue::from_json(&serde_json::json!(3));
    assert_eq!(value, Some(PropertyValue::Number(3.0)));
    assert_eq!(PropertyValue::from_json(&serde_json::json!([1, 2])), None);
    assert_eq!(PropertyValue::from_json(&serde_json::Value::Null), None);
    assert_eq!(PropertyValue::Bool(false).to_json(), serde_json::json!(false));
}

#[test]
fn test_node_kind_parsing() {
    let kind: NodeKind = "process/bit_mask".parse().unwrap();
    assert_eq!(kind, NodeKind::BitMask);
    assert_eq!(kind.to_string(), "process/bit_mask");
    assert_eq!(kind.title(), "Bit Mask");

    let custom: NodeKind = "vendor/thing".parse().unwrap();
    assert_eq!(custom.tag(), "vendor/thing");
    assert!(!custom.is_sensor());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        CompileError::EmptyGraph.to_string(),
        "The graph is empty: add at least one node"
    );
    assert_eq!(
        CompileError::NoSensorInput.to_string(),
        "At least one sensor input node is required"
    );
    assert_eq!(
        CompileError::CycleDetected { node_id: NodeId(4) }.to_string(),
        "Cycle detected: node '4' depends on its own result"
    );
    assert_eq!(
        GraphError::PortOutOfRange {
            node_id: NodeId(2),
            port: 3,
            direction: "input",
            available: 1,
        }
        .to_string(),
        "Node '2' has no input port 3 (1 available)"
    );

    let wrapped = GraphConversionError::from(GraphError::NodeNotFound(NodeId(7)));
    assert_eq!(wrapped.to_string(), "Node '7' not found");
}

#[test]
fn test_outcome_from_result() {
    let outcome = CompileOutcome::from(Err(CompileError::NoSensorInput));
    assert_eq!(
        outcome,
        CompileOutcome::Error {
            error: "At least one sensor input node is required".to_string()
        }
    );
    assert_eq!(
        serde_json::to_string(&outcome).unwrap(),
        r#"{"error":"At least one sensor input node is required"}"#
    );
}

#[test]
fn test_referenced_symbols() {
    let entry = CalibrationEntry {
        name: "calib_3".to_string(),
        source: CalibrationSource::Named(vec![
            ("a".to_string(), "raw".to_string()),
            ("b".to_string(), "calib_1".to_string()),
        ]),
        expr: "$a - $b".to_string(),
        description: None,
    };
    assert_eq!(entry.referenced_symbols(), vec!["raw", "calib_1"]);
}

#[test]
fn test_telemetry_overwrites_in_place() {
    let mut map = MapSection::default();
    map.set_telemetry("/a", "x", "${one}".to_string());
    map.set_telemetry("/b", "y", "${two}".to_string());
    map.set_telemetry("/a", "z", "${three}".to_string());
    map.set_telemetry("/a", "x", "${four}".to_string());

    let topics: Vec<_> = map.telemetry.iter().map(|t| t.topic.as_str()).collect();
    assert_eq!(topics, vec!["/a", "/b"]);
    let fields: Vec<_> = map.telemetry[0]
        .fields
        .iter()
        .map(|f| (f.field.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(fields, vec![("x", "${four}"), ("z", "${three}")]);
}

#[test]
fn test_document_bytes_round_trip() {
    let mut graph = Graph::new();
    let sensor = graph.add_node(NodeKind::Sensor);
    let shift = graph.add_node(NodeKind::BitShift);
    let status = graph.add_node(NodeKind::Status);
    graph.connect(sensor, 0, shift, 0).unwrap();
    graph.connect(shift, 0, status, 0).unwrap();

    let document = Compiler::new(&graph).compile().unwrap();
    let bytes = document.to_bytes().unwrap();
    assert_eq!(Document::from_bytes(&bytes).unwrap(), document);
}
