//! Common test utilities for building node graphs.
use rivo_protocol::prelude::*;

/// Turns `(key, value)` pairs into the override list `add_node_with` takes.
#[allow(dead_code)]
pub fn props(pairs: &[(&str, PropertyValue)]) -> Vec<(String, PropertyValue)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Adds a generic sensor reading `variable_name` from the default register.
#[allow(dead_code)]
pub fn add_sensor(graph: &mut Graph, variable_name: &str) -> NodeId {
    graph.add_node_with(
        NodeKind::Sensor,
        props(&[("variable_name", variable_name.into())]),
    )
}

#[allow(dead_code)]
pub fn add_calibration(graph: &mut Graph, expression: &str) -> NodeId {
    graph.add_node_with(
        NodeKind::Calibration,
        props(&[("expression", expression.into())]),
    )
}

#[allow(dead_code)]
pub fn add_telemetry(graph: &mut Graph, topic: &str, field: &str) -> NodeId {
    graph.add_node_with(
        NodeKind::Telemetry,
        props(&[("topic", topic.into()), ("field", field.into())]),
    )
}

/// Sensor `raw_temp` (0xFA, 3 bytes, raw_to_int) wired straight into a status output.
#[allow(dead_code)]
pub fn create_direct_status_graph() -> Graph {
    let mut graph = Graph::new();
    let sensor = graph.add_node_with(
        NodeKind::Sensor,
        props(&[
            ("variable_name", "raw_temp".into()),
            ("register", "0xFA".into()),
            ("length", 3.into()),
            ("decoder", "raw_to_int".into()),
        ]),
    );
    let status = graph.add_node_with(
        NodeKind::Status,
        props(&[
            ("sensor_id", "sensor_1".into()),
            ("sensor_type", "Temp".into()),
            ("unit", "°C".into()),
        ]),
    );
    graph
        .connect(sensor, 0, status, 0)
        .expect("sensor feeds status");
    graph
}

/// Sensor `raw_temp` -> calibration `$input * 0.01` -> telemetry `/temp`.`celsius`.
#[allow(dead_code)]
pub fn create_calibrated_telemetry_graph() -> Graph {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw_temp");
    let calibration = add_calibration(&mut graph, "$input * 0.01");
    let telemetry = add_telemetry(&mut graph, "/temp", "celsius");
    graph
        .connect(sensor, 0, calibration, 0)
        .expect("sensor feeds calibration");
    graph
        .connect(calibration, 0, telemetry, 0)
        .expect("calibration feeds telemetry");
    graph
}

/// Two sensors combined by a default `+` binary operation into a status output.
#[allow(dead_code)]
pub fn create_binary_op_graph() -> Graph {
    let mut graph = Graph::new();
    let left = add_sensor(&mut graph, "left");
    let right = add_sensor(&mut graph, "right");
    let op = graph.add_node(NodeKind::BinaryOp);
    let status = graph.add_node(NodeKind::Status);
    graph.connect(left, 0, op, 0).expect("left operand");
    graph.connect(right, 0, op, 1).expect("right operand");
    graph.connect(op, 0, status, 0).expect("op feeds status");
    graph
}

/// Scratch directory for tests that touch the filesystem.
#[allow(dead_code)]
pub fn setup_test_dir() -> std::path::PathBuf {
    std::env::temp_dir().join("rivo_protocol_tests")
}
