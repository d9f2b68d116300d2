//! Tests for graph editing operations.
mod common;
use common::*;
use rivo_protocol::prelude::*;

#[test]
fn test_ids_are_assigned_from_one() {
    let mut graph = Graph::new();
    let first = graph.add_node(NodeKind::Sensor);
    let second = graph.add_node(NodeKind::Status);
    assert_eq!(first, NodeId(1));
    assert_eq!(second, NodeId(2));

    let link = graph.connect(first, 0, second, 0).unwrap();
    assert_eq!(link, LinkId(1));
}

#[test]
fn test_new_nodes_carry_registry_defaults() {
    let mut graph = Graph::new();
    let id = graph.add_node(NodeKind::Telemetry);
    let node = graph.node(id).unwrap();
    assert_eq!(node.properties.text("topic").as_deref(), Some("/topic"));
    assert_eq!(node.properties.text("field").as_deref(), Some("data"));
    assert_eq!(node.inputs(), ["value"]);
}

#[test]
fn test_overrides_replace_defaults_in_place() {
    let mut graph = Graph::new();
    let id = graph.add_node_with(
        NodeKind::BitMask,
        props(&[("operation", "|".into()), ("extra", true.into())]),
    );
    let keys: Vec<_> = graph.node(id).unwrap().properties.keys().collect();
    assert_eq!(keys, vec!["mask", "operation", "extra"]);
}

#[test]
fn test_connect_replaces_existing_input_link() {
    let mut graph = Graph::new();
    let a = add_sensor(&mut graph, "a");
    let b = add_sensor(&mut graph, "b");
    let status = graph.add_node(NodeKind::Status);

    graph.connect(a, 0, status, 0).unwrap();
    graph.connect(b, 0, status, 0).unwrap();

    assert_eq!(graph.links().len(), 1);
    assert_eq!(graph.incoming(status, 0).map(|l| l.origin_id), Some(b));
}

#[test]
fn test_output_port_fans_out() {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw");
    let status = graph.add_node(NodeKind::Status);
    let telemetry = graph.add_node(NodeKind::Telemetry);

    graph.connect(sensor, 0, status, 0).unwrap();
    graph.connect(sensor, 0, telemetry, 0).unwrap();
    assert_eq!(graph.links().len(), 2);
}

#[test]
fn test_connect_rejects_bad_ports_and_nodes() {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw");
    let op = graph.add_node(NodeKind::BinaryOp);

    let err = graph.connect(sensor, 0, op, 2).unwrap_err();
    assert_eq!(
        err,
        GraphError::PortOutOfRange {
            node_id: op,
            port: 2,
            direction: "input",
            available: 2,
        }
    );

    let err = graph.connect(op, 0, sensor, 0).unwrap_err();
    assert!(matches!(err, GraphError::PortOutOfRange { direction: "input", .. }));

    let err = graph.connect(NodeId(99), 0, op, 0).unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound(NodeId(99)));
    assert!(graph.links().is_empty());
}

#[test]
fn test_unknown_types_accept_any_port_and_property() {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw");
    let custom = graph.add_node(NodeKind::from_tag("vendor/filter"));

    graph.connect(sensor, 0, custom, 3).unwrap();
    graph.set_property(custom, "window", 8).unwrap();
    assert_eq!(graph.node(custom).unwrap().properties.number("window"), Some(8.0));
}

#[test]
fn test_set_property_validates_schema() {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw");

    let previous = graph.set_property(sensor, "register", "0x10").unwrap();
    assert_eq!(previous, Some(PropertyValue::from("0xFA")));

    let err = graph.set_property(sensor, "topic", "/x").unwrap_err();
    assert!(matches!(err, GraphError::UnknownProperty { ref key, .. } if key == "topic"));
    assert!(err.to_string().contains("input/sensor"));

    let err = graph.set_property(NodeId(42), "register", "0x10").unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound(NodeId(42)));
}

#[test]
fn test_remove_node_drops_its_links() {
    let mut graph = create_calibrated_telemetry_graph();
    let calibration = graph.nodes_of_kind(&NodeKind::Calibration).next().unwrap().id;

    let removed = graph.remove_node(calibration).unwrap();
    assert_eq!(removed.kind, NodeKind::Calibration);
    assert_eq!(graph.len(), 2);
    assert!(graph.links().is_empty());
    assert!(graph.remove_node(calibration).is_err());
}

#[test]
fn test_disconnect() {
    let mut graph = Graph::new();
    let sensor = add_sensor(&mut graph, "raw");
    let status = graph.add_node(NodeKind::Status);
    let link = graph.connect(sensor, 0, status, 0).unwrap();

    let removed = graph.disconnect(link).unwrap();
    assert_eq!(removed.target_id, status);
    assert!(graph.incoming(status, 0).is_none());
    assert_eq!(graph.disconnect(link).unwrap_err(), GraphError::LinkNotFound(link));
}

#[test]
fn test_insert_node_keeps_ids_unique() {
    let mut graph = Graph::new();
    graph
        .insert_node(Node::new(NodeId(10), NodeKind::Sensor))
        .unwrap();
    let err = graph
        .insert_node(Node::new(NodeId(10), NodeKind::Status))
        .unwrap_err();
    assert_eq!(err, GraphError::DuplicateNode(NodeId(10)));

    assert_eq!(graph.add_node(NodeKind::Status), NodeId(11));
}

#[test]
fn test_ids_past_the_largest_fill_free_slots() {
    let mut graph = Graph::new();
    graph.add_node(NodeKind::Sensor);
    graph.add_node(NodeKind::Sensor);
    graph
        .insert_node(Node::new(NodeId(u32::MAX), NodeKind::Status))
        .unwrap();
    graph.remove_node(NodeId(1)).unwrap();

    assert_eq!(graph.add_node(NodeKind::Status), NodeId(1));
    assert_eq!(graph.add_node(NodeKind::Status), NodeId(3));
    let mut ids: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), graph.len());
}

#[test]
fn test_clear_resets_ids() {
    let mut graph = create_binary_op_graph();
    graph.clear();
    assert!(graph.is_empty());
    assert!(graph.links().is_empty());
    assert_eq!(graph.add_node(NodeKind::Sensor), NodeId(1));
}

#[test]
fn test_nodes_keep_creation_order() {
    let graph = create_binary_op_graph();
    let kinds: Vec<_> = graph.nodes().iter().map(|n| n.kind.tag()).collect();
    assert_eq!(
        kinds,
        vec!["input/sensor", "input/sensor", "process/binary_op", "output/status"]
    );
    assert_eq!(graph.nodes_of_kind(&NodeKind::Sensor).count(), 2);
}
