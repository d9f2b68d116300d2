use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivo_protocol::editor::EditorGraph;
use rivo_protocol::graph::{Graph, NodeId, PropertyValue};
use rivo_protocol::registry::NodeKind;
use std::fs;

/// A CLI tool to generate random editor graphs for the RIVO protocol compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Number of sensor input nodes
    #[arg(long, default_value_t = 2)]
    sensors: usize,

    /// Maximum number of processing steps behind each sensor
    #[arg(long, default_value_t = 4)]
    depth: usize,

    /// Seed for reproducible graphs
    #[arg(long)]
    seed: Option<u64>,
}

const SENSOR_KINDS: [NodeKind; 3] = [NodeKind::Sensor, NodeKind::ModbusSensor, NodeKind::AnalogSensor];
const MATH_FUNCTIONS: [&str; 4] = ["abs", "sqrt", "log", "pow"];
const OPERATIONS: [&str; 4] = ["+", "-", "*", "/"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.sensors == 0 {
        eprintln!("Error: --sensors must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating graph ({} sensors, up to {} processing steps each)...",
        cli.sensors, cli.depth
    );

    let graph = generate_graph(&mut rng, cli.sensors, cli.depth)?;
    let json_output = EditorGraph::from_graph(&graph).to_json_string()?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} nodes and {} links to '{}'",
        graph.len(),
        graph.links().len(),
        cli.output
    );

    Ok(())
}

fn generate_graph(
    rng: &mut StdRng,
    sensors: usize,
    depth: usize,
) -> Result<Graph, Box<dyn std::error::Error>> {
    let mut graph = Graph::new();
    let mut chain_ends = Vec::with_capacity(sensors);

    for index in 0..sensors {
        let kind = SENSOR_KINDS[rng.random_range(0..SENSOR_KINDS.len())].clone();
        let sensor = graph.add_node_with(
            kind,
            [
                ("variable_name".to_string(), PropertyValue::from(format!("sensor_{}", index + 1))),
                ("register".to_string(), PropertyValue::from(format!("0x{:02X}", rng.random_range(0..=0xFFu32)))),
            ],
        );
        let steps = rng.random_range(0..=depth);
        let mut end = generate_chain(rng, &mut graph, sensor, steps)?;

        if rng.random_bool(0.3) {
            let gain = graph.add_node_with(
                NodeKind::Constant,
                [
                    ("name".to_string(), PropertyValue::from(format!("gain_{}", index + 1))),
                    ("value".to_string(), PropertyValue::from(rng.random_range(0.1..5.0))),
                ],
            );
            let scaled = graph.add_node_with(
                NodeKind::BinaryOp,
                [
                    ("operation".to_string(), PropertyValue::from("*")),
                    ("input_b_name".to_string(), PropertyValue::from("gain")),
                ],
            );
            graph.connect(end, 0, scaled, 0)?;
            graph.connect(gain, 0, scaled, 1)?;
            end = scaled;
        }
        chain_ends.push(end);
    }

    // Occasionally merge two chains with a binary operation.
    if chain_ends.len() >= 2 && rng.random_bool(0.5) {
        let op = graph.add_node_with(
            NodeKind::BinaryOp,
            [(
                "operation".to_string(),
                PropertyValue::from(OPERATIONS[rng.random_range(0..OPERATIONS.len())]),
            )],
        );
        graph.connect(chain_ends[0], 0, op, 0)?;
        graph.connect(chain_ends[1], 0, op, 1)?;
        chain_ends.push(op);
    }

    for (index, end) in chain_ends.into_iter().enumerate() {
        let status = graph.add_node_with(
            NodeKind::Status,
            [("sensor_id".to_string(), PropertyValue::from(format!("sensor_{}", index + 1)))],
        );
        graph.connect(end, 0, status, 0)?;

        let telemetry = graph.add_node_with(
            NodeKind::Telemetry,
            [("field".to_string(), PropertyValue::from(format!("value_{}", index + 1)))],
        );
        graph.connect(end, 0, telemetry, 0)?;
    }

    Ok(graph)
}

fn generate_chain(
    rng: &mut StdRng,
    graph: &mut Graph,
    start: NodeId,
    steps: usize,
) -> Result<NodeId, Box<dyn std::error::Error>> {
    let mut current = start;
    for _ in 0..steps {
        let node = match rng.random_range(0..4u8) {
            0 => graph.add_node_with(
                NodeKind::Calibration,
                [(
                    "expression".to_string(),
                    PropertyValue::from(format!("$input * {:.2}", rng.random_range(0.01..10.0))),
                )],
            ),
            1 => graph.add_node_with(
                NodeKind::Math,
                [(
                    "function".to_string(),
                    PropertyValue::from(MATH_FUNCTIONS[rng.random_range(0..MATH_FUNCTIONS.len())]),
                )],
            ),
            2 => graph.add_node_with(
                NodeKind::BitShift,
                [
                    ("operation".to_string(), PropertyValue::from(if rng.random_bool(0.5) { ">>" } else { "<<" })),
                    ("shift_bits".to_string(), PropertyValue::from(rng.random_range(1..8i32))),
                ],
            ),
            _ => graph.add_node_with(
                NodeKind::BitMask,
                [("mask".to_string(), PropertyValue::from(format!("0x{:02X}", rng.random_range(1..=0xFFu32))))],
            ),
        };
        graph.connect(current, 0, node, 0)?;
        current = node;
    }
    Ok(current)
}
