use clap::Parser;
use itertools::Itertools;
use rivo_protocol::catalog::FieldKind;
use rivo_protocol::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Compiles RIVO editor graphs into device protocol YAML
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor graph JSON export
    graph_path: Option<String>,

    /// Write the YAML here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Path to a TOML compiler configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Node types counted as sensor inputs (comma separated)
    #[arg(long, value_delimiter = ',')]
    sensor_types: Option<Vec<String>>,

    /// Also save the compiled document as a binary artifact
    #[arg(long)]
    artifact: Option<String>,

    /// Emit a previously saved artifact instead of compiling a graph
    #[arg(long, conflicts_with = "graph_path")]
    from_artifact: Option<String>,

    /// Print the result as a `{"yaml": ...}` or `{"error": ...}` JSON object
    #[arg(long)]
    json: bool,

    /// List the decoder and bus catalogs and exit
    #[arg(long)]
    decoders: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

struct Job {
    graph_path: String,
    output: Option<String>,
    config: Option<String>,
    sensor_types: Option<Vec<String>>,
    artifact: Option<String>,
    json: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.decoders {
        print_catalogs();
    } else if cli.human {
        run_interactive();
    } else {
        run_non_interactive(cli);
    }
}

fn run_compilation(job: Job) {
    let start = Instant::now();

    let json = fs::read_to_string(&job.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            &job.graph_path, e
        ))
    });
    let graph = EditorGraph::from_json_str(&json)
        .and_then(IntoGraph::into_graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import graph: {}", e)));

    let mut builder = Compiler::builder(&graph);
    if let Some(path) = &job.config {
        let config = CompilerConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e)));
        builder = builder.with_config(config);
    }
    if let Some(types) = job.sensor_types {
        builder = builder.with_sensor_types(types);
    }
    let compiler = builder.build();

    let result = compiler.compile();
    tracing::info!(elapsed = ?start.elapsed(), ok = result.is_ok(), "compilation finished");

    if let (Ok(document), Some(path)) = (&result, &job.artifact) {
        document
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
        eprintln!("Saved artifact to '{}'", path);
    }

    if job.json {
        let outcome = CompileOutcome::from(result);
        let text = serde_json::to_string_pretty(&outcome)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode result: {}", e)));
        write_output(job.output.as_deref(), &text);
        return;
    }

    match result {
        Ok(document) => write_output(job.output.as_deref(), &document.to_yaml()),
        Err(e) => exit_with_error(&e.to_string()),
    }
}

fn emit_artifact(path: &str, output: Option<&str>) {
    let document = Document::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load artifact: {}", e)));
    write_output(output, &document.to_yaml());
}

fn write_output(path: Option<&str>, text: &str) {
    match path {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            eprintln!("Wrote protocol to '{}'", path);
        }
        None => print!("{}", text),
    }
}

fn print_catalogs() {
    println!("Decoders:");
    for decoder in DecoderCatalog::builtin().list() {
        let fields = decoder.fields.iter().map(|f| f.name).join(", ");
        println!("  {:<20} {}", decoder.id, decoder.name);
        if !fields.is_empty() {
            println!("  {:<20} fields: {}", "", fields);
        }
    }

    println!("\nBuses:");
    for bus in ProtocolCatalog::builtin().list() {
        println!("  {:<20} {}", bus.id, bus.name);
        for field in &bus.fields {
            let kind = match &field.kind {
                FieldKind::Text => "text".to_string(),
                FieldKind::Number { .. } => "number".to_string(),
                FieldKind::Checkbox => "checkbox".to_string(),
                FieldKind::Select { options } => format!("one of {}", options.iter().join("/")),
            };
            let required = if field.required { " (required)" } else { "" };
            println!("  {:<20}   {}: {}{}", "", field.name, kind, required);
        }
    }
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    if let Some(path) = &cli.from_artifact {
        emit_artifact(path, cli.output.as_deref());
        return;
    }
    let graph_path = cli.graph_path.unwrap_or_else(|| {
        exit_with_error("Graph path is required in non-interactive mode.");
    });

    run_compilation(Job {
        graph_path,
        output: cli.output,
        config: cli.config,
        sensor_types: cli.sensor_types,
        artifact: cli.artifact,
        json: cli.json,
    });
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    eprintln!("--- RIVO Protocol Interactive Mode ---");

    let graph_path = prompt_for_input("Enter graph JSON path", Some("data/graph.json"));
    let config = optional(prompt_for_input("Enter config path (optional)", None));
    let output = optional(prompt_for_input("Enter output path (optional, stdout if empty)", None));

    let sensor_types = loop {
        eprintln!("\nWhich node types count as sensors?");
        eprintln!("  1: All sensor inputs (sensor, modbus, analog)");
        eprintln!("  2: Generic sensor input only");
        let choice = prompt_for_input("Enter choice", Some("1"));

        match choice.trim() {
            "1" => break None,
            "2" => break Some(vec!["input/sensor".to_string()]),
            _ => eprintln!("Invalid choice. Please enter 1 or 2."),
        }
    };

    run_compilation(Job {
        graph_path,
        output,
        config,
        sensor_types,
        artifact: None,
        json: false,
    });
}

fn optional(input: String) -> Option<String> {
    if input.is_empty() { None } else { Some(input) }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    eprint!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stderr().flush();

    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
