//! # rivo-protocol - Visual Node Graph to RIVO Protocol Compiler
//!
//! **rivo-protocol** turns a node graph drawn in the RIVO visual editor
//! (sensor inputs, processing steps, outputs) into the RIVO device protocol
//! document: a fixed-layout YAML file describing which registers to read, how
//! to calibrate the raw values, and where to publish the results.
//!
//! ## Core Workflow
//!
//! 1.  **Build or load a graph**: Edit a [`Graph`](graph::Graph) directly, or
//!     load the editor's JSON export as an [`EditorGraph`](editor::EditorGraph)
//!     and convert it with [`IntoGraph`](graph::IntoGraph).
//! 2.  **Configure**: Use `Compiler::builder` to adjust which node types count
//!     as sensors, map custom node tags onto built-in ones, or register custom
//!     processing parsers.
//! 3.  **Compile**: `compile()` returns a structured [`Document`](document::Document)
//!     or a [`CompileError`](error::CompileError).
//! 4.  **Emit**: `Document::to_yaml()` renders the protocol text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rivo_protocol::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = Graph::new();
//!     let sensor = graph.add_node(NodeKind::Sensor);
//!     let scale = graph.add_node_with(
//!         NodeKind::Calibration,
//!         [("expression".to_string(), PropertyValue::from("$input * 0.01"))],
//!     );
//!     let status = graph.add_node(NodeKind::Status);
//!     graph.connect(sensor, 0, scale, 0)?;
//!     graph.connect(scale, 0, status, 0)?;
//!
//!     let compiler = Compiler::builder(&graph).build();
//!     let document = compiler.compile()?;
//!     println!("{}", document.to_yaml());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod registry;
