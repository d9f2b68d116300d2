//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build, import and compile a graph.
//!
//! # Example
//!
//! ```rust,no_run
//! use rivo_protocol::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/graph.json")?;
//! let graph = EditorGraph::from_json_str(&json)?.into_graph()?;
//!
//! let compiler = Compiler::new(&graph);
//! match compiler.compile_outcome() {
//!     CompileOutcome::Document { yaml } => println!("{}", yaml),
//!     CompileOutcome::Error { error } => eprintln!("{}", error),
//! }
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::parsing::{ParsedCalibration, ProcessParser};
pub use crate::compiler::{CompileOutcome, Compiler, CompilerBuilder};
pub use crate::config::{CompilerConfig, DocumentOptions};

// Graph model
pub use crate::editor::EditorGraph;
pub use crate::graph::{Graph, IntoGraph, Link, LinkId, Node, NodeId, Properties, PropertyValue};
pub use crate::registry::NodeKind;

// Output
pub use crate::document::Document;

// Catalogs
pub use crate::catalog::{DecoderCatalog, ProtocolCatalog};

// Error types
pub use crate::error::{CompileError, GraphConversionError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
