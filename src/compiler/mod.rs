use crate::catalog::DecoderCatalog;
use crate::config::{CompilerConfig, DEFAULT_SENSOR_TYPES, DocumentOptions};
use crate::document::{
    Document, Identify, MapSection, ReadSection, Register, StatusEntry, wrap_source,
};
use crate::error::CompileError;
use crate::graph::{Graph, Node};
use crate::registry::NodeKind;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use tracing::{debug, warn};

mod naming;
pub mod parsing;
mod resolver;

use parsing::*;
use resolver::Resolver;

/// How the compiler treats a node once type mappings are applied.
pub(crate) enum Role<'c> {
    Sensor,
    Constant,
    Process(&'c dyn ProcessParser),
    Status,
    Telemetry,
    /// Unknown or non-value types: resolve to an empty symbol.
    Opaque,
}

/// Compiles a node [`Graph`] into a protocol [`Document`].
///
/// The compiler borrows the graph immutably. Every call to
/// [`Compiler::compile`] starts from fresh traversal state, so compiling the
/// same graph twice yields identical documents.
pub struct Compiler<'g> {
    graph: &'g Graph,
    parsers: AHashMap<String, Box<dyn ProcessParser>>,
    kind_mappings: AHashMap<String, NodeKind>,
    sensor_types: AHashSet<String>,
    options: DocumentOptions,
}

pub struct CompilerBuilder<'g> {
    graph: &'g Graph,
    parsers: AHashMap<String, Box<dyn ProcessParser>>,
    kind_mappings: AHashMap<String, NodeKind>,
    sensor_types: AHashSet<String>,
    options: DocumentOptions,
}

impl<'g> CompilerBuilder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut parsers: AHashMap<String, Box<dyn ProcessParser>> = AHashMap::new();
        register_default_parsers(&mut parsers);
        Self {
            graph,
            parsers,
            kind_mappings: AHashMap::new(),
            sensor_types: DEFAULT_SENSOR_TYPES.iter().map(|s| s.to_string()).collect(),
            options: DocumentOptions::default(),
        }
    }

    /// Replaces the set of node types treated as sensor inputs.
    pub fn with_sensor_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensor_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.options = options;
        self
    }

    /// Treats nodes tagged `user_type_name` as the built-in `builtin_type_name`.
    /// Mappings onto tags that are not built in are ignored.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Some(parser) = create_parser_by_name(builtin_type_name) {
            self.parsers.insert(user_type_name.to_string(), parser);
            return self;
        }
        match NodeKind::from_tag(builtin_type_name) {
            NodeKind::Unknown(tag) => {
                warn!(user_type_name, builtin_type_name = %tag, "ignoring mapping onto unknown node type");
            }
            kind => {
                if self.sensor_types.contains(kind.tag()) {
                    self.sensor_types.insert(user_type_name.to_string());
                }
                self.kind_mappings.insert(user_type_name.to_string(), kind);
            }
        }
        self
    }

    pub fn with_custom_parser(mut self, parser: Box<dyn ProcessParser>) -> Self {
        self.parsers.insert(parser.node_type().to_string(), parser);
        self
    }

    /// Applies a loaded configuration file on top of the current settings.
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        if let Some(types) = config.sensor_types {
            self = self.with_sensor_types(types);
        }
        self.options = config.document;
        for (user, builtin) in &config.type_mappings {
            self = self.with_type_mapping(user, builtin);
        }
        self
    }

    pub fn build(self) -> Compiler<'g> {
        Compiler {
            graph: self.graph,
            parsers: self.parsers,
            kind_mappings: self.kind_mappings,
            sensor_types: self.sensor_types,
            options: self.options,
        }
    }
}

/// The caller-facing result shape: `{ "yaml": ... }` or `{ "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CompileOutcome {
    Document { yaml: String },
    Error { error: String },
}

impl From<Result<Document, CompileError>> for CompileOutcome {
    fn from(result: Result<Document, CompileError>) -> Self {
        match result {
            Ok(document) => CompileOutcome::Document {
                yaml: document.to_yaml(),
            },
            Err(e) => CompileOutcome::Error {
                error: e.to_string(),
            },
        }
    }
}

impl<'g> Compiler<'g> {
    pub fn builder(graph: &'g Graph) -> CompilerBuilder<'g> {
        CompilerBuilder::new(graph)
    }

    pub fn new(graph: &'g Graph) -> Self {
        CompilerBuilder::new(graph).build()
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub(crate) fn role_of(&self, node: &Node) -> Role<'_> {
        let tag = node.kind.tag();
        if self.sensor_types.contains(tag) {
            return Role::Sensor;
        }
        if let Some(parser) = self.parsers.get(tag) {
            return Role::Process(parser.as_ref());
        }
        let kind = self.kind_mappings.get(tag).unwrap_or(&node.kind);
        match kind {
            kind if self.sensor_types.contains(kind.tag()) => Role::Sensor,
            NodeKind::Constant => Role::Constant,
            NodeKind::Status => Role::Status,
            NodeKind::Telemetry => Role::Telemetry,
            _ => Role::Opaque,
        }
    }

    fn is_sensor(&self, node: &Node) -> bool {
        matches!(self.role_of(node), Role::Sensor)
    }

    /// Compiles the graph into a document, or reports why it cannot be compiled.
    pub fn compile(&self) -> Result<Document, CompileError> {
        let _span = tracing::debug_span!(
            "compile",
            nodes = self.graph.len(),
            links = self.graph.links().len()
        )
        .entered();

        if self.graph.is_empty() {
            return Err(CompileError::EmptyGraph);
        }
        let sensors: Vec<&Node> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| self.is_sensor(n))
            .collect();
        let Some(primary) = sensors.first() else {
            return Err(CompileError::NoSensorInput);
        };

        let mut resolver = Resolver::new(self);
        resolver.register_constants();

        let mut map = MapSection::default();
        for node in self.graph.nodes() {
            if let Role::Status = self.role_of(node) {
                let source = resolver.resolve_input(node.id, 0)?;
                let props = &node.properties;
                map.status.push(StatusEntry {
                    sensor_id: props.text_or("sensor_id", "sensor_1"),
                    sensor_type: props.text_or("sensor_type", "Sensor"),
                    value: wrap_source(&source),
                    unit: props.text("unit"),
                });
            }
        }
        for node in self.graph.nodes() {
            if let Role::Telemetry = self.role_of(node) {
                let source = resolver.resolve_input(node.id, 0)?;
                let props = &node.properties;
                map.set_telemetry(
                    &props.text_or("topic", "/topic"),
                    &props.text_or("field", "value"),
                    wrap_source(&source),
                );
            }
        }

        let mut registers = Vec::with_capacity(sensors.len());
        let catalog = DecoderCatalog::builtin();
        for sensor in &sensors {
            let props = &sensor.properties;
            let decode = props.text_or("decoder", "raw_to_int");
            if catalog.get(&decode).is_none() {
                warn!(node_id = %sensor.id, decoder = %decode, "decoder is not in the catalog, passing it through");
            }
            registers.push(Register {
                name: resolver.resolve(sensor.id)?,
                reg: props.text_or("register", "0x00"),
                len: register_length(sensor),
                decode,
            });
        }

        let options = &self.options;
        let primary_props = &primary.properties;
        let (constants, calibrate) = resolver.finish();
        let document = Document {
            header: options.header.clone(),
            id: options.id.clone(),
            device_type: options.device_type.clone(),
            bus: primary_props.text_or("bus", &options.default_bus),
            address: primary_props.text_or("address", &options.default_address),
            identify: Identify {
                whoami_reg: options.whoami_reg.clone(),
                whoami_value: options.whoami_value.clone(),
            },
            read: ReadSection {
                interval_ms: options.interval_ms,
                registers,
            },
            constants,
            calibrate,
            map,
        };

        debug!(
            registers = document.read.registers.len(),
            constants = document.constants.len(),
            calibrations = document.calibrate.len(),
            status = document.map.status.len(),
            topics = document.map.telemetry.len(),
            "compiled graph"
        );
        Ok(document)
    }

    /// Compiles and renders the result as a [`CompileOutcome`].
    pub fn compile_outcome(&self) -> CompileOutcome {
        self.compile().into()
    }
}

/// `length` as a positive whole number, 1 when unset or unusable.
fn register_length(node: &Node) -> u32 {
    node.properties
        .number("length")
        .map(f64::trunc)
        .filter(|n| *n >= 1.0 && *n <= u32::MAX as f64)
        .map_or(1, |n| n as u32)
}
