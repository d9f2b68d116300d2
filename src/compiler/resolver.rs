use super::naming::NameAllocator;
use super::{Compiler, Role};
use crate::document::{CalibrationEntry, Constant};
use crate::error::CompileError;
use crate::graph::{Node, NodeId, PropertyValue};
use ahash::{AHashMap, AHashSet};
use tracing::{trace, warn};

struct Frame {
    id: NodeId,
    expanded: bool,
}

/// Per-compile traversal state: resolves nodes to symbolic names and collects
/// the `constants` and `calibrate` side tables along the way.
///
/// Resolution is an iterative depth-first walk. Dependencies are resolved in
/// port order before the node itself, each node at most once. A node that is
/// reached again while still on the walk's path is a cycle.
pub(super) struct Resolver<'c, 'g> {
    compiler: &'c Compiler<'g>,
    nodes: AHashMap<NodeId, &'g Node>,
    // Key: (target node, target port), Value: origin node
    incoming: AHashMap<(NodeId, usize), NodeId>,
    cache: AHashMap<NodeId, String>,
    visiting: AHashSet<NodeId>,
    names: NameAllocator,
    constants: Vec<Constant>,
    calibrations: Vec<CalibrationEntry>,
}

impl<'c, 'g> Resolver<'c, 'g> {
    pub(super) fn new(compiler: &'c Compiler<'g>) -> Self {
        let graph = compiler.graph();
        let nodes = graph.nodes().iter().map(|n| (n.id, n)).collect();
        let incoming = graph
            .links()
            .iter()
            .map(|l| ((l.target_id, l.target_port), l.origin_id))
            .collect();

        Self {
            compiler,
            nodes,
            incoming,
            cache: AHashMap::new(),
            visiting: AHashSet::new(),
            names: NameAllocator::new("calib"),
            constants: Vec::new(),
            calibrations: Vec::new(),
        }
    }

    /// Registers every constant node in creation order, so the first node with
    /// a given name decides its value regardless of traversal order.
    pub(super) fn register_constants(&mut self) {
        let compiler = self.compiler;
        for node in compiler.graph().nodes() {
            if let Role::Constant = compiler.role_of(node) {
                self.register_constant(node);
            }
        }
    }

    /// Resolves whatever feeds `target`'s input port. Empty when unconnected.
    pub(super) fn resolve_input(&mut self, target: NodeId, port: usize) -> Result<String, CompileError> {
        match self.incoming.get(&(target, port)).copied() {
            Some(origin) => self.resolve(origin),
            None => Ok(String::new()),
        }
    }

    pub(super) fn resolve(&mut self, root: NodeId) -> Result<String, CompileError> {
        if let Some(value) = self.cache.get(&root) {
            return Ok(value.clone());
        }

        let mut stack = vec![Frame {
            id: root,
            expanded: false,
        }];
        while let Some(frame) = stack.last_mut() {
            let id = frame.id;
            if self.cache.contains_key(&id) {
                stack.pop();
                continue;
            }

            if !frame.expanded {
                if !self.visiting.insert(id) {
                    return Err(CompileError::CycleDetected { node_id: id });
                }
                frame.expanded = true;
                let dependencies = self.dependencies(id);
                for dep in dependencies.into_iter().rev() {
                    if !self.cache.contains_key(&dep) {
                        stack.push(Frame {
                            id: dep,
                            expanded: false,
                        });
                    }
                }
            } else {
                stack.pop();
                let value = self.lower(id);
                trace!(node_id = %id, symbol = %value, "resolved node");
                self.visiting.remove(&id);
                self.cache.insert(id, value);
            }
        }

        Ok(self.cache.get(&root).cloned().unwrap_or_default())
    }

    pub(super) fn finish(self) -> (Vec<Constant>, Vec<CalibrationEntry>) {
        (self.constants, self.calibrations)
    }

    /// Origins of the node's connected input ports, in port order.
    fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        match self.compiler.role_of(node) {
            Role::Process(parser) => (0..parser.arity())
                .filter_map(|port| self.incoming.get(&(id, port)).copied())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Computes a node's symbol once all its dependencies are cached.
    fn lower(&mut self, id: NodeId) -> String {
        let Some(node) = self.nodes.get(&id).copied() else {
            warn!(node_id = %id, "link references a node that is not in the graph");
            return String::new();
        };
        let compiler = self.compiler;
        match compiler.role_of(node) {
            Role::Sensor => node
                .properties
                .text("variable_name")
                .unwrap_or_else(|| format!("var_{}", id)),
            Role::Constant => self.register_constant(node),
            Role::Process(parser) => {
                let inputs: Vec<String> = (0..parser.arity())
                    .map(|port| self.input_symbol(id, port))
                    .collect();
                let parsed = parser.parse(node, &inputs);
                let name = self.names.next_name();
                self.calibrations.push(CalibrationEntry {
                    name: name.clone(),
                    source: parsed.source,
                    expr: parsed.expr,
                    description: parsed.description,
                });
                name
            }
            Role::Status | Role::Telemetry | Role::Opaque => String::new(),
        }
    }

    fn input_symbol(&self, id: NodeId, port: usize) -> String {
        self.incoming
            .get(&(id, port))
            .and_then(|origin| self.cache.get(origin))
            .cloned()
            .unwrap_or_default()
    }

    /// Adds the constant to the table unless its name is taken; returns the name.
    fn register_constant(&mut self, node: &Node) -> String {
        let props = &node.properties;
        let name = props
            .text("name")
            .unwrap_or_else(|| format!("const_{}", node.id));
        if !self.constants.iter().any(|c| c.name == name) {
            let value = props
                .get("value")
                .cloned()
                .unwrap_or(PropertyValue::Number(0.0));
            self.constants.push(Constant {
                name: name.clone(),
                value,
            });
        }
        name
    }
}
