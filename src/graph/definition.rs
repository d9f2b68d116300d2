use super::{Properties, PropertyValue};
use crate::error::GraphError;
use crate::registry::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, assigned monotonically by the owning [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identifier of a link, assigned monotonically by the owning [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed unit of the protocol graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub properties: Properties,
}

impl Node {
    /// A node carrying the registry's default properties for its type.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let properties = kind.default_properties();
        Self::with_properties(id, kind, properties)
    }

    /// A node carrying exactly `properties`. Unset keys fall back to the
    /// compiler's per-type defaults rather than the editor's.
    pub fn with_properties(id: NodeId, kind: NodeKind, properties: Properties) -> Self {
        Self {
            id,
            kind,
            properties,
        }
    }

    pub fn inputs(&self) -> &'static [&'static str] {
        self.kind.inputs()
    }

    pub fn outputs(&self) -> &'static [&'static str] {
        self.kind.outputs()
    }
}

/// A directed edge from an output port of one node to an input port of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub origin_id: NodeId,
    pub origin_port: usize,
    pub target_id: NodeId,
    pub target_port: usize,
}

/// The node graph owned by an editor session.
///
/// Nodes are kept in creation order, which is the canonical iteration order
/// used by the compiler. An input port accepts a single producer: connecting
/// a second link to the same target port replaces the first one.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_node_id: u64,
    next_link_id: u32,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            next_node_id: 1,
            next_link_id: 1,
        }
    }

    /// Places a node of the given type with the registry's default properties.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.allocate_node_id();
        self.nodes.push(Node::new(id, kind));
        id
    }

    /// Places a node whose default properties are overlaid with `overrides`.
    /// Keys outside the type's schema are kept as given.
    pub fn add_node_with(
        &mut self,
        kind: NodeKind,
        overrides: impl IntoIterator<Item = (String, PropertyValue)>,
    ) -> NodeId {
        let id = self.allocate_node_id();
        let mut node = Node::new(id, kind);
        for (key, value) in overrides {
            node.properties.insert(key, value);
        }
        self.nodes.push(node);
        id
    }

    /// Inserts a fully formed node, keeping its id. Used by importers.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.node(node.id).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        self.next_node_id = self.next_node_id.max(u64::from(id.0) + 1);
        self.nodes.push(node);
        Ok(id)
    }

    pub fn set_property(
        &mut self,
        id: NodeId,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Option<PropertyValue>, GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))?;
        if !node.kind.accepts_property(key) {
            return Err(GraphError::UnknownProperty {
                node_id: id,
                node_type: node.kind.tag().to_string(),
                key: key.to_string(),
            });
        }
        Ok(node.properties.insert(key, value))
    }

    /// Connects `origin`'s output port to `target`'s input port.
    ///
    /// Any link already ending at the same target port is removed first.
    /// Nodes of unknown type have no declared ports and accept any index.
    pub fn connect(
        &mut self,
        origin_id: NodeId,
        origin_port: usize,
        target_id: NodeId,
        target_port: usize,
    ) -> Result<LinkId, GraphError> {
        let origin = self.node(origin_id).ok_or(GraphError::NodeNotFound(origin_id))?;
        check_port(origin, origin_port, "output", origin.outputs())?;
        let target = self.node(target_id).ok_or(GraphError::NodeNotFound(target_id))?;
        check_port(target, target_port, "input", target.inputs())?;

        self.links
            .retain(|l| !(l.target_id == target_id && l.target_port == target_port));

        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;
        self.links.push(Link {
            id,
            origin_id,
            origin_port,
            target_id,
            target_port,
        });
        Ok(id)
    }

    pub fn disconnect(&mut self, id: LinkId) -> Result<Link, GraphError> {
        let index = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(GraphError::LinkNotFound(id))?;
        Ok(self.links.remove(index))
    }

    /// Removes a node together with every link touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))?;
        self.links.retain(|l| l.origin_id != id && l.target_id != id);
        Ok(self.nodes.remove(index))
    }

    pub fn clear(&mut self) {
        *self = Graph::new();
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn nodes_of_kind<'a>(&'a self, kind: &'a NodeKind) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| &n.kind == kind)
    }

    /// The link feeding `target`'s input port, if any.
    pub fn incoming(&self, target_id: NodeId, target_port: usize) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.target_id == target_id && l.target_port == target_port)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids grow monotonically; once an imported id has used up the `u32`
    /// range, the lowest free id is handed out instead.
    fn allocate_node_id(&mut self) -> NodeId {
        if let Ok(next) = u32::try_from(self.next_node_id) {
            self.next_node_id += 1;
            return NodeId(next);
        }
        let mut taken: Vec<u32> = self.nodes.iter().map(|n| n.id.0).collect();
        taken.sort_unstable();
        let mut candidate = 1;
        for id in taken {
            if id > candidate {
                break;
            }
            if id == candidate {
                candidate += 1;
            }
        }
        NodeId(candidate)
    }
}

fn check_port(
    node: &Node,
    port: usize,
    direction: &'static str,
    ports: &[&str],
) -> Result<(), GraphError> {
    if matches!(node.kind, NodeKind::Unknown(_)) || port < ports.len() {
        return Ok(());
    }
    Err(GraphError::PortOutOfRange {
        node_id: node.id,
        port,
        direction,
        available: ports.len(),
    })
}
