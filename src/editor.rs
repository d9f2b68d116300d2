//! The visual editor's JSON export format.
//!
//! Field names follow the editor's own export; the camel-case and legacy
//! spellings are accepted as aliases.

use crate::error::GraphConversionError;
use crate::graph::{Graph, IntoGraph, Node, NodeId, Properties, PropertyValue};
use crate::registry::NodeKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Editor node with its type tag and property panel values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorNode {
    pub id: u32,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Editor link between an output port and an input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(alias = "from")]
    pub origin_id: u32,
    #[serde(default, alias = "fromPort")]
    pub origin_port: usize,
    #[serde(alias = "to")]
    pub target_id: u32,
    #[serde(default, alias = "toPort")]
    pub target_port: usize,
}

/// Complete editor export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorGraph {
    #[serde(alias = "_nodes")]
    pub nodes: Vec<EditorNode>,
    #[serde(default, alias = "connections", deserialize_with = "links_list_or_map")]
    pub links: Vec<EditorLink>,
}

/// The editor stores links either as a list or as an object keyed by link id.
fn links_list_or_map<'de, D>(deserializer: D) -> Result<Vec<EditorLink>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Links {
        List(Vec<EditorLink>),
        Map(BTreeMap<String, EditorLink>),
    }

    Ok(match Links::deserialize(deserializer)? {
        Links::List(links) => links,
        Links::Map(links) => {
            let mut links: Vec<EditorLink> = links.into_values().collect();
            links.sort_by_key(|l| l.id);
            links
        }
    })
}

impl EditorGraph {
    pub fn from_json_str(json: &str) -> Result<Self, GraphConversionError> {
        serde_json::from_str(json).map_err(|e| GraphConversionError::JsonParseError(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, GraphConversionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphConversionError::JsonParseError(e.to_string()))
    }

    /// Exports a graph in the editor's format.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| EditorNode {
                id: node.id.0,
                node_type: node.kind.tag().to_string(),
                properties: node
                    .properties
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            })
            .collect();
        let links = graph
            .links()
            .iter()
            .map(|link| EditorLink {
                id: Some(link.id.0),
                origin_id: link.origin_id.0,
                origin_port: link.origin_port,
                target_id: link.target_id.0,
                target_port: link.target_port,
            })
            .collect();
        Self { nodes, links }
    }
}

impl IntoGraph for EditorGraph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        let mut graph = Graph::new();

        for editor_node in self.nodes {
            let mut properties = Properties::new();
            for (key, value) in &editor_node.properties {
                match PropertyValue::from_json(value) {
                    Some(value) => {
                        properties.insert(key.as_str(), value);
                    }
                    None => {
                        warn!(node_id = editor_node.id, key = %key, "dropping non-scalar property");
                    }
                }
            }
            // Only what the export carries; missing keys use the compile-time defaults.
            let node = Node::with_properties(
                NodeId(editor_node.id),
                NodeKind::from_tag(&editor_node.node_type),
                properties,
            );
            graph.insert_node(node).map_err(|e| {
                GraphConversionError::ValidationError(format!("Invalid node list: {}", e))
            })?;
        }

        for link in self.links {
            graph.connect(
                NodeId(link.origin_id),
                link.origin_port,
                NodeId(link.target_id),
                link.target_port,
            )?;
        }

        debug!(nodes = graph.len(), links = graph.links().len(), "imported editor graph");
        Ok(graph)
    }
}
