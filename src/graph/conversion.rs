use super::definition::Graph;
use crate::error::GraphConversionError;

/// A trait for editor export formats that can be converted into a [`Graph`].
///
/// This is the seam between whatever the editor saved (its JSON export, a
/// template file, a test fixture) and the canonical graph model the compiler
/// reads. The bundled [`EditorGraph`](crate::editor::EditorGraph) implements it
/// for the visual editor's JSON export.
///
/// # Example
///
/// ```rust,no_run
/// use rivo_protocol::error::GraphConversionError;
/// use rivo_protocol::graph::{Graph, IntoGraph, PropertyValue};
/// use rivo_protocol::registry::NodeKind;
///
/// struct SensorList { variables: Vec<String> }
///
/// impl IntoGraph for SensorList {
///     fn into_graph(self) -> Result<Graph, GraphConversionError> {
///         let mut graph = Graph::new();
///         for name in self.variables {
///             graph.add_node_with(
///                 NodeKind::Sensor,
///                 [("variable_name".to_string(), PropertyValue::from(name))],
///             );
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a node graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}

impl IntoGraph for Graph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        Ok(self)
    }
}
