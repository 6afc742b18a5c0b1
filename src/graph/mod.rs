use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::math::Point3;

new_key_type! {
    /// Unique identifier for a welded node in a mesh graph.
    pub struct NodeId;
}

/// Data associated with one welded graph node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Representative position: the first input vertex welded into this node.
    pub position: Point3,
}

impl NodeData {
    /// Creates a new node at the given position.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self { position }
    }
}

/// Undirected weighted graph derived from one triangulated mesh.
///
/// Nodes are welded vertices; edges connect nodes that co-occur in at least
/// one non-degenerate triangle, weighted by the Euclidean distance between
/// their representative positions. A graph is built fresh for each path
/// query, owned by that query, and discarded when it returns.
#[derive(Debug, Default)]
pub struct MeshGraph {
    nodes: SlotMap<NodeId, NodeData>,
    adjacency: SecondaryMap<NodeId, Vec<(NodeId, f64)>>,
    index_to_node: Vec<NodeId>,
    edge_count: usize,
}

impl MeshGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and returns its ID.
    ///
    /// Keys are handed out monotonically, so comparing two `NodeId`s orders
    /// nodes by insertion.
    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Records that input vertex index `self.input_vertex_count()` maps to
    /// `node`. Must be called once per input vertex, in input order.
    pub fn map_input_vertex(&mut self, node: NodeId) {
        self.index_to_node.push(node);
    }

    /// Inserts the undirected edge `a`—`b` with the given weight.
    ///
    /// Returns `false` without modifying the graph when the edge is already
    /// present. Adjacency lists on manifold meshes are short, so presence is
    /// checked with a linear scan.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool {
        if a == b {
            return false;
        }
        if let Some(list) = self.adjacency.get(a) {
            if list.iter().any(|&(n, _)| n == b) {
                return false;
            }
        }
        if let Some(list) = self.adjacency.get_mut(a) {
            list.push((b, weight));
        }
        if let Some(list) = self.adjacency.get_mut(b) {
            list.push((a, weight));
        }
        self.edge_count += 1;
        true
    }

    /// Returns the node data, if the node exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Returns the neighbors of `id` with their edge weights.
    #[must_use]
    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        self.adjacency.get(id).map_or(&[], Vec::as_slice)
    }

    /// Returns the welded node that input vertex `index` maps to.
    #[must_use]
    pub fn node_of_input(&self, index: usize) -> Option<NodeId> {
        self.index_to_node.get(index).copied()
    }

    /// Number of welded nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of input vertices mapped so far.
    #[must_use]
    pub fn input_vertex_count(&self) -> usize {
        self.index_to_node.len()
    }
}
