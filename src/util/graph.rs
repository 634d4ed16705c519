//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

/// Basic graph data structure
/// - source: http://smallcultfollowing.com/babysteps/blog/2015/04/06/modeling-graphs-in-rust-using-vector-indices/
pub type NodeIndex = usize;

#[derive(Debug, PartialEq)]
struct NodeData<V> {
    node: V,
    first_outgoing_edge: Option<EdgeIndex>,
    first_incoming_edge: Option<EdgeIndex>,
}

type EdgeIndex = usize;

#[derive(Debug, PartialEq)]
struct EdgeData<E> {
    edge: E,
    source: NodeIndex,
    target: NodeIndex,
    next_outgoing_edge: Option<EdgeIndex>,
    next_incoming_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
pub struct Graph<V, E> {
    vertices: Vec<NodeData<V>>,
    edges: Vec<EdgeData<E>>,
}

impl<V, E> Graph<V, E> {
    /// Creates an empty `Graph` struct.
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Adds a new node to the graph.
    ///
    /// Returns the `NodeIndex` to remember the node.
    pub fn add_node(&mut self, node: V) -> NodeIndex {
        let index = self.vertices.len();
        self.vertices.push(NodeData {
            node: node,
            first_outgoing_edge: None,
            first_incoming_edge: None,
        });
        index
    }

    /// Checks if a given `source` node is connected to the given `target` node.
    pub fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        let mut successors = self.successors(source);
        successors.find(|f| f == &target).is_some()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Accesses the node data label behind the `node` index.
    pub fn get_node(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.vertices.get(node)?.node)
    }

    /// Adds a new edge to the graph from `source` to `target`.
    ///
    /// Duplicate edges and self-loops are rejected and leave the graph unchanged.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, cost: E) -> EdgeStatus {
        if source >= self.node_count() {
            return EdgeStatus::MissingSource;
        }
        if target >= self.node_count() {
            return EdgeStatus::MissingTarget;
        }
        // do not allow self-loops
        if source == target {
            return EdgeStatus::SelfLoop;
        }
        // do not allow duplicate edges
        if self.has_edge(source, target) == true {
            return EdgeStatus::AlreadyExists;
        }

        let edge_index = self.edges.len();
        let next_outgoing_edge = self.vertices[source].first_outgoing_edge;
        let next_incoming_edge = self.vertices[target].first_incoming_edge;
        self.edges.push(EdgeData {
            source: source,
            edge: cost,
            target: target,
            next_outgoing_edge: next_outgoing_edge,
            next_incoming_edge: next_incoming_edge,
        });
        self.vertices[source].first_outgoing_edge = Some(edge_index);
        self.vertices[target].first_incoming_edge = Some(edge_index);
        EdgeStatus::Success
    }

    /// Returns the number of successors to the `source` node.
    pub fn out_degree(&self, source: NodeIndex) -> usize {
        self.successors(source).count()
    }

    /// Returns the number of predecessors to the `target` node.
    pub fn in_degree(&self, target: NodeIndex) -> usize {
        self.predecessors(target).count()
    }

    /// Creates an iterator over the incoming nodes to the `target` node.
    ///
    /// Nodes are visited from the most recently connected edge to the oldest.
    pub fn predecessors(&self, target: NodeIndex) -> Predecessors<V, E> {
        let first_incoming_edge = self.vertices.get(target).and_then(|n| n.first_incoming_edge);
        Predecessors {
            graph: self,
            current_edge_index: first_incoming_edge,
        }
    }

    /// Creates an iterator over the outgoing nodes from the `source` node.
    ///
    /// Nodes are visited from the most recently connected edge to the oldest.
    pub fn successors(&self, source: NodeIndex) -> Successors<V, E> {
        let first_outgoing_edge = self.vertices.get(source).and_then(|n| n.first_outgoing_edge);
        Successors {
            graph: self,
            current_edge_index: first_outgoing_edge,
        }
    }

    /// Determines which node has zero incoming edges as the 'root' node.
    ///
    /// Returns the list of candidates (potentially zero) as an err if there is
    /// not just a definite single root.
    pub fn find_root(&self) -> Result<NodeIndex, Vec<NodeIndex>> {
        let roots: Vec<NodeIndex> = self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n.first_incoming_edge {
                None => Some(i),
                Some(_) => None,
            })
            .collect();
        match roots.len() {
            1 => Ok(roots[0]),
            _ => Err(roots),
        }
    }

    /// Performs topological sort such that every node appears after all of its
    /// successors.
    ///
    /// Returns `None` if the graph contains a cycle.
    pub fn topological_sort(&self) -> Option<Vec<NodeIndex>> {
        let mut order = Vec::<NodeIndex>::with_capacity(self.node_count());
        // number of successors not yet placed into the order
        let mut remaining: Vec<usize> = (0..self.node_count())
            .map(|i| self.out_degree(i))
            .collect();
        let mut ready: Vec<NodeIndex> = remaining
            .iter()
            .enumerate()
            .filter_map(|(i, r)| if *r == 0 { Some(i) } else { None })
            .rev()
            .collect();
        while let Some(current) = ready.pop() {
            order.push(current);
            for p in self.predecessors(current) {
                remaining[p] -= 1;
                if remaining[p] == 0 {
                    ready.push(p);
                }
            }
        }
        match order.len() == self.node_count() {
            true => Some(order),
            false => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum EdgeStatus {
    MissingSource,
    MissingTarget,
    SelfLoop,
    AlreadyExists,
    Success,
}

impl EdgeStatus {
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Success => true,
            _ => false,
        }
    }
}

pub struct Predecessors<'graph, V, E> {
    graph: &'graph Graph<V, E>,
    current_edge_index: Option<EdgeIndex>,
}

impl<'graph, V, E> Iterator for Predecessors<'graph, V, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        match self.current_edge_index {
            None => None,
            Some(edge_num) => {
                let edge = &self.graph.edges[edge_num];
                self.current_edge_index = edge.next_incoming_edge;
                Some(edge.source)
            }
        }
    }
}

pub struct Successors<'graph, V, E> {
    graph: &'graph Graph<V, E>,
    current_edge_index: Option<EdgeIndex>,
}

impl<'graph, V, E> Iterator for Successors<'graph, V, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        match self.current_edge_index {
            None => None,
            Some(edge_num) => {
                let edge = &self.graph.edges[edge_num];
                self.current_edge_index = edge.next_outgoing_edge;
                Some(edge.target)
            }
        }
    }
}
