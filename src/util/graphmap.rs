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

use super::graph::{EdgeStatus, Graph, NodeIndex};
use std::{collections::HashMap, hash::Hash};

/// A graph whose nodes are addressed by a unique key instead of an index.
#[derive(Debug)]
pub struct GraphMap<K: Eq + Hash + Clone, V, E> {
    graph: Graph<K, E>,
    map: HashMap<K, Node<V>>,
}

#[derive(Debug, PartialEq)]
pub struct Node<V>(V, NodeIndex);

impl<V> Node<V> {
    pub fn index(&self) -> NodeIndex {
        self.1
    }

    pub fn as_ref(&self) -> &V {
        &self.0
    }
}

impl<K: Eq + Hash + Clone, V, E> GraphMap<K, V, E> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            map: HashMap::new(),
        }
    }

    /// Inserts a node under `key`.
    ///
    /// Returns `None` if the key was already taken, leaving the existing node in place.
    pub fn add_node(&mut self, key: K, value: V) -> Option<NodeIndex> {
        if self.map.contains_key(&key) == true {
            return None;
        }
        let iden = self.graph.add_node(key.clone());
        self.map.insert(key, Node(value, iden));
        Some(iden)
    }

    pub fn add_edge_by_key(&mut self, source: &K, target: &K, cost: E) -> EdgeStatus {
        let source = match self.map.get(source) {
            Some(i) => i.index(),
            None => return EdgeStatus::MissingSource,
        };
        let target = match self.map.get(target) {
            Some(i) => i.index(),
            None => return EdgeStatus::MissingTarget,
        };
        self.graph.add_edge(source, target, cost)
    }

    pub fn get_node_by_key(&self, key: &K) -> Option<&Node<V>> {
        self.map.get(key)
    }

    /// Lists the keys of the nodes that `key` has an outgoing edge to, in
    /// the order the edges were added.
    pub fn successors(&self, key: &K) -> Vec<&K> {
        match self.map.get(key) {
            Some(n) => {
                let mut keys: Vec<&K> = self
                    .graph
                    .successors(n.index())
                    .filter_map(|i| self.graph.get_node(i))
                    .collect();
                keys.reverse();
                keys
            }
            None => Vec::new(),
        }
    }

    /// Lists the keys of the nodes that have an outgoing edge to `key`, in
    /// the order the edges were added.
    pub fn predecessors(&self, key: &K) -> Vec<&K> {
        match self.map.get(key) {
            Some(n) => {
                let mut keys: Vec<&K> = self
                    .graph
                    .predecessors(n.index())
                    .filter_map(|i| self.graph.get_node(i))
                    .collect();
                keys.reverse();
                keys
            }
            None => Vec::new(),
        }
    }

    /// Returns the key of the only node without incoming edges.
    pub fn find_root(&self) -> Option<&K> {
        match self.graph.find_root() {
            Ok(n) => self.graph.get_node(n),
            Err(_) => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn get_graph(&self) -> &Graph<K, E> {
        &self.graph
    }
}
