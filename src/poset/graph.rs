use serde::{Deserialize, Serialize};

use crate::basics::Class;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub id: usize,
  pub class: Class,
  /// Supplied as an input class rather than derived.
  pub input: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
  pub parent: usize,
  pub child: usize,
  /// The child has more than one parent.
  pub multi_parent: bool,
}

/// Node/edge list handed to whatever draws the graph.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PosetGraph {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl PosetGraph {
  pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
    self.edges.iter().filter(move |e| e.parent == parent).map(|e| e.child)
  }
  pub fn parents(&self, child: usize) -> impl Iterator<Item = usize> + '_ {
    self.edges.iter().filter(move |e| e.child == child).map(|e| e.parent)
  }
}
