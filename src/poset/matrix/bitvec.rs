use sucds::bit_vectors::{prelude::*, BitVector};

use super::RelationMatrix;

/// Rows packed into bit vectors. The default matrix behind `ClassPoset`.
#[derive(Clone, Default)]
pub struct BitMatrix {
  edges: Vec<BitVector>,
}

impl RelationMatrix for BitMatrix {
  fn from_rows(edges: Vec<Vec<bool>>) -> Self {
    for row in edges.iter() {
      assert_eq!(edges.len(), row.len());
    }
    Self {
      edges: edges.into_iter().map(BitVector::from_bits).collect(),
    }
  }
  fn zeros(size: usize) -> Self {
    Self {
      edges: (0..size).map(|_| BitVector::from_bit(false, size)).collect(),
    }
  }
  fn len(&self) -> usize {
    self.edges.len()
  }
  fn get(&self, row: usize, col: usize) -> bool {
    assert!(col < self.len());
    self.edges[row].access(col).unwrap_or(false)
  }
  fn set(&mut self, row: usize, col: usize, value: bool) {
    assert!(col < self.len());
    self.edges[row]
      .set_bit(col, value)
      .expect("column checked against the matrix size");
  }
  fn row(&self, row: usize) -> Vec<bool> {
    self.edges[row].iter().collect()
  }
  fn grow(&mut self, count: usize) {
    let size = self.len() + count;
    for edge in self.edges.iter_mut() {
      edge.extend(std::iter::repeat(false).take(count));
    }
    self.edges.extend((0..count).map(|_| BitVector::from_bit(false, size)));
  }
}

impl std::fmt::Debug for BitMatrix {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let rows = self
      .edges
      .iter()
      .map(|edge| edge.iter().map(|bit| if bit { '1' } else { '0' }).collect::<String>())
      .collect::<Vec<_>>();
    f.debug_struct("BitMatrix").field("edges", &rows).finish()
  }
}
