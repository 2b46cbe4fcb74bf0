use super::RelationMatrix;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecMatrix {
  edges: Vec<Vec<bool>>,
}

impl RelationMatrix for VecMatrix {
  fn from_rows(edges: Vec<Vec<bool>>) -> Self {
    for row in edges.iter() {
      assert_eq!(edges.len(), row.len());
    }
    Self { edges }
  }
  fn len(&self) -> usize {
    self.edges.len()
  }
  fn get(&self, row: usize, col: usize) -> bool {
    self.edges[row][col]
  }
  fn set(&mut self, row: usize, col: usize, value: bool) {
    self.edges[row][col] = value;
  }
  fn grow(&mut self, count: usize) {
    let size = self.len() + count;
    for edge in self.edges.iter_mut() {
      edge.extend(std::iter::repeat(false).take(count));
    }
    self.edges.extend((0..count).map(|_| vec![false; size]));
  }
}
