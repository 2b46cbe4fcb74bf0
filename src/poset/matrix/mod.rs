mod bitvec;
pub use self::bitvec::*;
mod raw;
pub use raw::*;

use rayon::prelude::*;

/// A square boolean matrix. `get(i, j)` reads as "i is related to j".
pub trait RelationMatrix: Clone + Sync + Send {
  fn from_rows(rows: Vec<Vec<bool>>) -> Self;
  fn len(&self) -> usize;
  fn get(&self, row: usize, col: usize) -> bool;
  fn set(&mut self, row: usize, col: usize, value: bool);
  /// Appends `count` rows and columns, all false.
  fn grow(&mut self, count: usize);

  fn zeros(size: usize) -> Self {
    Self::from_rows(vec![vec![false; size]; size])
  }
  fn is_empty(&self) -> bool {
    self.len() == 0
  }
  fn row(&self, row: usize) -> Vec<bool> {
    (0..self.len()).map(|col| self.get(row, col)).collect()
  }
  fn column(&self, col: usize) -> Vec<bool> {
    (0..self.len()).map(|row| self.get(row, col)).collect()
  }
  fn and(&self, other: &Self) -> Self {
    assert_eq!(self.len(), other.len());
    let rows: Vec<Vec<bool>> = (0..self.len())
      .into_par_iter()
      .map(|i| (0..self.len()).map(|j| self.get(i, j) && other.get(i, j)).collect())
      .collect();
    Self::from_rows(rows)
  }
  fn not(&self) -> Self {
    let rows: Vec<Vec<bool>> = (0..self.len())
      .into_par_iter()
      .map(|i| (0..self.len()).map(|j| !self.get(i, j)).collect())
      .collect();
    Self::from_rows(rows)
  }
  /// Boolean product: `(A·B)[i][j] = OR over k of (A[i][k] AND B[k][j])`.
  fn product(&self, other: &Self) -> Self {
    assert_eq!(self.len(), other.len());
    let n = self.len();
    let rows: Vec<Vec<bool>> = (0..n)
      .into_par_iter()
      .map(|i| {
        let through = (0..n).filter(|&k| self.get(i, k)).collect::<Vec<_>>();
        (0..n).map(|j| through.iter().any(|&k| other.get(k, j))).collect()
      })
      .collect();
    Self::from_rows(rows)
  }
  /// Keeps only the links with nothing in between: `M ∧ ¬(M·M)`.
  fn reduction(&self) -> Self {
    self.and(&self.product(self).not())
  }
}
