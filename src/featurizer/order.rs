use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use crate::poset::{ClassPoset, RelationMatrix, TOP};

/// Decides the order in which classes are visited.
pub trait SiblingOrder {
  /// Reorders the children of one class before they are visited.
  fn arrange<M: RelationMatrix>(poset: &ClassPoset<M>, siblings: &mut Vec<usize>);

  /// Every class of the poset, breadth first from the alphabet.
  fn schedule<M: RelationMatrix>(poset: &ClassPoset<M>) -> Vec<usize> {
    let mut order = vec![TOP];
    let mut visited = HashSet::from([TOP]);
    let mut queue = VecDeque::from([TOP]);
    while let Some(node) = queue.pop_front() {
      let mut children = poset.children_of(node);
      Self::arrange(poset, &mut children);
      for child in children {
        if visited.insert(child) {
          order.push(child);
          queue.push_back(child);
        }
      }
    }
    order
  }
}

/// Larger siblings first, so a smaller one can fall out as a complement.
/// Ties keep poset order.
pub struct LargestFirst {}

impl SiblingOrder for LargestFirst {
  fn arrange<M: RelationMatrix>(poset: &ClassPoset<M>, siblings: &mut Vec<usize>) {
    siblings.sort_by_key(|&i| Reverse(poset.class(i).len()));
  }
}

/// Poset order throughout. Correct, but may mint more features.
pub struct InsertionOrder {}

impl SiblingOrder for InsertionOrder {
  fn arrange<M: RelationMatrix>(_: &ClassPoset<M>, _: &mut Vec<usize>) {}

  fn schedule<M: RelationMatrix>(poset: &ClassPoset<M>) -> Vec<usize> {
    (0..poset.len()).collect()
  }
}
