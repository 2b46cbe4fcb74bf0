mod graph;
pub use graph::*;
pub mod matrix;
pub use matrix::*;

use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

use crate::basics::Class;
use crate::error::{Error, Result};

/// Index of the alphabet in every poset.
pub const TOP: usize = 0;

/// The class collection together with its subset and daughter relations.
///
/// `subsets[i][j]` holds iff class `j` is a proper subset of class `i`, and
/// `daughters` is its reduction: `daughters[i][j]` holds iff `j` is a direct
/// child of `i`. The alphabet always sits at index [`TOP`];
/// classes are only ever appended, so indices stay valid as the poset grows.
#[derive(Clone, Debug)]
pub struct ClassPoset<M: RelationMatrix = BitMatrix> {
  classes: Vec<Class>,
  input: Vec<bool>,
  index: HashMap<Class, usize>,
  subsets: M,
  daughters: M,
}

impl<M: RelationMatrix> ClassPoset<M> {
  /// Builds the poset from the alphabet and the input classes. Duplicates and
  /// empty classes are dropped; no intersections are computed.
  pub fn new(alphabet: Class, input_classes: impl IntoIterator<Item = Class>) -> Result<Self> {
    if alphabet.is_empty() {
      return Err(Error::InvalidInput("the alphabet is empty".into()));
    }
    let mut poset = Self {
      classes: vec![],
      input: vec![],
      index: HashMap::new(),
      subsets: M::zeros(0),
      daughters: M::zeros(0),
    };
    poset.insert(vec![alphabet]);
    let mut inputs = vec![];
    for class in input_classes {
      if poset.admit(&class)? {
        if !inputs.contains(&class) {
          inputs.push(class);
        }
      } else if let Some(i) = poset.index_of(&class) {
        poset.input[i] = true;
      }
    }
    let inserted = poset.insert(inputs);
    for i in inserted {
      poset.input[i] = true;
    }
    Ok(poset)
  }

  /// Whether `class` may join the poset as a new member.
  fn admit(&self, class: &Class) -> Result<bool> {
    if !class.is_subset(self.alphabet()) {
      return Err(Error::InvalidInput(format!(
        "class {} is not a subset of the alphabet {}",
        class,
        self.alphabet()
      )));
    }
    Ok(!class.is_empty() && !self.contains(class))
  }

  /// Inserts `class` unless an equal class is already present. Does not
  /// compute intersections.
  pub fn add_class(&mut self, class: Class) -> Result<bool> {
    Ok(!self.add_classes([class])?.is_empty())
  }

  /// Inserts every new class and returns their indices. The daughter relation
  /// is derived once for the whole batch.
  pub fn add_classes(&mut self, classes: impl IntoIterator<Item = Class>) -> Result<Vec<usize>> {
    let mut fresh: Vec<Class> = vec![];
    for class in classes {
      if self.admit(&class)? && !fresh.contains(&class) {
        fresh.push(class);
      }
    }
    Ok(self.insert(fresh))
  }

  fn insert(&mut self, fresh: Vec<Class>) -> Vec<usize> {
    if fresh.is_empty() {
      return vec![];
    }
    let start = self.len();
    self.subsets.grow(fresh.len());
    for class in fresh {
      let n = self.classes.len();
      for (k, other) in self.classes.iter().enumerate() {
        if class.is_subset(other) {
          self.subsets.set(k, n, true);
        } else if other.is_subset(&class) {
          self.subsets.set(n, k, true);
        }
      }
      self.index.insert(class.clone(), n);
      self.classes.push(class);
      self.input.push(false);
    }
    self.daughters = self.subsets.reduction();
    trace!("poset grew from {} to {} classes", start, self.len());
    #[cfg(debug_assertions)]
    self.check();
    (start..self.len()).collect()
  }

  pub fn len(&self) -> usize {
    self.classes.len()
  }
  pub fn is_empty(&self) -> bool {
    self.classes.is_empty()
  }
  pub fn alphabet(&self) -> &Class {
    &self.classes[TOP]
  }
  pub fn classes(&self) -> &[Class] {
    &self.classes
  }
  pub fn class(&self, index: usize) -> &Class {
    &self.classes[index]
  }
  pub fn index_of(&self, class: &Class) -> Option<usize> {
    self.index.get(class).copied()
  }
  pub fn contains(&self, class: &Class) -> bool {
    self.index.contains_key(class)
  }
  fn position(&self, class: &Class) -> Result<usize> {
    self.index_of(class).ok_or_else(|| Error::NotFound(class.clone()))
  }

  pub fn is_input(&self, class: &Class) -> bool {
    self.index_of(class).map_or(false, |i| self.input[i])
  }
  pub fn input_classes(&self) -> impl Iterator<Item = &Class> + '_ {
    self.classes.iter().zip(self.input.iter()).filter(|(_, &input)| input).map(|(c, _)| c)
  }

  pub fn parents_of(&self, index: usize) -> Vec<usize> {
    (0..self.len()).filter(|&i| self.daughters.get(i, index)).collect()
  }
  pub fn children_of(&self, index: usize) -> Vec<usize> {
    (0..self.len()).filter(|&j| self.daughters.get(index, j)).collect()
  }
  pub fn parents(&self, class: &Class) -> Result<Vec<&Class>> {
    let index = self.position(class)?;
    Ok(self.parents_of(index).into_iter().map(|i| &self.classes[i]).collect())
  }
  pub fn children(&self, class: &Class) -> Result<Vec<&Class>> {
    let index = self.position(class)?;
    Ok(self.children_of(index).into_iter().map(|i| &self.classes[i]).collect())
  }

  /// `sub ⊆ sup`, read from the subset relation.
  pub fn is_subset(&self, sub: &Class, sup: &Class) -> Result<bool> {
    let i = self.position(sup)?;
    let j = self.position(sub)?;
    Ok(i == j || self.subsets.get(i, j))
  }
  /// Whether class `sub` is a proper subset of class `sup`, by index.
  pub fn is_below(&self, sub: usize, sup: usize) -> bool {
    self.subsets.get(sup, sub)
  }

  /// Every class reachable upwards through the daughter relation.
  pub fn ancestors_of(&self, index: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = self.parents_of(index);
    while let Some(i) = stack.pop() {
      if seen.insert(i) {
        stack.extend(self.parents_of(i));
      }
    }
    seen
  }

  pub fn graph(&self) -> PosetGraph {
    let nodes = self
      .classes
      .iter()
      .enumerate()
      .map(|(id, class)| Node { id, class: class.clone(), input: self.input[id] })
      .collect();
    let edges = (0..self.len())
      .flat_map(|child| {
        let parents = self.parents_of(child);
        let multi_parent = parents.len() > 1;
        parents.into_iter().map(move |parent| Edge { parent, child, multi_parent })
      })
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();
    PosetGraph { nodes, edges }
  }

  #[cfg_attr(not(debug_assertions), allow(dead_code))]
  fn check(&self) {
    assert_eq!(self.len(), self.subsets.len());
    assert_eq!(self.len(), self.daughters.len());
    assert_eq!(self.len(), self.index.len());
    (0..self.len()).into_par_iter().for_each(|i| {
      assert!(!self.subsets.get(i, i));
      assert!(i == TOP || self.subsets.get(TOP, i));
      (0..self.len()).for_each(|j| {
        assert!(!self.subsets.get(i, j) || !self.subsets.get(j, i));
        assert!(!self.daughters.get(i, j) || self.subsets.get(i, j));
      })
    });
  }
}
