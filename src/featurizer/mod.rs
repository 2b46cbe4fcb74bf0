mod order;
pub use order::*;
mod specification;
pub use specification::*;

use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::marker::PhantomData;
use tracing::{debug, info};

use crate::basics::{Class, FeatureValue, Segment, Value};
use crate::closure::{Closure, PairClosure};
use crate::error::{Error, Result};
use crate::input::ClassList;
use crate::poset::{BitMatrix, ClassPoset, Edge, PosetGraph, RelationMatrix, TOP};
use crate::report::{ClassDescription, Featurization, SegmentDescription};

/// Derives a feature system for a family of classes.
///
/// The input classes are closed under intersection on construction. Running
/// [`Featurizer::featurize`] walks the closed poset in the order given by `O`,
/// minting a feature for every class that has a single parent, and labelling
/// the complement of that class according to the [`Specification`]. Complement
/// classes that are not yet in the poset are added through the closure engine
/// `C`. The run ends by checking that every class is exactly the set of
/// segments sharing its feature values.
pub struct Featurizer<O: SiblingOrder = LargestFirst, C: Closure = PairClosure> {
  specification: Specification,
  alphabet: Class,
  input_classes: Vec<Class>,
  poset: ClassPoset,
  segment_features: BTreeMap<Segment, BTreeSet<FeatureValue>>,
  class_features: BTreeMap<Class, BTreeSet<FeatureValue>>,
  feature_count: usize,
  strategy: PhantomData<(O, C)>,
}

impl Featurizer {
  pub fn new(alphabet: Class, input_classes: Vec<Class>, specification: Specification) -> Result<Self> {
    Self::with_strategy(alphabet, input_classes, specification)
  }

  pub fn from_class_list(list: &ClassList, specification: Specification) -> Result<Self> {
    Self::new(list.alphabet.clone(), list.classes.clone(), specification)
  }
}

impl<O: SiblingOrder, C: Closure> Featurizer<O, C> {
  pub fn with_strategy(alphabet: Class, input_classes: Vec<Class>, specification: Specification) -> Result<Self> {
    let poset = Self::closed_poset(&alphabet, &input_classes)?;
    let segment_features = Self::blank_segments(&alphabet);
    Ok(Self {
      specification,
      alphabet,
      input_classes,
      poset,
      segment_features,
      class_features: BTreeMap::new(),
      feature_count: 0,
      strategy: PhantomData,
    })
  }

  fn closed_poset(alphabet: &Class, input_classes: &[Class]) -> Result<ClassPoset> {
    let mut poset = ClassPoset::new(alphabet.clone(), input_classes.iter().cloned())?;
    let added = C::close(&mut poset, None)?;
    info!(
      "closed {} input classes into {} classes ({} intersections added)",
      input_classes.len(),
      poset.len(),
      added
    );
    Ok(poset)
  }

  fn blank_segments(alphabet: &Class) -> BTreeMap<Segment, BTreeSet<FeatureValue>> {
    alphabet.iter().map(|segment| (segment.clone(), BTreeSet::new())).collect()
  }

  /// Back to the freshly closed input poset with no features assigned.
  pub fn reset(&mut self) -> Result<()> {
    self.poset = Self::closed_poset(&self.alphabet, &self.input_classes)?;
    self.segment_features = Self::blank_segments(&self.alphabet);
    self.class_features.clear();
    self.feature_count = 0;
    Ok(())
  }

  pub fn specification(&self) -> Specification {
    self.specification
  }
  pub fn alphabet(&self) -> &Class {
    &self.alphabet
  }
  pub fn poset(&self) -> &ClassPoset {
    &self.poset
  }
  pub fn feature_count(&self) -> usize {
    self.feature_count
  }

  pub fn featurize(&mut self) -> Result<Featurization> {
    if self.feature_count > 0 || !self.class_features.is_empty() {
      self.reset()?;
    }
    self.run(self.specification)?;
    if self.specification == Specification::Full {
      self.keep_smaller_full_system()?;
    }
    self.calculate_class_features();
    self.validate()?;
    info!(
      "{} specification: {} features over {} classes",
      self.specification,
      self.feature_count,
      self.poset.len()
    );
    Ok(self.report())
  }

  fn run(&mut self, specification: Specification) -> Result<()> {
    if specification.precomputes_complements() {
      self.add_complement_classes(specification)?;
    }
    self.featurize_classes(specification)
  }

  /// Any contrastive system becomes a full one by giving the `-` value of each
  /// feature to every segment outside its `+` class. The full walk can mint
  /// more features than that, so the widened contrastive system replaces it
  /// when it is strictly smaller.
  fn keep_smaller_full_system(&mut self) -> Result<()> {
    let direct = (
      self.poset.clone(),
      std::mem::take(&mut self.segment_features),
      self.feature_count,
    );
    self.reset()?;
    self.run(Specification::Contrastive)?;
    self.widen_to_alphabet()?;
    if self.feature_count < direct.2 {
      info!("widened contrastive system needs {} features, full walk {}", self.feature_count, direct.2);
    } else {
      (self.poset, self.segment_features, self.feature_count) = direct;
    }
    Ok(())
  }

  fn widen_to_alphabet(&mut self) -> Result<()> {
    let mut complements = vec![];
    for feature in 1..=self.feature_count {
      let complement = self.alphabet.difference(&self.segments_for_feature(FeatureValue::plus(feature)));
      self.set_segment_features(&complement, FeatureValue::minus(feature));
      complements.push(complement);
    }
    C::extend(&mut self.poset, complements)?;
    Ok(())
  }

  /// Adds the contrastive or full complement of every single-parent class
  /// before any feature is assigned, breadth first from the alphabet so that
  /// the queue of classes to featurize is not invalidated mid-run.
  fn add_complement_classes(&mut self, specification: Specification) -> Result<()> {
    let before = self.poset.len();
    let mut queue = VecDeque::from([TOP]);
    let mut visited = HashSet::from([TOP]);
    let mut considered = HashSet::new();

    while let Some(node) = queue.pop_front() {
      'rescan: loop {
        let mut children = self.poset.children_of(node);
        O::arrange(&self.poset, &mut children);
        for child in children {
          if !considered.insert(child) || self.poset.parents_of(child).len() != 1 {
            continue;
          }
          let Some(complement) =
            specification.complement(&self.alphabet, self.poset.class(node), self.poset.class(child))
          else {
            continue;
          };
          let added = C::extend(&mut self.poset, vec![complement.clone()])?;
          let index = self.poset.index_of(&complement).ok_or(Error::NotFound(complement))?;
          considered.insert(index);
          if visited.insert(index) {
            queue.push_back(index);
          }
          if added > 0 {
            // the new classes may sit between `node` and its other children
            continue 'rescan;
          }
        }
        break;
      }
      let mut children = self.poset.children_of(node);
      O::arrange(&self.poset, &mut children);
      for child in children {
        if visited.insert(child) {
          queue.push_back(child);
        }
      }
    }
    info!("added {} classes for {} complements", self.poset.len() - before, specification);
    Ok(())
  }

  fn featurize_classes(&mut self, specification: Specification) -> Result<()> {
    let mut pending = VecDeque::from(O::schedule(&self.poset));
    let mut complete = vec![false; self.poset.len()];

    while let Some(c) = pending.pop_front() {
      if complete[c] {
        continue;
      }
      complete[c] = true;
      let parents = self.poset.parents_of(c);
      let class = self.poset.class(c).clone();
      if parents.len() != 1 {
        debug!("{} has {} parents, no new feature", class, parents.len());
        continue;
      }

      self.feature_count += 1;
      let feature = self.feature_count;
      self.set_segment_features(&class, FeatureValue::plus(feature));
      debug!("feature {} marks {}", feature, class);

      let parent = self.poset.class(parents[0]);
      let Some(complement) = specification.complement(&self.alphabet, parent, &class) else {
        continue;
      };
      if specification == Specification::ContrastiveUnder && !self.poset.is_input(&complement) {
        debug!("complement {} is not an input class, left unspecified", complement);
        continue;
      }
      let index = match self.poset.index_of(&complement) {
        Some(index) => index,
        None => {
          let before = self.poset.len();
          C::extend(&mut self.poset, vec![complement.clone()])?;
          complete.resize(self.poset.len(), false);
          pending.extend(before..self.poset.len());
          self.poset.index_of(&complement).ok_or_else(|| Error::NotFound(complement.clone()))?
        }
      };
      self.set_segment_features(&complement, FeatureValue::minus(feature));
      debug!("feature {} negatively marks {}", feature, complement);
      complete[index] = true;
    }
    Ok(())
  }

  fn set_segment_features(&mut self, class: &Class, feature: FeatureValue) {
    for segment in class {
      self.segment_features.entry(segment.clone()).or_default().insert(feature);
    }
  }

  fn calculate_class_features(&mut self) {
    self.class_features = self
      .poset
      .classes()
      .iter()
      .map(|class| (class.clone(), self.class_features(class)))
      .collect();
  }

  /// The feature values shared by every member of `class`.
  pub fn class_features(&self, class: &Class) -> BTreeSet<FeatureValue> {
    let mut sets = class.iter().map(|s| self.segment_features.get(s).cloned().unwrap_or_default());
    let Some(first) = sets.next() else {
      return BTreeSet::new();
    };
    sets.fold(first, |acc, set| acc.intersection(&set).copied().collect())
  }

  pub fn segment_features(&self, segment: &str) -> Option<&BTreeSet<FeatureValue>> {
    self.segment_features.get(segment)
  }

  /// `0` unless the segment was given `+` or `-` for the feature.
  pub fn value(&self, segment: &str, feature: usize) -> Value {
    let Some(features) = self.segment_features.get(segment) else {
      return Value::Zero;
    };
    if features.contains(&FeatureValue::plus(feature)) {
      Value::Plus
    } else if features.contains(&FeatureValue::minus(feature)) {
      Value::Minus
    } else {
      Value::Zero
    }
  }

  pub fn segments_for_feature(&self, feature: FeatureValue) -> Class {
    self
      .segment_features
      .iter()
      .filter(|(_, features)| features.contains(&feature))
      .map(|(segment, _)| segment.clone())
      .collect()
  }

  /// The class picked out by a conjunction of feature values.
  pub fn class_for_features<'a>(&self, features: impl IntoIterator<Item = &'a FeatureValue>) -> Class {
    features
      .into_iter()
      .fold(self.alphabet.clone(), |acc, &feature| acc.intersection(&self.segments_for_feature(feature)))
  }

  /// Every class must be exactly the extension of its feature values.
  pub fn validate(&self) -> Result<()> {
    for (class, features) in self.class_features.iter() {
      let predicted = self.class_for_features(features);
      if &predicted != class {
        return Err(Error::Validation {
          class: class.clone(),
          features: features.iter().join(", "),
          predicted,
        });
      }
    }
    Ok(())
  }

  /// `T[i][j]` holds iff class `j` carries strictly more feature values than
  /// class `i`, that is, `j` is a featural refinement of `i`.
  pub fn feature_transitions(&self) -> BitMatrix {
    let features = self.poset.classes().iter().map(|c| self.class_features(c)).collect_vec();
    let rows: Vec<Vec<bool>> = features
      .iter()
      .map(|fi| features.iter().map(|fj| fi.len() < fj.len() && fi.is_subset(fj)).collect())
      .collect();
    BitMatrix::from_rows(rows)
  }

  /// The poset as the feature system sees it: direct featural refinements.
  pub fn feature_graph(&self) -> PosetGraph {
    let reduced = self.feature_transitions().reduction();
    let nodes = self.poset.graph().nodes;
    let edges = (0..reduced.len())
      .flat_map(|child| {
        let parents = reduced.column(child).into_iter().positions(|linked| linked).collect_vec();
        let multi_parent = parents.len() > 1;
        parents.into_iter().map(move |parent| Edge { parent, child, multi_parent })
      })
      .sorted()
      .collect();
    PosetGraph { nodes, edges }
  }

  fn report(&self) -> Featurization {
    let classes = self
      .poset
      .classes()
      .iter()
      .enumerate()
      .map(|(id, class)| ClassDescription {
        id,
        class: class.clone(),
        input: self.poset.is_input(class),
        features: self.class_features(class).into_iter().collect(),
      })
      .collect();
    let segments = self
      .segment_features
      .iter()
      .map(|(segment, features)| SegmentDescription {
        segment: segment.clone(),
        features: features.iter().copied().collect(),
      })
      .collect();
    Featurization {
      specification: self.specification,
      feature_count: self.feature_count,
      alphabet: self.alphabet.clone(),
      classes,
      segments,
      poset: self.poset.graph(),
      features: self.feature_graph(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::closure::QueueClosure;

  fn class(segments: &str) -> Class {
    Class::new(segments.split_whitespace())
  }

  fn manner() -> (Class, Vec<Class>) {
    (
      class("V G L N T"),
      ["V G L N T", "V G L N", "V G L", "N T", "V", "G", "L", "N", "T"].map(class).to_vec(),
    )
  }

  #[test]
  fn contrastive_underspecification_leaves_non_input_complements_unvalued() {
    let (alphabet, classes) = manner();
    let mut featurizer = Featurizer::new(alphabet, classes, Specification::ContrastiveUnder).unwrap();
    let result = featurizer.featurize().unwrap();
    assert_eq!(result.feature_count, 5);
    // {V, G, L, N} against {T}, then {N, T} against {V, G, L}
    assert_eq!(featurizer.segments_for_feature(FeatureValue::plus(1)), class("V G L N"));
    assert_eq!(featurizer.segments_for_feature(FeatureValue::minus(1)), class("T"));
    assert_eq!(featurizer.segments_for_feature(FeatureValue::plus(2)), class("N T"));
    assert_eq!(featurizer.segments_for_feature(FeatureValue::minus(2)), class("V G L"));
    // {G, L} is not an input class, so V's feature has no minus side
    assert!(featurizer.segments_for_feature(FeatureValue::minus(3)).is_empty());
    assert_eq!(featurizer.value("G", 3), Value::Zero);
    assert_eq!(featurizer.value("V", 3), Value::Plus);
    assert!(!featurizer.poset().contains(&class("G L")));
  }

  #[test]
  fn contrastive_materializes_complements() {
    let (alphabet, classes) = manner();
    let mut featurizer = Featurizer::new(alphabet, classes, Specification::Contrastive).unwrap();
    let result = featurizer.featurize().unwrap();
    assert_eq!(result.feature_count, 4);
    assert!(featurizer.poset().contains(&class("G L")));
    for segment in ["V", "G", "L", "N", "T"] {
      let features = featurizer.class_features(&class(segment));
      assert_eq!(featurizer.class_for_features(&features), class(segment));
    }
  }

  #[test]
  fn privative_never_assigns_minus() {
    let (alphabet, classes) = manner();
    let mut featurizer = Featurizer::new(alphabet, classes, Specification::Privative).unwrap();
    let result = featurizer.featurize().unwrap();
    assert!(result
      .segments
      .iter()
      .all(|s| s.features.iter().all(|f| f.value == Value::Plus)));
    // every single-parent class: {V,G,L,N}, {N,T}, {V,G,L}, {T}, {V}, {G}, {L}
    assert_eq!(result.feature_count, 7);
  }

  #[test]
  fn rerunning_starts_from_scratch() {
    let (alphabet, classes) = manner();
    let mut featurizer =
      Featurizer::<InsertionOrder, QueueClosure>::with_strategy(alphabet, classes, Specification::Full).unwrap();
    let first = featurizer.featurize().unwrap();
    let second = featurizer.featurize().unwrap();
    assert_eq!(first, second);
    featurizer.reset().unwrap();
    assert_eq!(featurizer.feature_count(), 0);
    assert!(featurizer.segment_features("V").unwrap().is_empty());
  }

  fn fully_specified<O: SiblingOrder, C: Closure>(featurizer: &Featurizer<O, C>) -> bool {
    (1..=featurizer.feature_count()).all(|feature| {
      featurizer.alphabet().iter().all(|segment| featurizer.value(segment, feature) != Value::Zero)
    })
  }

  #[test]
  fn full_falls_back_to_the_widened_contrastive_system() {
    let alphabet = class("s0 s1 s2 s3 s4");
    let classes = ["s1", "s2 s4", "s0 s2 s3", "s0 s1 s2 s4"].map(class).to_vec();
    let mut contrastive = Featurizer::new(alphabet.clone(), classes.clone(), Specification::Contrastive).unwrap();
    assert_eq!(contrastive.featurize().unwrap().feature_count, 3);
    // walking the full complements alone takes 4
    let mut full = Featurizer::new(alphabet, classes, Specification::Full).unwrap();
    let result = full.featurize().unwrap();
    assert_eq!(result.feature_count, 3);
    assert_eq!(result.specification, Specification::Full);
    assert!(fully_specified(&full));
    assert_eq!(full.value("s3", 1), Value::Minus);
    for segment in ["s0", "s1", "s2", "s3", "s4"] {
      let features = full.class_features(&class(segment));
      assert_eq!(full.class_for_features(&features), class(segment));
    }
  }

  #[test]
  fn full_never_needs_more_features_than_contrastive() {
    let alphabet = class("s0 s1 s2 s3 s4 s5");
    let classes =
      ["s2 s3 s4 s5", "s0 s1 s3 s5", "s0 s1 s2 s3 s4", "s0 s1 s2 s3 s4 s5", "s0", "s1 s2 s3"].map(class).to_vec();
    let mut contrastive = Featurizer::new(alphabet.clone(), classes.clone(), Specification::Contrastive).unwrap();
    assert_eq!(contrastive.featurize().unwrap().feature_count, 4);
    let mut full = Featurizer::new(alphabet.clone(), classes.clone(), Specification::Full).unwrap();
    assert_eq!(full.featurize().unwrap().feature_count, 4);
    assert!(fully_specified(&full));

    let mut unordered = Featurizer::<InsertionOrder>::with_strategy(alphabet, classes, Specification::Full).unwrap();
    assert_eq!(unordered.featurize().unwrap().feature_count, 4);
    assert!(fully_specified(&unordered));
  }

  #[test]
  fn alphabet_alone_needs_no_features() {
    let mut featurizer = Featurizer::new(class("a b"), vec![], Specification::Full).unwrap();
    let result = featurizer.featurize().unwrap();
    assert_eq!(result.feature_count, 0);
    assert_eq!(result.classes.len(), 1);
    assert!(result.classes[0].features.is_empty());
  }

  #[test]
  fn validation_catches_a_broken_labelling() {
    let mut featurizer = Featurizer::new(class("a b c"), vec![class("a b"), class("c")], Specification::Privative).unwrap();
    featurizer.featurize().unwrap();
    featurizer.segment_features.get_mut("c").unwrap().insert(FeatureValue::plus(1));
    featurizer.calculate_class_features();
    assert!(matches!(featurizer.validate(), Err(Error::Validation { .. })));
  }

  #[test]
  fn feature_graph_follows_refinement() {
    let (alphabet, classes) = manner();
    let mut featurizer = Featurizer::new(alphabet, classes, Specification::Contrastive).unwrap();
    let result = featurizer.featurize().unwrap();
    let id = |c: &str| featurizer.poset().index_of(&class(c)).unwrap();
    let refines = |parent: &str, child: &str| {
      result.features.edges.iter().any(|e| e.parent == id(parent) && e.child == id(child))
    };
    assert!(refines("V G L N T", "V G L N"));
    assert!(refines("V G L", "G L"));
    assert!(!refines("V G L N T", "V"));
    let transitions = featurizer.feature_transitions();
    assert!(transitions.get(id("V G L N T"), id("V")));
  }
}
