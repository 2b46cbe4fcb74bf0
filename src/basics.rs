use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type Segment = String;

/// A set of segments. Two classes with the same members are the same class,
/// however they were derived.
#[derive(Serialize, Deserialize, Debug, Default, Hash, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Class(BTreeSet<Segment>);

impl Class {
  pub fn new<I, S>(segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<Segment>,
  {
    Class(segments.into_iter().map(Into::into).collect())
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  pub fn contains(&self, segment: &str) -> bool {
    self.0.contains(segment)
  }
  pub fn is_subset(&self, other: &Class) -> bool {
    self.0.is_subset(&other.0)
  }
  pub fn is_proper_subset(&self, other: &Class) -> bool {
    self.len() < other.len() && self.is_subset(other)
  }
  /// Neither class contains the other, so their intersection is something new.
  pub fn is_comparable(&self, other: &Class) -> bool {
    self.is_subset(other) || other.is_subset(self)
  }
  pub fn intersection(&self, other: &Class) -> Class {
    Class(self.0.intersection(&other.0).cloned().collect())
  }
  pub fn difference(&self, other: &Class) -> Class {
    Class(self.0.difference(&other.0).cloned().collect())
  }
  pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
    self.0.iter()
  }
}

impl<S: Into<Segment>> FromIterator<S> for Class {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Class::new(iter)
  }
}

impl<'a> IntoIterator for &'a Class {
  type Item = &'a Segment;
  type IntoIter = std::collections::btree_set::Iter<'a, Segment>;
  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl std::fmt::Display for Class {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{{{}}}", self.0.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))
  }
}

#[derive(Debug, Hash, Eq, PartialEq, Serialize, Deserialize, Copy, Clone, Ord, PartialOrd)]
pub enum Value {
  Plus,
  Minus,
  Zero,
}

impl Value {
  pub fn from_symbol(symbol: char) -> Option<Value> {
    match symbol {
      '+' => Some(Value::Plus),
      '-' => Some(Value::Minus),
      '0' => Some(Value::Zero),
      _ => None,
    }
  }
  pub fn symbol(self) -> char {
    match self {
      Value::Plus => '+',
      Value::Minus => '-',
      Value::Zero => '0',
    }
  }
}

impl std::fmt::Display for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

/// One specified value of one feature. Only `+` and `-` are ever stored; a
/// missing entry reads as `0`.
#[derive(Debug, Hash, Eq, PartialEq, Serialize, Deserialize, Copy, Clone, Ord, PartialOrd)]
pub struct FeatureValue {
  pub feature: usize,
  pub value: Value,
}

impl FeatureValue {
  pub fn plus(feature: usize) -> Self {
    FeatureValue { feature, value: Value::Plus }
  }
  pub fn minus(feature: usize) -> Self {
    FeatureValue { feature, value: Value::Minus }
  }
}

impl std::fmt::Display for FeatureValue {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}F{}", self.value, self.feature)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classes_compare_by_membership() {
    assert_eq!(Class::new(["b", "a"]), Class::new(["a", "b", "a"]));
    assert!(Class::new(["a"]).is_proper_subset(&Class::new(["a", "b"])));
    assert!(!Class::new(["a", "b"]).is_proper_subset(&Class::new(["b", "a"])));
    assert!(!Class::new(["a", "c"]).is_comparable(&Class::new(["a", "b"])));
  }

  #[test]
  fn set_operations() {
    let abc = Class::new(["a", "b", "c"]);
    let bcd = Class::new(["b", "c", "d"]);
    assert_eq!(abc.intersection(&bcd), Class::new(["b", "c"]));
    assert_eq!(abc.difference(&bcd), Class::new(["a"]));
    assert!(Class::new(["a"]).intersection(&Class::new(["b"])).is_empty());
    assert_eq!(abc.to_string(), "{a, b, c}");
  }

  #[test]
  fn feature_values_print_like_descriptors() {
    assert_eq!(FeatureValue::plus(3).to_string(), "+F3");
    assert_eq!(FeatureValue::minus(1).to_string(), "-F1");
    assert_eq!(Value::from_symbol('0'), Some(Value::Zero));
    assert_eq!(Value::from_symbol('x'), None);
  }
}
