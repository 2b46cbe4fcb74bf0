use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::basics::{Class, FeatureValue, Segment, Value};
use crate::error::Result;
use crate::featurizer::Specification;
use crate::poset::PosetGraph;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassDescription {
  pub id: usize,
  pub class: Class,
  pub input: bool,
  pub features: Vec<FeatureValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescription {
  pub segment: Segment,
  pub features: Vec<FeatureValue>,
}

/// The outcome of one featurization run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Featurization {
  pub specification: Specification,
  pub feature_count: usize,
  pub alphabet: Class,
  /// Indexed like the poset.
  pub classes: Vec<ClassDescription>,
  pub segments: Vec<SegmentDescription>,
  /// Subset graph of the final poset.
  pub poset: PosetGraph,
  /// Featural refinement graph over the same nodes.
  pub features: PosetGraph,
}

impl Featurization {
  pub fn class_description(&self, class: &Class) -> Option<&ClassDescription> {
    self.classes.iter().find(|c| &c.class == class)
  }

  pub fn input_classes(&self) -> impl Iterator<Item = &ClassDescription> + '_ {
    self.classes.iter().filter(|c| c.input)
  }

  pub fn value(&self, segment: &str, feature: usize) -> Value {
    self
      .segments
      .iter()
      .find(|s| s.segment == segment)
      .and_then(|s| s.features.iter().find(|f| f.feature == feature))
      .map_or(Value::Zero, |f| f.value)
  }

  /// Every segment with its value for features `1..=feature_count`.
  pub fn segment_table(&self) -> Vec<(Segment, Vec<Value>)> {
    self
      .segments
      .iter()
      .map(|s| {
        let values = (1..=self.feature_count).map(|f| self.value(&s.segment, f)).collect();
        (s.segment.clone(), values)
      })
      .collect()
  }

  pub fn save<W: Write>(&self, writer: W) -> Result<()> {
    bincode::serialize_into(writer, self)?;
    Ok(())
  }

  pub fn load<R: Read>(reader: R) -> Result<Self> {
    Ok(bincode::deserialize_from(reader)?)
  }
}

impl std::fmt::Display for Featurization {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{} specification: {} features", self.specification, self.feature_count)?;
    writeln!(f)?;
    writeln!(f, "Class features")?;
    for c in self.classes.iter().sorted_by_key(|c| (std::cmp::Reverse(c.class.len()), c.id)) {
      let marker = if c.input { "" } else { " (derived)" };
      writeln!(f, "{}{}: [{}]", c.class, marker, c.features.iter().join(", "))?;
    }
    writeln!(f)?;
    writeln!(f, "Segment features")?;
    let header = (1..=self.feature_count).map(|i| format!("F{}", i)).join(",");
    writeln!(f, "segment,{}", header)?;
    for (segment, values) in self.segment_table() {
      writeln!(f, "{},{}", segment, values.iter().join(","))?;
    }
    Ok(())
  }
}
