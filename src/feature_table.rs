use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::basics::{Class, FeatureValue, Segment, Value};
use crate::error::{Error, Result};
use crate::input::ClassList;

/// A segment-by-feature table of `+`, `-` and `0` values, and the natural
/// classes it defines.
///
/// The text form is a header row of feature names, then one row per segment:
/// the segment followed by its values, either one cell per value or run
/// together (`+-0`). A natural class is the extension of a conjunction of
/// `+`/`-` values; `0` never matches. Feature indices in [`FeatureValue`]s
/// are columns of the table, counted from zero.
#[derive(Debug, Clone)]
pub struct FeatureTable {
  features: Vec<String>,
  segments: Vec<Segment>,
  values: BTreeMap<Segment, Vec<Value>>,
  /// In discovery order, each with the first conjunction found for it.
  natural_classes: Vec<(Class, Vec<FeatureValue>)>,
  index: HashMap<Class, usize>,
}

impl FeatureTable {
  pub fn parse(text: &str) -> Result<Self> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let features = lines
      .next()
      .ok_or_else(|| Error::InvalidInput("the feature table has no header row".into()))?
      .split_whitespace()
      .map(String::from)
      .collect_vec();
    if features.is_empty() {
      return Err(Error::InvalidInput("the feature table names no features".into()));
    }

    let mut segments = vec![];
    let mut values = BTreeMap::new();
    for line in lines {
      let mut cells = line.split_whitespace();
      let Some(segment) = cells.next() else { continue };
      let row = cells
        .flat_map(|cell| cell.chars())
        .map(|symbol| {
          Value::from_symbol(symbol)
            .ok_or_else(|| Error::InvalidInput(format!("segment {} has invalid value '{}'", segment, symbol)))
        })
        .collect::<Result<Vec<_>>>()?;
      if row.len() != features.len() {
        return Err(Error::InvalidInput(format!(
          "segment {} has {} values for {} features",
          segment,
          row.len(),
          features.len()
        )));
      }
      if values.insert(segment.to_string(), row).is_some() {
        return Err(Error::InvalidInput(format!("segment {} is listed twice", segment)));
      }
      segments.push(segment.to_string());
    }
    if segments.is_empty() {
      return Err(Error::InvalidInput("the feature table lists no segments".into()));
    }

    let mut table = FeatureTable {
      features,
      segments,
      values,
      natural_classes: vec![],
      index: HashMap::new(),
    };
    table.enumerate();
    Ok(table)
  }

  pub fn read(path: impl AsRef<Path>) -> Result<Self> {
    Self::parse(&std::fs::read_to_string(path)?)
  }

  /// Level-wise search over conjunctions with strictly increasing feature
  /// indices. A conjunction whose extension is empty or already known is
  /// not extended further.
  fn enumerate(&mut self) {
    let n = self.features.len();
    let values: [fn(usize) -> FeatureValue; 2] = [FeatureValue::plus, FeatureValue::minus];
    self.record(self.alphabet(), vec![]);
    let mut next = values.iter().flat_map(|value| (0..n).map(move |i| vec![value(i)])).collect_vec();
    while !next.is_empty() {
      let level = std::mem::take(&mut next);
      for conjunction in level {
        let class = self.extension_of(&conjunction);
        if class.is_empty() || self.index.contains_key(&class) {
          continue;
        }
        let last = conjunction.last().map_or(0, |f| f.feature + 1);
        for value in values {
          next.extend((last..n).map(|i| {
            let mut longer = conjunction.clone();
            longer.push(value(i));
            longer
          }));
        }
        self.record(class, conjunction);
      }
    }
    debug!("{} natural classes over {} features", self.natural_classes.len(), self.features.len());
  }

  fn record(&mut self, class: Class, conjunction: Vec<FeatureValue>) {
    self.index.insert(class.clone(), self.natural_classes.len());
    self.natural_classes.push((class, conjunction));
  }

  fn extension_of(&self, conjunction: &[FeatureValue]) -> Class {
    self
      .segments
      .iter()
      .filter(|s| conjunction.iter().all(|f| self.values[*s][f.feature] == f.value))
      .cloned()
      .collect()
  }

  pub fn features(&self) -> &[String] {
    &self.features
  }
  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }
  pub fn alphabet(&self) -> Class {
    self.segments.iter().cloned().collect()
  }
  pub fn value(&self, segment: &str, feature: usize) -> Option<Value> {
    self.values.get(segment).and_then(|row| row.get(feature)).copied()
  }

  /// Every natural class, the whole inventory first.
  pub fn natural_classes(&self) -> impl Iterator<Item = &Class> + '_ {
    self.natural_classes.iter().map(|(class, _)| class)
  }

  pub fn is_natural(&self, class: &Class) -> bool {
    self.index.contains_key(class)
  }

  /// Reads a descriptor such as `+son,-cons`. Unknown feature names are an
  /// error; an empty descriptor is the empty conjunction.
  pub fn parse_descriptor(&self, descriptor: &str) -> Result<Vec<FeatureValue>> {
    descriptor
      .split(',')
      .map(str::trim)
      .filter(|term| !term.is_empty())
      .map(|term| {
        let mut chars = term.chars();
        let value = chars.next().and_then(Value::from_symbol).filter(|v| *v != Value::Zero);
        let name = chars.as_str();
        let feature = self.features.iter().position(|f| f == name);
        match (value, feature) {
          (Some(value), Some(feature)) => Ok(FeatureValue { feature, value }),
          _ => Err(Error::InvalidInput(format!("invalid feature term '{}'", term))),
        }
      })
      .collect()
  }

  pub fn format_descriptor(&self, conjunction: &[FeatureValue]) -> String {
    conjunction.iter().map(|f| format!("{}{}", f.value, self.features[f.feature])).join(",")
  }

  /// The segments picked out by a descriptor.
  pub fn extension(&self, descriptor: &str) -> Result<Class> {
    Ok(self.extension_of(&self.parse_descriptor(descriptor)?))
  }

  /// The descriptor under which `class` was first found.
  pub fn describe(&self, class: &Class) -> Result<String> {
    let &i = self.index.get(class).ok_or_else(|| Error::NotNatural(class.clone()))?;
    Ok(self.format_descriptor(&self.natural_classes[i].1))
  }

  pub fn classes_containing<'a>(&'a self, segment: &'a str) -> impl Iterator<Item = &'a Class> + 'a {
    self.natural_classes().filter(move |class| class.contains(segment))
  }

  /// The natural classes as featurizer input.
  pub fn class_list(&self) -> ClassList {
    ClassList {
      alphabet: self.alphabet(),
      classes: self.natural_classes().skip(1).cloned().collect(),
    }
  }
}

impl FromStr for FeatureTable {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self> {
    Self::parse(s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TABLE: &str = "
        son cons voice
    a   +   -    0
    m   +   +    0
    p   -   +    -
    b   -+ +
  ";

  fn class(segments: &str) -> Class {
    Class::new(segments.split_whitespace())
  }

  #[test]
  fn enumerates_distinct_non_empty_classes() {
    let table: FeatureTable = TABLE.parse().unwrap();
    let found = table.natural_classes().map(|c| c.to_string()).collect_vec();
    assert_eq!(
      found,
      vec!["{a, b, m, p}", "{a, m}", "{b, m, p}", "{b}", "{b, p}", "{a}", "{p}", "{m}"]
    );
    assert!(!table.is_natural(&class("a b")));
  }

  #[test]
  fn descriptors_both_ways() {
    let table = FeatureTable::parse(TABLE).unwrap();
    assert_eq!(table.describe(&class("b")).unwrap(), "+voice");
    assert_eq!(table.describe(&class("m")).unwrap(), "+son,+cons");
    assert_eq!(table.describe(&class("a b m p")).unwrap(), "");
    assert!(matches!(table.describe(&class("a b")), Err(Error::NotNatural(_))));
    assert_eq!(table.extension("-son").unwrap(), class("p b"));
    assert_eq!(table.extension(" +son , +cons ").unwrap(), class("m"));
    // 0 never matches
    assert!(table.extension("-voice,+son").unwrap().is_empty());
    assert!(matches!(table.extension("+nasal"), Err(Error::InvalidInput(_))));
    assert!(table.extension("0son").is_err());
  }

  #[test]
  fn classes_of_a_segment() {
    let table = FeatureTable::parse(TABLE).unwrap();
    assert_eq!(table.classes_containing("b").count(), 4);
    assert_eq!(table.value("p", 2), Some(Value::Minus));
    let list = table.class_list();
    assert_eq!(list.alphabet, class("a b m p"));
    assert_eq!(list.classes.len(), 7);
  }

  #[test]
  fn malformed_tables_are_rejected() {
    assert!(FeatureTable::parse("").is_err());
    assert!(FeatureTable::parse("son cons\n").is_err());
    assert!(FeatureTable::parse("son cons\na + \n").is_err());
    assert!(FeatureTable::parse("son\na x\n").is_err());
    assert!(FeatureTable::parse("son\na +\na -\n").is_err());
  }
}
