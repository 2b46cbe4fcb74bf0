use std::path::Path;
use std::str::FromStr;

use crate::basics::Class;
use crate::error::{Error, Result};

/// Featurizer input: the alphabet on the first non-empty line, then one
/// class per line. Segments are separated by whitespace and may be longer
/// than one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassList {
  pub alphabet: Class,
  pub classes: Vec<Class>,
}

impl ClassList {
  pub fn parse(text: &str) -> Result<Self> {
    let mut lines = text
      .lines()
      .map(|line| Class::new(line.split_whitespace()))
      .filter(|class| !class.is_empty());
    let alphabet = lines
      .next()
      .ok_or_else(|| Error::InvalidInput("the class list has no alphabet line".into()))?;
    Ok(ClassList { alphabet, classes: lines.collect() })
  }

  pub fn read(path: impl AsRef<Path>) -> Result<Self> {
    Self::parse(&std::fs::read_to_string(path)?)
  }
}

impl FromStr for ClassList {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self> {
    Self::parse(s)
  }
}
