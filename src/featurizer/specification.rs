use serde::{Deserialize, Serialize};

use crate::basics::Class;
use crate::error::Error;

#[derive(Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize, Copy, Clone, Ord, PartialOrd)]
pub enum Specification {
  /// Only `+` values; no complements.
  Privative,
  /// The complement within the parent is labelled only when it is an input class.
  #[default]
  ContrastiveUnder,
  /// The complement within the parent is always materialized and labelled.
  Contrastive,
  /// The complement within the whole alphabet is always materialized and labelled.
  Full,
}

impl Specification {
  pub const ALL: [Specification; 4] = [
    Specification::Privative,
    Specification::ContrastiveUnder,
    Specification::Contrastive,
    Specification::Full,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Specification::Privative => "privative",
      Specification::ContrastiveUnder => "contrastive-under",
      Specification::Contrastive => "contrastive",
      Specification::Full => "full",
    }
  }

  /// The class that takes the `-` value of a feature minted for `class`,
  /// whose single parent is `parent`.
  pub fn complement(self, alphabet: &Class, parent: &Class, class: &Class) -> Option<Class> {
    match self {
      Specification::Privative => None,
      Specification::Full => Some(alphabet.difference(class)),
      Specification::ContrastiveUnder | Specification::Contrastive => Some(parent.difference(class)),
    }
  }

  /// Contrastive and full complements are added to the poset up front.
  pub fn precomputes_complements(self) -> bool {
    matches!(self, Specification::Contrastive | Specification::Full)
  }
}

impl std::fmt::Display for Specification {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.pad(self.name())
  }
}

impl std::str::FromStr for Specification {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
      "privative" => Ok(Specification::Privative),
      "contrastive-under" | "contrastive-underspecified" | "complementary" => Ok(Specification::ContrastiveUnder),
      "contrastive" | "inferential-complementary" => Ok(Specification::Contrastive),
      "full" => Ok(Specification::Full),
      other => Err(Error::InvalidInput(format!("invalid featural specification '{}'", other))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_names_and_aliases() {
    assert_eq!("privative".parse::<Specification>().unwrap(), Specification::Privative);
    assert_eq!("contrastive_under".parse::<Specification>().unwrap(), Specification::ContrastiveUnder);
    assert_eq!("complementary".parse::<Specification>().unwrap(), Specification::ContrastiveUnder);
    assert_eq!("inferential_complementary".parse::<Specification>().unwrap(), Specification::Contrastive);
    assert_eq!(" Full ".parse::<Specification>().unwrap(), Specification::Full);
    assert!(matches!("binary".parse::<Specification>(), Err(Error::InvalidInput(_))));
    for spec in Specification::ALL {
      assert_eq!(spec.name().parse::<Specification>().unwrap(), spec);
    }
  }

  #[test]
  fn defaults_to_contrastive_underspecification() {
    assert_eq!(Specification::default(), Specification::ContrastiveUnder);
    assert_eq!(Specification::default().to_string(), "contrastive-under");
  }

  #[test]
  fn complements() {
    let alphabet = Class::new(["a", "b", "c", "d"]);
    let parent = Class::new(["a", "b", "c"]);
    let class = Class::new(["a"]);
    assert_eq!(Specification::Privative.complement(&alphabet, &parent, &class), None);
    assert_eq!(
      Specification::Contrastive.complement(&alphabet, &parent, &class),
      Some(Class::new(["b", "c"]))
    );
    assert_eq!(
      Specification::Full.complement(&alphabet, &parent, &class),
      Some(Class::new(["b", "c", "d"]))
    );
  }
}
