mod pairs;
pub use pairs::*;
mod queue;
pub use queue::*;

use crate::basics::Class;
use crate::error::{Error, Result};
use crate::poset::{ClassPoset, RelationMatrix};

/// Closes a poset under intersection.
pub trait Closure {
  /// With `seeds == None`, closes everything already in the poset. Otherwise
  /// the poset is assumed closed; the seeds are inserted and intersected with
  /// every class. Returns the number of classes added, seeds included.
  fn close<M: RelationMatrix>(poset: &mut ClassPoset<M>, seeds: Option<Vec<Class>>) -> Result<usize>;

  fn extend<M: RelationMatrix>(poset: &mut ClassPoset<M>, classes: Vec<Class>) -> Result<usize> {
    Self::close(poset, Some(classes))
  }
}

/// Seeds that would actually grow the poset, in their given order.
fn fresh_seeds<M: RelationMatrix>(poset: &ClassPoset<M>, seeds: Vec<Class>) -> Result<Vec<Class>> {
  let mut fresh = vec![];
  for seed in seeds {
    if !seed.is_subset(poset.alphabet()) {
      return Err(Error::InvalidInput(format!(
        "class {} is not a subset of the alphabet {}",
        seed,
        poset.alphabet()
      )));
    }
    if !seed.is_empty() && !poset.contains(&seed) && !fresh.contains(&seed) {
      fresh.push(seed);
    }
  }
  Ok(fresh)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::poset::{BitMatrix, VecMatrix};
  use itertools::Itertools;
  use std::collections::BTreeSet;

  fn class(segments: &str) -> Class {
    Class::new(segments.split_whitespace())
  }

  fn vowels<M: RelationMatrix>() -> ClassPoset<M> {
    ClassPoset::new(
      class("i y e E a u U o O"),
      [
        "i u y U", "e E o O", "i e E y", "u o a O U", "y E u o", "i e a U O", "i", "u", "e", "o", "a",
        "O", "U", "y", "E",
      ]
      .map(class),
    )
    .unwrap()
  }

  fn brute_force(classes: &[Class]) -> BTreeSet<Class> {
    let mut closed = classes.iter().cloned().collect::<BTreeSet<_>>();
    loop {
      let next = closed
        .iter()
        .tuple_combinations()
        .map(|(x, y)| x.intersection(y))
        .filter(|x| !x.is_empty())
        .collect::<BTreeSet<_>>();
      let before = closed.len();
      closed.extend(next);
      if closed.len() == before {
        return closed;
      }
    }
  }

  fn check_closed<M: RelationMatrix>(poset: &ClassPoset<M>) {
    for (x, y) in poset.classes().iter().tuple_combinations() {
      let meet = x.intersection(y);
      assert!(meet.is_empty() || poset.contains(&meet), "{} ∩ {} missing", x, y);
    }
  }

  fn check_engine<C: Closure, M: RelationMatrix>() {
    let mut poset = vowels::<M>();
    let expected = brute_force(poset.classes());
    let added = C::close(&mut poset, None).unwrap();
    assert_eq!(added, expected.len() - 15 - 1);
    assert_eq!(poset.classes().iter().cloned().collect::<BTreeSet<_>>(), expected);
    check_closed(&poset);
    assert_eq!(C::close(&mut poset, None).unwrap(), 0);
  }

  #[test]
  fn pair_closure_matches_brute_force() {
    check_engine::<PairClosure, BitMatrix>();
    check_engine::<PairClosure, VecMatrix>();
  }

  #[test]
  fn queue_closure_matches_brute_force() {
    check_engine::<QueueClosure, BitMatrix>();
    check_engine::<QueueClosure, VecMatrix>();
  }

  #[test]
  fn empty_intersections_are_pruned() {
    let mut poset: ClassPoset = ClassPoset::new(class("R D T"), [class("R"), class("R D")]).unwrap();
    assert_eq!(PairClosure::close(&mut poset, None).unwrap(), 0);
    let classes = poset.classes().iter().cloned().collect::<BTreeSet<_>>();
    assert_eq!(classes, BTreeSet::from([class("R D T"), class("R D"), class("R")]));

    let mut poset: ClassPoset = ClassPoset::new(class("a b c"), [class("a"), class("b")]).unwrap();
    assert_eq!(QueueClosure::close(&mut poset, None).unwrap(), 0);
    assert!(poset.classes().iter().all(|c| !c.is_empty()));
  }

  #[test]
  fn seeds_extend_a_closed_poset() {
    for use_queue in [false, true] {
      let mut poset: ClassPoset =
        ClassPoset::new(class("a b c d e"), ["a b c d", "a b c", "d e"].map(class)).unwrap();
      PairClosure::close(&mut poset, None).unwrap();
      assert_eq!(poset.len(), 5);
      let seeds = vec![class("b c d e")];
      let added = if use_queue {
        QueueClosure::extend(&mut poset, seeds).unwrap()
      } else {
        PairClosure::extend(&mut poset, seeds).unwrap()
      };
      // the seed, {b, c, d} and {b, c}
      assert_eq!(added, 3);
      assert!(poset.contains(&class("b c d")));
      assert!(poset.contains(&class("b c")));
      check_closed(&poset);
    }
  }

  #[test]
  fn seeds_must_fit_the_alphabet() {
    let mut poset: ClassPoset = ClassPoset::new(class("a b"), [class("a")]).unwrap();
    assert!(PairClosure::extend(&mut poset, vec![class("c")]).is_err());
    assert!(QueueClosure::extend(&mut poset, vec![class("a c")]).is_err());
    assert_eq!(PairClosure::extend(&mut poset, vec![class("a")]).unwrap(), 0);
  }
}
