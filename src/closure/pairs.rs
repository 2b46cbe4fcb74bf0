use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

use super::{fresh_seeds, Closure};
use crate::basics::Class;
use crate::error::Result;
use crate::poset::{ClassPoset, RelationMatrix};

/// Works through a queue of class pairs, in the manner of a shortest-paths
/// search. Pairs in a subset relation are never queued: if `x ⊆ y` then
/// `x ∩ y = x` is already known.
pub struct PairClosure {}

fn queue_pairs(closed: &[Class], new: usize, pairs: &mut VecDeque<(usize, usize)>) -> usize {
  let mut nested = 0;
  for k in 0..new {
    if closed[k].is_comparable(&closed[new]) {
      nested += 1;
    } else {
      pairs.push_back((k, new));
    }
  }
  nested
}

impl Closure for PairClosure {
  fn close<M: RelationMatrix>(poset: &mut ClassPoset<M>, seeds: Option<Vec<Class>>) -> Result<usize> {
    let mut closed = poset.classes().to_vec();
    let mut pairs = VecDeque::new();
    let mut nested = 0;
    match seeds {
      None => {
        for new in 1..closed.len() {
          nested += queue_pairs(&closed, new, &mut pairs);
        }
      }
      Some(seeds) => {
        for seed in fresh_seeds(poset, seeds)? {
          closed.push(seed);
          nested += queue_pairs(&closed, closed.len() - 1, &mut pairs);
        }
      }
    }
    let mut known = closed.iter().cloned().collect::<HashSet<_>>();

    while let Some((i, j)) = pairs.pop_front() {
      let meet = closed[i].intersection(&closed[j]);
      if meet.is_empty() || known.contains(&meet) {
        continue;
      }
      trace!("{} ∩ {} = {}", closed[i], closed[j], meet);
      known.insert(meet.clone());
      closed.push(meet);
      nested += queue_pairs(&closed, closed.len() - 1, &mut pairs);
    }

    let found = closed.split_off(poset.len());
    let added = poset.add_classes(found)?.len();
    debug!("pair closure added {} classes, skipped {} nested pairs", added, nested);
    Ok(added)
  }
}
