use std::collections::{HashSet, VecDeque};
use tracing::debug;

use super::{fresh_seeds, Closure};
use crate::basics::Class;
use crate::error::Result;
use crate::poset::{ClassPoset, RelationMatrix};

/// Merges pending classes one at a time into the closure built so far,
/// queueing each new intersection as another pending class.
pub struct QueueClosure {}

impl Closure for QueueClosure {
  fn close<M: RelationMatrix>(poset: &mut ClassPoset<M>, seeds: Option<Vec<Class>>) -> Result<usize> {
    let (mut closed, mut pending): (Vec<Class>, VecDeque<Class>) = match seeds {
      None => (vec![poset.alphabet().clone()], poset.classes().iter().skip(1).cloned().collect()),
      Some(seeds) => (poset.classes().to_vec(), fresh_seeds(poset, seeds)?.into()),
    };
    let mut known = closed.iter().cloned().collect::<HashSet<_>>();

    while let Some(class) = pending.pop_front() {
      if known.contains(&class) {
        continue;
      }
      for other in closed.iter() {
        if class.is_comparable(other) {
          continue;
        }
        let meet = class.intersection(other);
        if !meet.is_empty() && !known.contains(&meet) {
          pending.push_back(meet);
        }
      }
      known.insert(class.clone());
      closed.push(class);
    }

    let found = closed.into_iter().filter(|c| !poset.contains(c)).collect::<Vec<_>>();
    let added = poset.add_classes(found)?.len();
    debug!("queue closure added {} classes", added);
    Ok(added)
  }
}
