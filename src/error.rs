use thiserror::Error;

use crate::basics::Class;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("class {0} is not in the poset")]
  NotFound(Class),

  #[error("invalid featurization: feature set [{features}] associated with class {class}, but produces class {predicted}")]
  Validation {
    class: Class,
    features: String,
    predicted: Class,
  },

  #[error("{0} is not a natural class")]
  NotNatural(Class),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("snapshot encoding failed: {0}")]
  Encode(#[from] bincode::Error),
}
