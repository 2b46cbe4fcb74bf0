pub mod basics;
pub mod closure;
pub mod error;
pub mod feature_table;
pub mod featurizer;
pub mod input;
pub mod poset;
pub mod report;

pub use error::{Error, Result};

/// Logs to stderr, filtered by `RUST_LOG` when it is set.
pub fn init_logging(verbose: bool) {
  let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
  let filter = tracing_subscriber::EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
