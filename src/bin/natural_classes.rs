use anyhow::Context;
use clap::Parser;
use featurize::basics::Class;
use featurize::feature_table::FeatureTable;
use std::path::PathBuf;
use tracing::info;

/// Natural classes of a feature table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// the feature table: a header of feature names, then one row per segment
  feature_file: PathBuf,

  /// comma-separated segments to describe, e.g. `b,d,g`
  #[arg(long)]
  describe: Option<String>,

  /// a descriptor to resolve, e.g. `+son,-cons`
  #[arg(long, allow_hyphen_values = true)]
  extension: Option<String>,

  /// list the natural classes containing this segment
  #[arg(long)]
  segment: Option<String>,

  /// print the natural classes as a class list for `featurize`
  #[arg(long, action)]
  class_list: bool,

  #[arg(long, short, action)]
  verbose: bool,
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  featurize::init_logging(args.verbose);
  let table =
    FeatureTable::read(&args.feature_file).with_context(|| format!("reading {}", args.feature_file.display()))?;
  info!("{} segments, {} features", table.segments().len(), table.features().len());

  if let Some(segments) = &args.describe {
    let class = Class::new(segments.split(',').map(str::trim).filter(|s| !s.is_empty()));
    println!("{}\t[{}]", class, table.describe(&class)?);
  }
  if let Some(descriptor) = &args.extension {
    println!("[{}]\t{}", descriptor, table.extension(descriptor)?);
  }
  if let Some(segment) = &args.segment {
    for class in table.classes_containing(segment) {
      println!("{}\t[{}]", class, table.describe(class)?);
    }
  }
  if args.class_list {
    let list = table.class_list();
    println!("{}", list.alphabet.iter().cloned().collect::<Vec<_>>().join(" "));
    for class in &list.classes {
      println!("{}", class.iter().cloned().collect::<Vec<_>>().join(" "));
    }
  }
  if args.describe.is_none() && args.extension.is_none() && args.segment.is_none() && !args.class_list {
    for class in table.natural_classes() {
      println!("[{}]\t{}", table.describe(class)?, class);
    }
  }
  Ok(())
}
