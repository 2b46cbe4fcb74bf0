use anyhow::Context;
use clap::{Parser, ValueEnum};
use featurize::closure::{Closure, PairClosure, QueueClosure};
use featurize::featurizer::{Featurizer, InsertionOrder, LargestFirst, SiblingOrder, Specification};
use featurize::input::ClassList;
use featurize::report::Featurization;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Order {
  LargestFirst,
  Insertion,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Engine {
  Pairs,
  Queue,
}

/// Derive a distinctive feature system for a list of natural classes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// the class list: the alphabet on the first line, then one class per line
  input_file: PathBuf,

  /// privative, contrastive-under, contrastive or full
  #[arg(long, default_value = "contrastive-under")]
  specification: Specification,

  /// the order in which sibling classes are visited
  #[arg(long, value_enum, default_value_t = Order::LargestFirst)]
  order: Order,

  /// the intersectional closure engine
  #[arg(long, value_enum, default_value_t = Engine::Pairs)]
  closure: Engine,

  /// run every specification and compare the feature counts
  #[arg(long, action)]
  all: bool,

  /// print the result as JSON
  #[arg(long, action)]
  json: bool,

  /// the path to save the result snapshot; with --all, every successful result
  #[arg(long)]
  save: Option<PathBuf>,

  /// log every featurization decision
  #[arg(long, short, action)]
  verbose: bool,
}

fn featurize_with<O: SiblingOrder, C: Closure>(
  list: &ClassList,
  specification: Specification,
) -> featurize::Result<Featurization> {
  Featurizer::<O, C>::with_strategy(list.alphabet.clone(), list.classes.clone(), specification)?.featurize()
}

fn run(args: &Args, list: &ClassList, specification: Specification) -> featurize::Result<Featurization> {
  match (args.order, args.closure) {
    (Order::LargestFirst, Engine::Pairs) => featurize_with::<LargestFirst, PairClosure>(list, specification),
    (Order::LargestFirst, Engine::Queue) => featurize_with::<LargestFirst, QueueClosure>(list, specification),
    (Order::Insertion, Engine::Pairs) => featurize_with::<InsertionOrder, PairClosure>(list, specification),
    (Order::Insertion, Engine::Queue) => featurize_with::<InsertionOrder, QueueClosure>(list, specification),
  }
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
  let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
  Ok(BufWriter::new(file))
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  featurize::init_logging(args.verbose);
  let list = ClassList::read(&args.input_file).with_context(|| format!("reading {}", args.input_file.display()))?;
  info!("{} segments, {} input classes", list.alphabet.len(), list.classes.len());

  if !args.all {
    let result = run(&args, &list, args.specification)?;
    if args.json {
      println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
      print!("{}", result);
    }
    if let Some(path) = &args.save {
      result.save(create(path)?)?;
      info!("saved to {}", path.display());
    }
    return Ok(());
  }

  let results = Specification::ALL.par_iter().map(|&s| (s, run(&args, &list, s))).collect::<Vec<_>>();
  let saved = if args.json {
    let results = results.into_iter().map(|(_, result)| result).collect::<featurize::Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    results
  } else {
    for (specification, result) in &results {
      match result {
        Ok(result) => println!(
          "{:<18} {:>3} features {:>4} classes",
          specification,
          result.feature_count,
          result.classes.len()
        ),
        Err(e) => println!("{:<18} failed: {}", specification, e),
      }
    }
    results.into_iter().filter_map(|(_, result)| result.ok()).collect()
  };
  if let Some(path) = &args.save {
    bincode::serialize_into(create(path)?, &saved)?;
    info!("saved {} results to {}", saved.len(), path.display());
  }
  Ok(())
}
