use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use galho::classifiers::PredictiveModelBuilder;
use galho::classifiers::downsampling::DownsamplingClassifierBuilder;
use galho::classifiers::tree::{DecisionTree, DecisionTreeBuilder};
use galho::core::instances::Instance;
use galho::streams::arff::load_instances;
use galho::tasks::CrossValidator;
use galho::ui::cli::args::{Cli, Command, CrossValidateArgs, LearnerArgs, TrainArgs};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => train(args),
        Command::CrossValidate(args) => cross_validate(args),
    }
}

fn train(args: TrainArgs) -> Result<()> {
    print_header("Train", &args.learner.data);
    let data = load(&args.learner)?;
    let config = args.learner.builder_config()?;

    let mut tree_builder: DecisionTreeBuilder = DecisionTreeBuilder::new();
    match args.learner.downsample {
        None => {
            tree_builder
                .update_builder_config(&config)
                .context("invalid learner parameters")?;
            let tree = tree_builder
                .build_predictive_model(&data)
                .context("training failed")?;
            report_tree(&tree, args.dump)?;
            write_model(&tree, args.output.as_deref())
        }
        Some(target) => {
            let mut builder = downsampling_builder(tree_builder, target, args.learner.seed)?;
            builder
                .update_builder_config(&config)
                .context("invalid learner parameters")?;
            let model = builder
                .build_predictive_model(&data)
                .context("training failed")?;
            println!(
                "{DIM}majority={} minority={} drop_probability={:.6}{RESET}",
                model.majority_label(),
                model.minority_label(),
                model.drop_probability()
            );
            report_tree(model.wrapped(), args.dump)?;
            write_model(&model, args.output.as_deref())
        }
    }
}

fn cross_validate(args: CrossValidateArgs) -> Result<()> {
    print_header("Cross validation", &args.learner.data);
    let data = load(&args.learner)?;
    let config = args.learner.builder_config()?;
    let validator = CrossValidator::with_kind(
        args.folds as usize,
        args.learner.seed.unwrap_or_default(),
        args.loss_kind()?,
    )
    .context("failed to construct cross validator")?;

    let mut tree_builder: DecisionTreeBuilder = DecisionTreeBuilder::new();
    let report = match args.learner.downsample {
        None => {
            tree_builder
                .update_builder_config(&config)
                .context("invalid learner parameters")?;
            validator.evaluate(&mut tree_builder, &data)
        }
        Some(target) => {
            let mut builder = downsampling_builder(tree_builder, target, args.learner.seed)?;
            builder
                .update_builder_config(&config)
                .context("invalid learner parameters")?;
            validator.evaluate(&mut builder, &data)
        }
    }
    .context("cross validation failed")?;

    print!("{report}");
    Ok(())
}

fn load(args: &LearnerArgs) -> Result<Vec<Instance>> {
    load_instances(&args.data, args.class_index)
        .with_context(|| format!("failed to load {}", args.data.display()))
}

fn downsampling_builder(
    tree_builder: DecisionTreeBuilder,
    target: f64,
    seed: Option<u64>,
) -> Result<DownsamplingClassifierBuilder<DecisionTreeBuilder>> {
    let builder = match seed {
        Some(seed) => DownsamplingClassifierBuilder::seeded(tree_builder, target, seed),
        None => DownsamplingClassifierBuilder::new(tree_builder, target),
    };
    builder.context("invalid downsampling target")
}

fn report_tree(tree: &DecisionTree, dump: bool) -> Result<()> {
    println!(
        "{BOLD}nodes={}{RESET}  {DIM}mean_leaf_depth={:.3}{RESET}",
        tree.size(),
        tree.mean_leaf_depth()
    );
    if dump {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        tree.dump(&mut out).context("failed to print tree")?;
        out.flush().context("failed to print tree")?;
    }
    Ok(())
}

fn write_model<M: Serialize>(model: &M, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model)
        .with_context(|| format!("failed to write model to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write model to {}", path.display()))?;
    println!("{DIM}model written to {}{RESET}", path.display());
    Ok(())
}

fn print_header(task: &str, data: &Path) {
    println!("{BOLD}{FG_CYAN}▶ {task}{RESET}");
    println!("{DIM}data={}{RESET}  {}", data.display(), timestamp_now());
    println!(
        "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
    );
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
