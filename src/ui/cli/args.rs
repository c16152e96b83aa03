use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value};

use crate::classifiers::BuilderConfig;
use crate::evaluation::loss::LossFunctionKind;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Train and cross-validate weighted decision trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train a tree on an ARFF file
    Train(TrainArgs),
    /// Estimate the loss of a tree configuration with k-fold cross validation
    CrossValidate(CrossValidateArgs),
}

#[derive(Debug, Args)]
pub struct LearnerArgs {
    /// ARFF file with the training data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Index of the class attribute (defaults to the last attribute)
    #[arg(long, value_name = "INDEX")]
    pub class_index: Option<usize>,

    /// JSON object of builder options, applied before --learner-param
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override builder options (key=value, nested keys with dots)
    #[arg(long = "learner-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub learner_params: Vec<KeyValue>,

    /// Downsample the majority label until the minority reaches this share
    #[arg(long, value_name = "PROPORTION")]
    pub downsample: Option<f64>,

    /// Seed for downsampling and fold assignment
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Write the trained model as JSON
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Print the trained tree
    #[arg(long)]
    pub dump: bool,
}

#[derive(Debug, Args)]
pub struct CrossValidateArgs {
    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Number of folds
    #[arg(
        long,
        default_value_t = 5,
        value_name = "K",
        value_parser = clap::value_parser!(u64).range(2..),
    )]
    pub folds: u64,

    /// Loss function (log-cv, rmse)
    #[arg(long, default_value = "log-cv", value_name = "LOSS")]
    pub loss: String,
}

#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl LearnerArgs {
    /// Options from `--config`, then every `--learner-param` on top.
    pub fn builder_config(&self) -> Result<BuilderConfig> {
        let mut params = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<Value>(&text)
                    .with_context(|| format!("invalid JSON in {}", path.display()))?
            }
            None => Value::Object(Map::new()),
        };
        apply_overrides(&mut params, &self.learner_params)?;
        match params {
            Value::Object(map) => Ok(map),
            other => bail!("builder config must be a JSON object, got {other}"),
        }
    }
}

impl CrossValidateArgs {
    pub fn loss_kind(&self) -> Result<LossFunctionKind> {
        parse_kind::<LossFunctionKind>(&self.loss)
            .with_context(|| format!("invalid loss function '{}'", self.loss))
    }
}

fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let candidates = candidate_spellings(raw);
    for cand in candidates {
        if let Ok(parsed) = cand.parse::<T>() {
            return Ok(parsed);
        }
    }
    Err(anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return out;
    }

    out.push(trimmed.to_string());
    out.push(trimmed.to_lowercase());
    out.push(kebab_from_token(trimmed));
    out.push(trimmed.replace('_', "-"));
    out.sort();
    out.dedup();
    out
}

fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            for low in ch.to_lowercase() {
                buf.push(low);
            }
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    if buf.is_empty() {
        token.to_lowercase()
    } else {
        buf
    }
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
