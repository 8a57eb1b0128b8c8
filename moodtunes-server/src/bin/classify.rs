//! Classifier smoke test
//!
//! Loads the configured model and prints the normalized prediction and the
//! most likely classes for each input.
//!
//! **Usage:**
//! ```bash
//! moodtunes-classify [--model <file>] [--top <n>] [TEXT]...
//! ```
//!
//! Without TEXT arguments a built-in list of sample sentences is used.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moodtunes_common::classifier::TfidfLogisticModel;
use moodtunes_common::config::load_config;
use moodtunes_common::EmotionClassifier;
use tracing::info;

const SAMPLES: &[&str] = &[
    "I am so happy today!",
    "This is terrifying!",
    "Why do I feel so mad right now?",
    "I'm anxious and nervous.",
    "Such a joyful day!",
];

/// Emotion classifier smoke test
#[derive(Parser, Debug)]
#[clap(name = "moodtunes-classify")]
#[clap(about = "Print emotion predictions for sample or given sentences")]
struct Args {
    /// Config file (TOML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Classifier artifact, overrides the configured one
    #[clap(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Number of probabilities to print per input
    #[clap(long, default_value = "3")]
    top: usize,

    /// Sentences to classify
    texts: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let (config, _) = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let aliases = config.alias_table().context("Invalid alias table")?;
    let model_path = args.model.unwrap_or(config.model_path);

    let model = TfidfLogisticModel::load(&model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;
    info!(
        "Loaded {} ({} classes)",
        model_path.display(),
        model.labels().len()
    );

    let texts: Vec<String> = if args.texts.is_empty() {
        SAMPLES.iter().map(|s| s.to_string()).collect()
    } else {
        args.texts
    };

    for text in &texts {
        let raw = model.predict(text)?;
        println!(
            "Input: {} => Predicted Emotion: {}",
            text,
            aliases.normalize(&raw)
        );

        let mut probabilities = model.probabilities(text);
        probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (label, p) in probabilities.iter().take(args.top) {
            println!("    {:<12} {:.3}", label, p);
        }
    }

    Ok(())
}
