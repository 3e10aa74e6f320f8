//! Skip-gram training binary.
//!
//! Trains a skip-gram model on a text file, reports training-set accuracy,
//! and optionally appends JSONL metric events for dashboard consumption.

use clap::Parser;
use sgm::{SkipGramModel, UpdateMode};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "sgm-train", about = "Train a skip-gram model on a text file")]
struct Args {
    /// Input text file
    #[arg(long)]
    text_file: PathBuf,

    /// Context window size
    #[arg(long, default_value_t = 3)]
    window: usize,

    /// Embedding / hidden dimension
    #[arg(long, default_value_t = 50)]
    dimension: usize,

    /// Mini-batch size (0 = whole training set)
    #[arg(long, default_value_t = 0)]
    batch_size: usize,

    /// Learning rate (alpha)
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,

    /// Momentum coefficient (mu)
    #[arg(long, default_value_t = 0.9)]
    mu: f64,

    /// L2 regularization coefficient (lambda)
    #[arg(long, default_value_t = 0.03)]
    lambda: f64,

    /// Convergence threshold on the loss
    #[arg(long, default_value_t = 4e-13)]
    threshold: f64,

    /// Iteration cap (0 = samples * 100000)
    #[arg(long, default_value_t = 0)]
    max_iterations: usize,

    /// Update strategy: plain, momentum, or nesterov
    #[arg(long, default_value = "plain")]
    update: String,

    /// Optional JSONL metrics file (append mode)
    #[arg(long)]
    metrics_file: Option<PathBuf>,

    /// Tokens to probe pairwise similarity for after training
    #[arg(long, num_args = 0..)]
    probe: Vec<String>,
}

fn parse_update(s: &str) -> Result<UpdateMode, String> {
    match s {
        "plain" => Ok(UpdateMode::Plain),
        "momentum" => Ok(UpdateMode::Momentum),
        "nesterov" => Ok(UpdateMode::Nesterov),
        other => Err(format!(
            "unknown update mode '{other}' (expected plain, momentum, or nesterov)"
        )),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let update = match parse_update(&args.update) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let text = match fs::read_to_string(&args.text_file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to read {}: {e}", args.text_file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut metrics_file = args.metrics_file.as_ref().map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("failed to open metrics file")
    });

    eprintln!("Skip-gram training");
    eprintln!("  Text: {} ({} bytes)", args.text_file.display(), text.len());
    eprintln!("  Window: {}, dimension: {}", args.window, args.dimension);
    eprintln!(
        "  Alpha: {}, mu: {}, lambda: {}, update: {}",
        args.alpha, args.mu, args.lambda, args.update
    );

    if let Some(ref mut file) = metrics_file {
        let event = serde_json::json!({
            "type": "train_start",
            "window": args.window,
            "dimension": args.dimension,
            "batch_size": args.batch_size,
            "alpha": args.alpha,
            "mu": args.mu,
            "lambda": args.lambda,
            "update": args.update,
        });
        writeln!(file, "{event}").expect("failed to write metrics");
    }

    let start = Instant::now();
    let model = match SkipGramModel::builder()
        .from_text(text)
        .window(args.window)
        .dimension(args.dimension)
        .batch_size(args.batch_size)
        .alpha(args.alpha)
        .mu(args.mu)
        .lambda(args.lambda)
        .threshold(args.threshold)
        .max_iterations(args.max_iterations)
        .update(update)
        .build()
    {
        Ok(model) => model,
        Err(e) => {
            eprintln!("training failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed().as_secs_f64();

    let accuracy = model.evaluate();
    let report = model.report();

    eprintln!(
        "Converged after {} iterations with loss {:.6} in {:.1}s",
        report.iterations, report.loss, elapsed
    );
    eprintln!(
        "  Vocabulary: {} tokens, samples: {}",
        model.vocabulary().len(),
        model.samples().len()
    );
    eprintln!("  Training-set accuracy: {:.2}%", accuracy * 100.0);

    for pair in args.probe.windows(2) {
        if let Some(score) = model.similarity(&pair[0], &pair[1]) {
            eprintln!("  similarity({}, {}) = {:.4}", pair[0], pair[1], score);
        } else {
            eprintln!("  similarity({}, {}): unknown token", pair[0], pair[1]);
        }
    }

    if let Some(ref mut file) = metrics_file {
        let event = serde_json::json!({
            "type": "train_complete",
            "iterations": report.iterations,
            "loss": report.loss,
            "accuracy": accuracy,
            "vocabulary": model.vocabulary().len(),
            "samples": model.samples().len(),
            "elapsed_secs": elapsed,
        });
        writeln!(file, "{event}").expect("failed to write metrics");
        file.flush().expect("failed to flush metrics");
    }

    ExitCode::SUCCESS
}
