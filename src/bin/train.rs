//! Trains a network to tell points inside a unit disc centred on `(-2, 0)`
//! from the rest of the `[-3, 3] x [-1, 1]` rectangle, then reports the
//! learned weights and the success rate on fresh samples.
//!
//! Usage: cargo run --bin train -- --train-times 20000 --test-times 5000

use anyhow::{Context, Result};
use bp_ann::feed_forward::Network;
use bp_ann::layers::{feature, Layer, MappingInputLayer, Parameters};
use bp_ann::task::{one_hot, Task};
use bp_ann::trainer::{accuracy, Logging, Trainer};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_derive::Serialize;
use std::fmt::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

const INPUT_WIDTH: usize = 2;
const OUTPUT_WIDTH: usize = 2;
const X_RANGE: f64 = 3.0;
const Y_RANGE: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a backpropagation network on a 2-D region")]
struct Args {
    /// Number of training samples
    #[arg(long, default_value_t = 10_000)]
    train_times: usize,

    /// Number of fresh samples used to measure the success rate
    #[arg(long, default_value_t = 10_000)]
    test_times: usize,

    /// Gradient descent step size
    #[arg(long, default_value_t = 0.03)]
    learning_rate: f64,

    /// Seed for weight initialization and sampling
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Log the mean loss every this many samples (0 disables)
    #[arg(long, default_value_t = 1000)]
    log_every: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Uniform points labelled by whether they fall inside the disc.
struct Disc {
    rng: StdRng,
}

impl Task for Disc {
    fn sample(&mut self, input: &mut [f64]) {
        input[0] = self.rng.gen_range(-1.0..=1.0) * X_RANGE;
        input[1] = self.rng.gen_range(-1.0..=1.0) * Y_RANGE;
    }

    fn label(&self, input: &[f64], target: &mut [f64]) -> bp_ann::Result<usize> {
        let (x, y) = (input[0], input[1]);
        let class = if (x + 2.0) * (x + 2.0) + y * y < 1.0 { 0 } else { 1 };
        one_hot(class, target)
    }
}

fn build_network<R: Rng>(rng: &mut R) -> bp_ann::Result<Network> {
    let input = MappingInputLayer::new(
        INPUT_WIDTH,
        vec![
            feature(|x| x[0].sin()),
            feature(|x| x[1].sin()),
            feature(|x| x[0] * x[0]),
            feature(|x| x[0] * x[1]),
        ],
    )?;
    Network::builder(input)
        .dense(rng, 6)?
        .dense(rng, 6)?
        .output(rng, OUTPUT_WIDTH)
}

#[derive(Serialize)]
struct Report<'a> {
    layers: Vec<LayerReport<'a>>,
    success_rate: f64,
}

#[derive(Serialize)]
struct LayerReport<'a> {
    layer: usize,
    #[serde(flatten)]
    parameters: &'a Parameters,
}

/// Renders the weights of every trainable layer followed by the success
/// rate, as plain text or as JSON.
fn format_report(network: &Network, success_rate: f64, json: bool) -> Result<String> {
    let layers: Vec<LayerReport> = network
        .layers()
        .iter()
        .enumerate()
        .filter_map(|(layer, l)| {
            l.parameters()
                .map(|parameters| LayerReport { layer, parameters })
        })
        .collect();

    if json {
        let report = Report {
            layers,
            success_rate,
        };
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let mut text = String::new();
    for layer in &layers {
        writeln!(text, "layer{} weights: ", layer.layer)?;
        write!(text, "{}", layer.parameters)?;
    }
    writeln!(text, "success rate = {}%", success_rate)?;
    Ok(text)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let network = build_network(&mut rng).context("failed to build network")?;
    info!(layers = network.layers().len(), "network assembled");

    let mut task = Disc { rng };
    let logging = if args.log_every > 0 {
        Logging::Iterations(args.log_every)
    } else {
        Logging::Completion
    };
    let network = Trainer::new(network)
        .learning_rate(args.learning_rate)
        .iterations(args.train_times)
        .logging(logging)
        .train(&mut task)
        .context("training failed")?;

    let success_rate =
        accuracy(&network, &mut task, args.test_times).context("evaluation failed")?;
    print!("{}", format_report(&network, success_rate, args.json)?);
    Ok(())
}
