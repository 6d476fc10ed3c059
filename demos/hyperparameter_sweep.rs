//! Hyperparameter Sweep Example
//!
//! Enumerates a small learning-rate x batch-size x shuffle grid, drives a
//! toy classifier through every configuration with full lifecycle tracking,
//! streams telemetry to JSONL session files, and saves the CSV/JSON result
//! artifacts.
//!
//! Run with: cargo run --example hyperparameter_sweep

use barrido::data::{Batch, InMemoryDataSource, StepOutcome};
use barrido::model::{ModelProbe, ParameterSnapshot};
use barrido::run::RunManager;
use barrido::sweep::{ParamValue, ParameterSpace, SweepBuilder};
use barrido::telemetry::JsonlSink;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const EPOCHS: u32 = 3;
const DATASET_SIZE: usize = 200;
const FEATURES: usize = 4;
const CLASSES: usize = 2;

/// A stand-in for a real model: its "skill" improves with the learning rate,
/// and its fake weights drift each batch so parameter histograms move.
struct ToyClassifier {
    weights: Vec<f32>,
    weight_grads: Vec<f32>,
    bias: Vec<f32>,
    skill: f64,
}

impl ToyClassifier {
    fn new() -> Self {
        Self {
            weights: vec![0.1; FEATURES * CLASSES],
            weight_grads: vec![0.0; FEATURES * CLASSES],
            bias: vec![0.0; CLASSES],
            skill: 0.5,
        }
    }

    fn train_batch(&mut self, batch: &Batch, lr: f64, rng: &mut StdRng) -> StepOutcome {
        for (weight, grad) in self.weights.iter_mut().zip(&mut self.weight_grads) {
            *grad = (rng.gen::<f32>() - 0.5) * 0.1;
            *weight -= lr as f32 * *grad;
        }
        self.skill = (self.skill + lr * 0.05).min(0.95);

        let predictions = batch
            .labels
            .iter()
            .map(|&label| {
                let predicted = if rng.gen_bool(self.skill) {
                    label
                } else {
                    (label + 1) % CLASSES
                };
                let mut scores = vec![0.0_f32; CLASSES];
                scores[predicted] = 1.0;
                scores
            })
            .collect();
        StepOutcome {
            predictions,
            loss: (1.0 - self.skill) * 2.0,
        }
    }
}

impl ModelProbe for ToyClassifier {
    fn describe(&self) -> String {
        format!("toy-classifier({FEATURES} -> {CLASSES})")
    }

    fn parameters(&self) -> Vec<ParameterSnapshot> {
        vec![
            ParameterSnapshot::new("weights", self.weights.clone())
                .with_gradients(self.weight_grads.clone()),
            ParameterSnapshot::new("bias", self.bias.clone()),
        ]
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Barrido Hyperparameter Sweep ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let out = tempfile::tempdir()?;

    // -------------------------------------------------------------------------
    // 1. Declare the parameter space
    // -------------------------------------------------------------------------
    println!("1. Declaring parameter space...");

    let space = ParameterSpace::new()
        .parameter("lr", [0.1, 0.01])
        .parameter("batch_size", [16, 32])
        .parameter("shuffle", [true, false]);

    let configs = SweepBuilder::enumerate(&space);
    println!("   Parameters: {:?}", space.names().collect::<Vec<_>>());
    println!("   Combinations: {}", configs.len());

    // -------------------------------------------------------------------------
    // 2. Build a labeled dataset
    // -------------------------------------------------------------------------
    println!("\n2. Building dataset ({DATASET_SIZE} samples)...");

    let samples: Vec<(Vec<f32>, usize)> = (0..DATASET_SIZE)
        .map(|_| {
            let features = (0..FEATURES).map(|_| rng.gen::<f32>()).collect();
            (features, rng.gen_range(0..CLASSES))
        })
        .collect();

    // -------------------------------------------------------------------------
    // 3. Drive every configuration through the run lifecycle
    // -------------------------------------------------------------------------
    println!("\n3. Running sweep ({EPOCHS} epochs per configuration)...");

    let telemetry_dir = out.path().join("telemetry");
    let mut manager = RunManager::builder()
        .sink(JsonlSink::new(&telemetry_dir))
        .build();

    for config in configs {
        let lr = config
            .get("lr")
            .and_then(ParamValue::as_float)
            .unwrap_or(0.01);
        let batch_size = config
            .get("batch_size")
            .and_then(ParamValue::as_int)
            .map_or(16, |n| n as usize);
        let shuffle = config
            .get("shuffle")
            .and_then(ParamValue::as_bool)
            .unwrap_or(false);

        let mut run_samples = samples.clone();
        if shuffle {
            run_samples.shuffle(&mut rng);
        }
        let data = InMemoryDataSource::new(run_samples, batch_size);

        let mut model = ToyClassifier::new();
        manager.begin_run(config, &model, &data)?;
        for _ in 0..EPOCHS {
            manager.run_epoch(&mut model, &data, |model, batch| {
                model.train_batch(batch, lr, &mut rng)
            })?;
        }
        manager.end_run()?;
    }

    println!("   Runs completed: {}", manager.runs_started());

    // -------------------------------------------------------------------------
    // 4. Inspect the history
    // -------------------------------------------------------------------------
    println!("\n4. Epoch history:");
    println!(
        "   {:<4} {:<6} {:>8} {:>9}  parameters",
        "run", "epoch", "loss", "accuracy"
    );
    for record in manager.history() {
        let params: Vec<String> = record
            .params()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!(
            "   {:<4} {:<6} {:>8.4} {:>9.4}  {}",
            record.run(),
            record.epoch(),
            record.loss(),
            record.accuracy(),
            params.join(", ")
        );
    }

    if let Some(best) = manager
        .history()
        .iter()
        .min_by(|a, b| a.loss().total_cmp(&b.loss()))
    {
        println!(
            "\n   Best epoch: run {} epoch {} (loss {:.4})",
            best.run(),
            best.epoch(),
            best.loss()
        );
    }

    // -------------------------------------------------------------------------
    // 5. Persist the artifacts
    // -------------------------------------------------------------------------
    println!("\n5. Saving artifacts...");

    let stem = out.path().join("sweep_results");
    manager.save(&stem)?;

    let csv = std::fs::read_to_string(out.path().join("sweep_results.csv"))?;
    println!("   Wrote {} and .json", out.path().join("sweep_results.csv").display());
    println!("   CSV preview:");
    for line in csv.lines().take(4) {
        println!("     {line}");
    }

    let sessions = std::fs::read_dir(&telemetry_dir)?.count();
    println!("   Telemetry sessions: {sessions}");

    println!("\n=== Sweep Complete ===");
    Ok(())
}
