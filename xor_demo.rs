use rust_feedforward_nn::config::{build_network, load_config};
use rust_feedforward_nn::{column, Network, Result, SimpleRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Small network learning XOR, driven through the public training API.
const DEFAULT_CONFIG: &str = "config/xor.json";
const EPOCHS: usize = 5_000;
const LOG_EVERY: usize = 500;

// XOR dataset (binary inputs and expected outputs).
const INPUTS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const TARGETS: [f64; 4] = [0.0, 1.0, 1.0, 0.0];

// One pass over the samples in shuffled order; returns the mean loss.
fn train_epoch(network: &mut Network, order: &mut [usize], rng: &mut SimpleRng) -> Result<f64> {
    rng.shuffle(order);

    let mut total = 0.0;
    for &sample in order.iter() {
        total += network.train_sample(&column(&INPUTS[sample]), &column(&[TARGETS[sample]]))?;
    }
    Ok(total / order.len() as f64)
}

fn run(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let mut network = build_network(&config)?;
    let mut rng = SimpleRng::new(config.seed.unwrap_or(7));
    let mut order: Vec<usize> = (0..INPUTS.len()).collect();

    for epoch in 0..EPOCHS {
        let loss = train_epoch(&mut network, &mut order, &mut rng)?;
        if (epoch + 1) % LOG_EVERY == 0 {
            info!(epoch = epoch + 1, loss, "training");
        }
    }

    for (input, target) in INPUTS.iter().zip(TARGETS) {
        let output = network.propagate_forward(&column(input))?;
        println!(
            "Input: {:.1}, {:.1}, Expected Output: {:.1}, Predicted Output: {:.3}",
            input[0],
            input[1],
            target,
            output[[0, 0]]
        );
    }

    println!("{}", network.to_record().to_json_pretty()?);
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    if let Err(e) = run(&config_path) {
        warn!(error = %e, "xor demo failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_feedforward_nn::LayerParams;

    #[test]
    fn test_train_epoch_reduces_loss() {
        let mut network = Network::with_rng("xor", 2, "se", 0.5, SimpleRng::new(42)).unwrap();
        network
            .add_layer("tanh", 4, &LayerParams::tanh(1.0, 1.0))
            .unwrap();
        network
            .add_layer("logistic", 1, &LayerParams::default())
            .unwrap();

        let mut rng = SimpleRng::new(1);
        let mut order: Vec<usize> = (0..INPUTS.len()).collect();
        let first = train_epoch(&mut network, &mut order, &mut rng).unwrap();
        let mut last = first;
        for _ in 0..2_000 {
            last = train_epoch(&mut network, &mut order, &mut rng).unwrap();
        }
        assert!(last < first);
    }
}
