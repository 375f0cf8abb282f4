use backprop::config::Hyperparameters;
use backprop::network::Network;
use backprop::trainer::{Logging, Trainer};

use log::{error, info};
use std::env;
use std::process;

type Input = [f64; 2];
type Output = [f64; 1];

const SAMPLES: [Input; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const XOR: [Output; 4] = [[0.0], [1.0], [1.0], [0.0]];

fn score(network: &mut Network) -> usize {
    let mut num_correct = 0;
    for (input, expected) in SAMPLES.iter().zip(&XOR) {
        let output = network.evaluate(input);
        info!("{:?} -> {:.4} (expected {})", input, output[0], expected[0]);
        if (output[0] > 0.5) == (expected[0] > 0.5) {
            num_correct += 1;
        }
    }
    num_correct
}

fn run() -> backprop::Result<()> {
    let params = match env::args().nth(1) {
        Some(path) => Hyperparameters::load(path)?,
        None => Hyperparameters::default(),
    };
    info!("training XOR with {:?}", params);

    let network = Network::new(
        2,
        1,
        &params.hidden,
        params.hidden_activator,
        params.output_activator,
    )?;
    let mut network = Trainer::with_hyperparameters(network, &params)
        .logging(Logging::Iterations(100))
        .train(&SAMPLES, &XOR)?;

    info!("{} of {} correct", score(&mut network), SAMPLES.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
