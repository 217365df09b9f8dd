use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use log::error;

use tortoise_rl::{build_brain, AgentConfig, Result, Sensor, SensorRecord, TortoiseError};

const DEFAULT_WEIGHTS: &str = "weights.txt";

// Usage: tortoise_rl [weights-file] [random|reflex|learning] < sensors.csv
fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let mut config = AgentConfig {
        weights_path: Some(PathBuf::from(
            args.next().unwrap_or_else(|| DEFAULT_WEIGHTS.to_string()),
        )),
        ..AgentConfig::default()
    };
    if let Some(brain) = args.next() {
        config.brain = brain.parse()?;
    }
    if let Ok(size) = env::var("TORTOISE_GRID_SIZE") {
        config.grid_size = size.trim().parse().map_err(|_| TortoiseError::InvalidConfig {
            name: "TORTOISE_GRID_SIZE".to_string(),
            reason: format!("'{}' is not a grid size", size),
        })?;
    }

    let mut brain = build_brain(&config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut reader = csv::Reader::from_reader(stdin.lock());
    for record in reader.deserialize::<SensorRecord>() {
        let sensor = Sensor::try_from(record?)?;
        let action = brain.decide(&sensor)?;
        writeln!(out, "{}", action)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
