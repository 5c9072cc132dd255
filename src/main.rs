use colored::Colorize;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use frequency_key_trigger::{
    load_config, ConsoleKeySink, PipelineDriver, Result, SyntheticSource,
};

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {}", "error:".red().bold(), error);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.yaml".to_string());
    let config = load_config(&config_path)?;

    let source = SyntheticSource::new(
        config.source.sampling_rate,
        config.source.tone_hz,
        config.source.tone_amplitude,
        config.source.noise_amplitude,
    );
    let mut driver = PipelineDriver::new(source, ConsoleKeySink, &config)?;

    // Interrupt flips the flag; the loop observes it between iterations.
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .map_err(|e| {
        frequency_key_trigger::TriggerError::InvalidConfig(format!(
            "failed to install interrupt handler: {}",
            e
        ))
    })?;

    println!(
        "{} {} bands, {} Hz sampling, config '{}'",
        "frequency key trigger".bold(),
        config.bands.len(),
        config.source.sampling_rate,
        config_path
    );

    driver.run(&running)?;
    println!("{}", "streaming stopped".bold());
    Ok(())
}
