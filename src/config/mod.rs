use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, TriggerError};
use crate::output::KeySymbol;
use crate::processing::bands::Band;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub spectrum: SpectrumConfig,
    pub trigger: TriggerConfig,
    pub bands: Vec<BandConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessorConfig {
    /// Delay between loop iterations, milliseconds.
    pub tick_ms: u64,
    /// Analysis window length, samples.
    pub window_len: usize,
    /// Channel index read from the source.
    pub channel: usize,
    /// Consecutive failed reads tolerated before the run is aborted.
    pub max_source_failures: u32,
    /// Append one CSV row of band powers per analyzed cycle.
    pub record_cycles: bool,
    pub record_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    pub sampling_rate: f64,
    pub tone_hz: f64,
    pub tone_amplitude: f64,
    pub noise_amplitude: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    pub low_hz: f64,
    pub high_hz: f64,
    pub order: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpectrumConfig {
    /// Welch segment length; equal to `window_len` for a single segment.
    pub segment_len: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TriggerConfig {
    pub cooldown_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BandConfig {
    pub name: String,
    pub low_hz: f64,
    pub high_hz: f64,
    pub threshold: f64,
    pub key: String,
}

impl Config {
    /// Startup validation. Every violation is fatal before the first loop
    /// iteration.
    pub fn validate(&self) -> Result<()> {
        let fs = self.source.sampling_rate;
        let nyquist = fs / 2.0;

        if fs <= 0.0 {
            return Err(invalid(format!("sampling rate {} must be positive", fs)));
        }
        if self.bands.is_empty() {
            return Err(invalid("band list is empty".to_string()));
        }
        for band in &self.bands {
            if !(band.low_hz >= 0.0 && band.low_hz < band.high_hz && band.high_hz <= nyquist) {
                return Err(invalid(format!(
                    "band '{}' bounds {}..{} Hz outside [0, {}] Hz",
                    band.name, band.low_hz, band.high_hz, nyquist
                )));
            }
            KeySymbol::parse(&band.key)?;
        }
        if !(self.filter.low_hz > 0.0
            && self.filter.low_hz < self.filter.high_hz
            && self.filter.high_hz < nyquist)
        {
            return Err(invalid(format!(
                "filter bounds {}..{} Hz outside (0, {}) Hz",
                self.filter.low_hz, self.filter.high_hz, nyquist
            )));
        }
        if self.filter.order == 0 || self.filter.order % 2 != 0 {
            return Err(invalid(format!(
                "filter order {} is not a positive even number",
                self.filter.order
            )));
        }
        if self.trigger.cooldown_ms == 0 {
            return Err(invalid("cooldown must be positive".to_string()));
        }
        if self.processor.tick_ms == 0 {
            return Err(invalid("tick delay must be positive".to_string()));
        }
        if self.processor.window_len < 4 {
            return Err(invalid(format!(
                "window length {} is too short",
                self.processor.window_len
            )));
        }
        if self.spectrum.segment_len < 4 || self.spectrum.segment_len > self.processor.window_len {
            return Err(invalid(format!(
                "segment length {} outside 4..={}",
                self.spectrum.segment_len, self.processor.window_len
            )));
        }
        if self.processor.max_source_failures == 0 {
            return Err(invalid(
                "max_source_failures must be at least 1".to_string(),
            ));
        }
        if self.processor.record_cycles && self.processor.record_path.is_none() {
            return Err(invalid(
                "record_cycles is set but record_path is missing".to_string(),
            ));
        }
        Ok(())
    }

    /// Bands in configured (priority) order, key names resolved.
    pub fn resolved_bands(&self) -> Result<Vec<Band>> {
        self.bands
            .iter()
            .map(|band| {
                Ok(Band {
                    name: band.name.clone(),
                    low_hz: band.low_hz,
                    high_hz: band.high_hz,
                    threshold: band.threshold,
                    symbol: KeySymbol::parse(&band.key)?,
                })
            })
            .collect()
    }
}

fn invalid(message: String) -> TriggerError {
    TriggerError::InvalidConfig(message)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;

    let config: Config = serde_yaml::from_str(&config_str)
        .map_err(|e| TriggerError::InvalidConfig(format!("failed to parse config file: {}", e)))?;
    config.validate()?;
    Ok(config)
}
