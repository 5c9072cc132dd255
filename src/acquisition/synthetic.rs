use rand::Rng;
use std::collections::VecDeque;
use std::time::Instant;

use super::SignalSource;
use crate::error::{Result, TriggerError};

// SYNTHETIC BOARD -------------------------------------------------------------

// Rolling buffer depth of the simulated board, samples per channel.
const RING_CAPACITY: usize = 4096;

/// Stand-in for a hardware acquisition board: one channel carrying a pure
/// tone plus bounded uniform noise, synthesized at a fixed sampling rate.
///
/// Between reads the buffer advances by however many sample periods of
/// wall-clock time have elapsed since the session opened, so the board
/// "streams" while the driver sleeps. `advance` feeds the generator
/// directly for clock-free tests.
pub struct SyntheticSource {
    fs: f64,
    tone_hz: f64,
    tone_amplitude: f64,
    noise_amplitude: f64,
    buffer: VecDeque<f64>,
    synthesized: u64,
    session: Option<Instant>,
}

impl SyntheticSource {
    pub fn new(fs: f64, tone_hz: f64, tone_amplitude: f64, noise_amplitude: f64) -> Self {
        Self {
            fs,
            tone_hz,
            tone_amplitude,
            noise_amplitude,
            buffer: VecDeque::with_capacity(RING_CAPACITY),
            synthesized: 0,
            session: None,
        }
    }

    /// Synthesizes `count` further samples into the rolling buffer.
    pub fn advance(&mut self, count: usize) {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            let t = self.synthesized as f64 / self.fs;
            let mut sample =
                self.tone_amplitude * (2.0 * std::f64::consts::PI * self.tone_hz * t).sin();
            if self.noise_amplitude > 0.0 {
                sample += rng.gen_range(-self.noise_amplitude..=self.noise_amplitude);
            }

            if self.buffer.len() == RING_CAPACITY {
                self.buffer.pop_front();
            }
            self.buffer.push_back(sample);
            self.synthesized += 1;
        }
    }

    // Catch the generator up with wall-clock streaming time.
    fn poll(&mut self) {
        if let Some(opened_at) = self.session {
            let target = (opened_at.elapsed().as_secs_f64() * self.fs) as u64;
            let missing = target.saturating_sub(self.synthesized);
            self.advance(missing as usize);
        }
    }
}

impl SignalSource for SyntheticSource {
    fn open(&mut self) -> Result<()> {
        self.session = Some(Instant::now());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.session = None;
        self.buffer.clear();
        Ok(())
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn latest_samples(&mut self, channel: usize, count: usize) -> Result<Vec<f64>> {
        if self.session.is_none() {
            return Err(TriggerError::SourceUnavailable(
                "session not open".to_string(),
            ));
        }
        if channel != 0 {
            return Err(TriggerError::SourceUnavailable(format!(
                "synthetic board has a single channel, got index {}",
                channel
            )));
        }

        self.poll();
        let available = self.buffer.len();
        let take = available.min(count);
        Ok(self.buffer.iter().skip(available - take).copied().collect())
    }
}
