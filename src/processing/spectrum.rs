//! Power spectral density estimation via Welch's method: the analysis
//! window is split into half-overlapping segments, each segment is mean-
//! detrended, Hann-windowed and transformed, and the periodograms are
//! averaged with density scaling. The driver runs it with a segment length
//! equal to the full window, which degenerates to a single segment; the
//! segment length stays configurable.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{Result, TriggerError};

/// One-sided power spectrum for a single analysis window. All power values
/// are non-negative; bin `k` sits at `k * resolution` Hz.
pub struct PowerSpectrum {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
    pub resolution: f64,
}

pub struct WelchEstimator {
    segment_len: usize,
    fs: f64,
    window_coeffs: Vec<f64>,
    window_power: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl WelchEstimator {
    pub fn new(segment_len: usize, fs: f64) -> Result<Self> {
        if segment_len < 4 {
            return Err(TriggerError::InvalidConfig(format!(
                "welch segment length {} is too short",
                segment_len
            )));
        }

        let window_coeffs = hann(segment_len);
        let window_power = window_coeffs.iter().map(|w| w * w).sum::<f64>();
        let fft = FftPlanner::new().plan_fft_forward(segment_len);

        Ok(Self {
            segment_len,
            fs,
            window_coeffs,
            window_power,
            fft,
        })
    }

    /// Frequency spacing between adjacent bins, `fs / segment_len`.
    pub fn resolution(&self) -> f64 {
        self.fs / self.segment_len as f64
    }

    /// Estimates the one-sided PSD of `samples`. Input shorter than one
    /// segment yields an all-zero spectrum.
    pub fn estimate(&self, samples: &[f64]) -> PowerSpectrum {
        let n = self.segment_len;
        let n_freq = n / 2 + 1;
        let frequencies: Vec<f64> = (0..n_freq).map(|k| k as f64 * self.resolution()).collect();

        if samples.len() < n {
            return PowerSpectrum {
                frequencies,
                power: vec![0.0; n_freq],
                resolution: self.resolution(),
            };
        }

        // Half-overlapping segments
        let step = (n / 2).max(1);
        let num_segments = (samples.len() - n) / step + 1;

        let mut accum = vec![0.0f64; n_freq];
        let mut buffer = vec![Complex64::new(0.0, 0.0); n];

        for seg in 0..num_segments {
            let segment = &samples[seg * step..seg * step + n];
            let mean = segment.iter().sum::<f64>() / n as f64;

            for (slot, (&sample, &coeff)) in buffer
                .iter_mut()
                .zip(segment.iter().zip(self.window_coeffs.iter()))
            {
                *slot = Complex64::new((sample - mean) * coeff, 0.0);
            }
            self.fft.process(&mut buffer);

            for (k, slot) in buffer.iter().take(n_freq).enumerate() {
                accum[k] += slot.norm_sqr();
            }
        }

        // Density scaling, averaged over segments; interior bins carry the
        // mirrored negative-frequency energy as well.
        let scale = 1.0 / (self.fs * self.window_power * num_segments as f64);
        let power: Vec<f64> = accum
            .iter()
            .enumerate()
            .map(|(k, &p)| {
                let one_sided = if k == 0 || (n % 2 == 0 && k == n / 2) {
                    1.0
                } else {
                    2.0
                };
                p * scale * one_sided
            })
            .collect();

        PowerSpectrum {
            frequencies,
            power,
            resolution: self.resolution(),
        }
    }
}

fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let n = i as f64 / size as f64;
            0.5 * (1.0 - (2.0 * std::f64::consts::PI * n).cos())
        })
        .collect()
}
