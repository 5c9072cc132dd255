use crate::error::{Result, TriggerError};

// BANDPASS FILTER -------------------------------------------------------------

#[derive(Clone, Copy)]
enum SectionKind {
    HighPass,
    LowPass,
}

// Biquad section, Butterworth response (Q = sqrt(2)/2, maximally flat
// passband).
struct SecondOrderFilter {
    a: [f64; 3],
    b: [f64; 3],
    x: [f64; 2],
    y: [f64; 2],
}

impl SecondOrderFilter {
    fn new(f0: f64, fs: f64, kind: SectionKind) -> Self {
        let q = (2.0f64).sqrt() / 2.0;
        let omega = 2.0 * std::f64::consts::PI * f0 / fs;
        let alpha = f64::sin(omega) / (2.0 * q);

        let (b0, b1, b2) = match kind {
            SectionKind::HighPass => (
                (1.0 + f64::cos(omega)) / 2.0,
                -(1.0 + f64::cos(omega)),
                (1.0 + f64::cos(omega)) / 2.0,
            ),
            SectionKind::LowPass => (
                (1.0 - f64::cos(omega)) / 2.0,
                1.0 - f64::cos(omega),
                (1.0 - f64::cos(omega)) / 2.0,
            ),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * f64::cos(omega);
        let a2 = 1.0 - alpha;

        SecondOrderFilter {
            a: [a0, a1, a2],
            b: [b0, b1, b2],
            x: [0.0, 0.0],
            y: [0.0, 0.0],
        }
    }

    fn reset(&mut self) {
        self.x = [0.0, 0.0];
        self.y = [0.0, 0.0];
    }

    fn calculate_output(&mut self, input: f64) -> f64 {
        let output = (self.b[0] / self.a[0]) * input
            + (self.b[1] / self.a[0]) * self.x[0]
            + (self.b[2] / self.a[0]) * self.x[1]
            - (self.a[1] / self.a[0]) * self.y[0]
            - (self.a[2] / self.a[0]) * self.y[1];

        // Update internal sample history
        self.x[1] = self.x[0];
        self.x[0] = input;
        self.y[1] = self.y[0];
        self.y[0] = output;

        output
    }
}

/// Butterworth bandpass built as a cascade of second-order sections: one
/// high-pass at the low cutoff and one low-pass at the high cutoff per
/// stage. `order` is the total filter order and must be even; order 4
/// gives two stages.
///
/// Section state is zeroed before every `apply`, so consecutive windows
/// are filtered independently. The startup transient stays inside the
/// window being analyzed and never leaks into a later cycle.
pub struct BandPassFilter {
    high_pass: Vec<SecondOrderFilter>,
    low_pass: Vec<SecondOrderFilter>,
}

impl BandPassFilter {
    pub fn new(low_hz: f64, high_hz: f64, order: usize, fs: f64) -> Result<Self> {
        let nyquist = fs / 2.0;
        if !(low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist) {
            return Err(TriggerError::InvalidConfig(format!(
                "bandpass bounds {}..{} Hz outside (0, {}) Hz",
                low_hz, high_hz, nyquist
            )));
        }
        if order == 0 || order % 2 != 0 {
            return Err(TriggerError::InvalidConfig(format!(
                "bandpass order {} is not a positive even number",
                order
            )));
        }

        let stages = order / 2;
        let high_pass = (0..stages)
            .map(|_| SecondOrderFilter::new(low_hz, fs, SectionKind::HighPass))
            .collect();
        let low_pass = (0..stages)
            .map(|_| SecondOrderFilter::new(high_hz, fs, SectionKind::LowPass))
            .collect();

        Ok(Self {
            high_pass,
            low_pass,
        })
    }

    /// Filters one full window, high-pass sections first, then low-pass.
    /// Output length equals input length.
    pub fn apply(&mut self, samples: &[f64]) -> Vec<f64> {
        for section in self.high_pass.iter_mut().chain(self.low_pass.iter_mut()) {
            section.reset();
        }

        samples
            .iter()
            .map(|&raw| {
                let mut value = raw;
                for section in self.high_pass.iter_mut() {
                    value = section.calculate_output(value);
                }
                for section in self.low_pass.iter_mut() {
                    value = section.calculate_output(value);
                }
                value
            })
            .collect()
    }
}
