use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::acquisition::SignalSource;
use crate::config::Config;
use crate::error::{Result, TriggerError};
use crate::output::KeySink;
use crate::processing::bands::{band_powers, Band};
use crate::processing::decision::{decide, Decision};
use crate::processing::filters::BandPassFilter;
use crate::processing::spectrum::WelchEstimator;
use crate::processing::triggers::DebounceGate;
use crate::processing::window::SampleWindow;
use crate::utils::recorder::CycleRecorder;

// PIPELINE DRIVER -------------------------------------------------------------

/// What one loop iteration amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The source has not yet produced a full window; nothing was analyzed.
    NotReady,
    /// Analyzed, no band above threshold.
    NoMatch,
    /// A band won but the debounce gate is cooling; no action emitted.
    Suppressed(usize),
    /// A band won and one press-and-release was forwarded to the sink.
    Triggered(usize),
}

/// Fixed-rate acquisition-to-decision loop. Each iteration pulls the latest
/// window from the source and runs it through filter, spectrum, band
/// powers, decision and debounce; an accepted decision becomes exactly one
/// key action. Only the driver and the debounce gate are time-aware.
pub struct PipelineDriver<S: SignalSource, K: KeySink> {
    source: S,
    sink: K,
    bands: Vec<Band>,
    window: SampleWindow,
    filter: BandPassFilter,
    welch: WelchEstimator,
    gate: DebounceGate,
    tick: Duration,
    channel: usize,
    max_source_failures: u32,
    recorder: Option<CycleRecorder>,
}

impl<S: SignalSource, K: KeySink> PipelineDriver<S, K> {
    pub fn new(source: S, sink: K, config: &Config) -> Result<Self> {
        let fs = source.sampling_rate();
        let bands = config.resolved_bands()?;

        let recorder = match (&config.processor.record_path, config.processor.record_cycles) {
            (Some(path), true) => Some(CycleRecorder::create(path, &bands)?),
            _ => None,
        };

        Ok(Self {
            source,
            sink,
            filter: BandPassFilter::new(
                config.filter.low_hz,
                config.filter.high_hz,
                config.filter.order,
                fs,
            )?,
            welch: WelchEstimator::new(config.spectrum.segment_len, fs)?,
            window: SampleWindow::new(config.processor.window_len),
            gate: DebounceGate::new(Duration::from_millis(config.trigger.cooldown_ms)),
            bands,
            tick: Duration::from_millis(config.processor.tick_ms),
            channel: config.processor.channel,
            max_source_failures: config.processor.max_source_failures,
            recorder,
        })
    }

    /// One acquisition-to-decision cycle at time `now`.
    pub fn run_cycle(&mut self, now: Instant) -> Result<CycleOutcome> {
        let samples = self
            .source
            .latest_samples(self.channel, self.window.capacity())?;
        self.window.push_latest(&samples);
        if !self.window.is_ready() {
            return Ok(CycleOutcome::NotReady);
        }

        let filtered = self.filter.apply(&self.window.samples());
        let spectrum = self.welch.estimate(&filtered);
        let powers = band_powers(&spectrum, &self.bands);
        let decision = decide(&self.bands, &powers);

        let outcome = match self.gate.offer(decision, now) {
            Some(index) => {
                self.sink.press_and_release(self.bands[index].symbol)?;
                CycleOutcome::Triggered(index)
            }
            None => match decision {
                Decision::Winner(index) => CycleOutcome::Suppressed(index),
                Decision::None => CycleOutcome::NoMatch,
            },
        };

        if self.recorder.is_some() {
            let label = self.outcome_label(outcome);
            if let Some(recorder) = &mut self.recorder {
                recorder.record(&label, &powers);
            }
        }
        Ok(outcome)
    }

    /// Runs until `running` is cleared. The source session is released on
    /// every exit path; an interrupt between iterations drops any decision
    /// that was never emitted.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        self.source.open()?;
        let outcome = self.run_loop(running);
        let closed = self.source.close();
        outcome.and(closed)
    }

    fn run_loop(&mut self, running: &AtomicBool) -> Result<()> {
        let mut consecutive_failures: u32 = 0;

        while running.load(Ordering::SeqCst) {
            match self.run_cycle(Instant::now()) {
                Ok(outcome) => {
                    consecutive_failures = 0;
                    if let CycleOutcome::Triggered(index) = outcome {
                        println!(
                            "{} band '{}'",
                            "trigger".green().bold(),
                            self.bands[index].name
                        );
                    }
                }
                Err(TriggerError::SourceUnavailable(reason)) => {
                    consecutive_failures += 1;
                    eprintln!(
                        "{} {} ({}/{})",
                        "source read failed:".yellow(),
                        reason,
                        consecutive_failures,
                        self.max_source_failures
                    );
                    if consecutive_failures >= self.max_source_failures {
                        return Err(TriggerError::SourceUnavailable(reason));
                    }
                }
                Err(fatal) => return Err(fatal),
            }
            thread::sleep(self.tick);
        }
        Ok(())
    }

    fn outcome_label(&self, outcome: CycleOutcome) -> String {
        match outcome {
            CycleOutcome::NotReady => "not-ready".to_string(),
            CycleOutcome::NoMatch => "no-match".to_string(),
            CycleOutcome::Suppressed(index) => {
                format!("suppressed:{}", self.bands[index].name)
            }
            CycleOutcome::Triggered(index) => {
                format!("triggered:{}", self.bands[index].name)
            }
        }
    }
}
