//! Acquisition-to-decision pipeline for an SSVEP frequency trigger: a
//! rolling sample window is band-limited, run through Welch spectral
//! estimation, integrated per configured frequency band and, after
//! thresholding with priority tie-break, debounced into single key
//! actions.

pub mod acquisition;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod processing;
pub mod utils;

pub use acquisition::{SignalSource, SyntheticSource};
pub use config::{load_config, Config};
pub use driver::{CycleOutcome, PipelineDriver};
pub use error::{Result, TriggerError};
pub use output::{ConsoleKeySink, KeySink, KeySymbol};
