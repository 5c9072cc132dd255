pub mod synthetic;

pub use synthetic::SyntheticSource;

use crate::error::Result;

// ACQUISITION SOURCE ----------------------------------------------------------

/// Session-scoped sample source. `open` and `close` are called once each at
/// process start and end; reads never block. `latest_samples` returns the
/// newest samples of one channel in time order and may return fewer than
/// requested while the source's own buffer is still filling.
pub trait SignalSource {
    fn open(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn sampling_rate(&self) -> f64;
    fn latest_samples(&mut self, channel: usize, count: usize) -> Result<Vec<f64>>;
}
