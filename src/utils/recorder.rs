use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::processing::bands::Band;

/// Appends one timestamped CSV row of band powers per analyzed cycle.
/// Meant for offline threshold calibration runs against the synthetic
/// board. Row-level write failures are dropped; a diagnostics channel must
/// not take down the control loop.
pub struct CycleRecorder {
    writer: csv::Writer<File>,
}

impl CycleRecorder {
    pub fn create<P: AsRef<Path>>(path: P, bands: &[Band]) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut header = vec!["timestamp".to_string(), "outcome".to_string()];
        header.extend(bands.iter().map(|band| band.name.clone()));
        writer.write_record(&header)?;
        writer.flush()?;

        Ok(Self { writer })
    }

    pub fn record(&mut self, outcome: &str, powers: &[f64]) {
        let mut row = vec![chrono::Utc::now().to_rfc3339(), outcome.to_string()];
        row.extend(powers.iter().map(|p| format!("{:.3}", p)));
        let _ = self.writer.write_record(&row);
        let _ = self.writer.flush();
    }
}
