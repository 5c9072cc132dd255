use crate::processing::bands::Band;

// TRIGGER DECISION ------------------------------------------------------------

/// Outcome of one evaluation cycle: either no band cleared its threshold,
/// or exactly one winning band index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    None,
    Winner(usize),
}

/// Walks bands strictly in configured order and picks the first whose
/// power exceeds its own threshold. Evaluating band-by-band and stopping
/// at the first match keeps a single winner even when harmonic leakage
/// pushes two bands over threshold in the same cycle.
pub fn decide(bands: &[Band], powers: &[f64]) -> Decision {
    for (index, (band, &power)) in bands.iter().zip(powers.iter()).enumerate() {
        if power > band.threshold {
            return Decision::Winner(index);
        }
    }
    Decision::None
}
