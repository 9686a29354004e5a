use ta::indicators::RelativeStrengthIndex;
use ta::{Next, Reset};

pub use ta::errors::TaError;

/// Relative strength index over closing prices.
///
/// The underlying oscillator emits a value for every input, but the first
/// `window` of them are warm-up noise and are reported as `None`. A stretch
/// with no movement at all reads as the neutral 50.
#[derive(Debug, Clone)]
pub struct RsiCalculator {
    window: usize,
    rsi: RelativeStrengthIndex,
}

impl RsiCalculator {
    pub fn new(window: usize) -> Result<Self, TaError> {
        Ok(Self {
            window,
            rsi: RelativeStrengthIndex::new(window)?,
        })
    }

    /// Same-length signal series; values lie in `0..=100`.
    pub fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut rsi = self.rsi.clone();
        rsi.reset();

        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let value = rsi.next(close);
                let value = if value.is_nan() { 50.0 } else { value.clamp(0.0, 100.0) };
                (i >= self.window).then_some(value)
            })
            .collect()
    }
}
