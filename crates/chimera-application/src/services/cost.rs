use async_trait::async_trait;
use chimera_core::services::CostEstimator;
use chimera_core::settings::MigrationSettings;
use chimera_core::Result;

/// USD charged per character of input plus output.
pub const COST_PER_CHAR_USD: f64 = 0.00001;

/// Flat per-character estimate, rounded to four decimals.
///
/// Rounding is monotone, so the estimate never decreases as the combined
/// length grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthCostEstimator;

impl LengthCostEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate_for_len(&self, combined_len: usize) -> f64 {
        let cost = combined_len as f64 * COST_PER_CHAR_USD;
        (cost * 10_000.0).round() / 10_000.0
    }
}

#[async_trait]
impl CostEstimator for LengthCostEstimator {
    async fn estimate(
        &self,
        input: &str,
        output: &str,
        _settings: &MigrationSettings,
    ) -> Result<f64> {
        Ok(self.estimate_for_len(input.len() + output.len()))
    }
}
