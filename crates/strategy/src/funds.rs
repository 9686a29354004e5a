use market_data::Brokerage;
use tracing::warn;

/// Current funds, with a failed lookup read as zero so that nothing passes an
/// affordability check on stale or missing data.
pub async fn available_funds_or_zero<B>(broker: &B) -> f64
where
    B: Brokerage + ?Sized,
{
    match broker.fetch_available_funds().await {
        Ok(funds) if funds.is_finite() => funds,
        Ok(funds) => {
            warn!("Brokerage reported non-finite funds ({}); using 0", funds);
            0.0
        }
        Err(e) => {
            warn!("Funds unavailable ({}); using 0", e);
            0.0
        }
    }
}
