use async_trait::async_trait;
use minute_bars_core::bar::Bar;
use minute_bars_core::request::TimeSeriesRequest;

use crate::error::ProviderError;

/// Trait for fetching bar data from an external source.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Provider name (for logging/display).
    fn name(&self) -> &str;

    /// Fetch bars for the request's symbol and window.
    /// Returns bars sorted by timestamp.
    /// Returns an empty vec if the provider has no rows for the window.
    async fn fetch_bars(&self, request: &TimeSeriesRequest) -> Result<Vec<Bar>, ProviderError>;
}
