use serde::Deserialize;

// Subset of the Yahoo Finance v8 chart payload.

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl ChartApiError {
    /// Unknown or delisted symbols come back as `Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub gmtoffset: Option<i32>,
    #[serde(rename = "exchangeTimezoneName")]
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Last `(timestamp, close)` pair whose close is present and finite.
    pub fn latest_close(&self) -> Option<(i64, f64)> {
        let closes = &self.indicators.quote.first()?.close;
        self.timestamp
            .iter()
            .zip(closes.iter())
            .rev()
            .find_map(|(ts, close)| match close {
                Some(c) if c.is_finite() => Some((*ts, *c)),
                _ => None,
            })
    }
}
