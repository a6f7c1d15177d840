use crate::config::Config;
use crate::domain::quote::PriceQuote;
use crate::ingest::provider::{FetchError, PriceSource};
use crate::ingest::types::ChartResponse;
use crate::time::in_market::exchange_local_date;
use anyhow::{Context, Result};
use reqwest::Url;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Daily bars from the Yahoo Finance v8 chart API.
#[derive(Debug, Clone)]
pub struct YahooChartSource {
    http: reqwest::Client,
    base_url: Url,
}

impl YahooChartSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid price source base url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "price source base url cannot carry a path: {base_url}"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build price source http client")?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.price_source_base_url, config.price_source_timeout)
    }

    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", symbol]);
        }
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        url
    }
}

#[async_trait::async_trait]
impl PriceSource for YahooChartSource {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_latest(&self, instrument_id: &str) -> Result<PriceQuote, FetchError> {
        let url = self.chart_url(instrument_id);
        tracing::debug!(%url, "requesting daily chart");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;

        parse_chart(instrument_id, status.as_u16(), &text)
    }
}

/// Turns a chart response body into the latest quote.
///
/// A `Not Found` envelope or a result without any close maps to [`FetchError::NoData`].
pub fn parse_chart(instrument_id: &str, status: u16, body: &str) -> Result<PriceQuote, FetchError> {
    let parsed = serde_json::from_str::<ChartResponse>(body);

    let chart = match parsed {
        Ok(resp) => resp.chart,
        Err(_) if !(200..300).contains(&status) => {
            return Err(FetchError::Http {
                status,
                body: body.to_string(),
            })
        }
        Err(err) => return Err(FetchError::Parse(err.to_string())),
    };

    if let Some(err) = chart.error {
        if err.is_not_found() {
            return Err(FetchError::NoData);
        }
        return Err(FetchError::Provider {
            code: err.code,
            description: err.description,
        });
    }

    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            status,
            body: body.to_string(),
        });
    }

    let Some(result) = chart.result.as_ref().and_then(|r| r.first()) else {
        return Err(FetchError::NoData);
    };
    let Some((ts, close)) = result.latest_close() else {
        return Err(FetchError::NoData);
    };

    let unit_price = Decimal::from_f64(close)
        .ok_or_else(|| FetchError::Parse(format!("close is not representable: {close}")))?;
    if unit_price <= Decimal::ZERO {
        return Err(FetchError::InvalidPrice(unit_price));
    }

    let as_of = exchange_local_date(ts, result.meta.gmtoffset.unwrap_or(0))
        .ok_or_else(|| FetchError::Parse(format!("invalid bar timestamp: {ts}")))?;

    Ok(PriceQuote {
        instrument_id: result
            .meta
            .symbol
            .clone()
            .unwrap_or_else(|| instrument_id.to_string()),
        unit_price,
        as_of,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn chart_body(closes: serde_json::Value) -> String {
        json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "GOLDBEES.NS",
                        "currency": "INR",
                        "gmtoffset": 19800,
                        "exchangeTimezoneName": "Asia/Kolkata"
                    },
                    // 2026-10-16 03:45 UTC = 09:15 IST
                    "timestamp": [1792122300],
                    "indicators": {"quote": [{"close": closes}]}
                }],
                "error": null
            }
        })
        .to_string()
    }

    #[test]
    fn parses_latest_close() {
        let q = parse_chart("GOLDBEES.NS", 200, &chart_body(json!([95.4]))).unwrap();
        assert_eq!(q.instrument_id, "GOLDBEES.NS");
        assert_eq!(q.unit_price, dec!(95.4));
        assert_eq!(q.as_of, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }

    #[test]
    fn empty_result_is_no_data() {
        let body = json!({"chart": {"result": [], "error": null}}).to_string();
        assert!(matches!(parse_chart("GOLDBEES.NS", 200, &body), Err(FetchError::NoData)));

        let body = chart_body(json!([null]));
        assert!(matches!(parse_chart("GOLDBEES.NS", 200, &body), Err(FetchError::NoData)));
    }

    #[test]
    fn not_found_envelope_is_no_data_even_on_404() {
        let body = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        })
        .to_string();
        assert!(matches!(parse_chart("NOPE.NS", 404, &body), Err(FetchError::NoData)));
    }

    #[test]
    fn other_envelope_errors_are_provider_errors() {
        let body = json!({
            "chart": {"result": null, "error": {"code": "Bad Request", "description": "Invalid input"}}
        })
        .to_string();
        match parse_chart("GOLDBEES.NS", 400, &body).unwrap_err() {
            FetchError::Provider { code, .. } => assert_eq!(code, "Bad Request"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_page_is_http_error() {
        match parse_chart("GOLDBEES.NS", 429, "Too Many Requests").unwrap_err() {
            FetchError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "Too Many Requests");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_success_body_is_parse_error() {
        let err = parse_chart("GOLDBEES.NS", 200, "{\"chart\": 5}").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn non_positive_close_is_rejected() {
        let err = parse_chart("GOLDBEES.NS", 200, &chart_body(json!([0.0]))).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPrice(p) if p.is_zero()));

        let err = parse_chart("GOLDBEES.NS", 200, &chart_body(json!([-3.5]))).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPrice(_)));
    }

    #[test]
    fn chart_url_encodes_symbol_and_query() {
        let src = YahooChartSource::new("https://query1.finance.yahoo.com/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            src.chart_url("GOLDBEES.NS").as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/GOLDBEES.NS?range=1d&interval=1d"
        );
        assert_eq!(
            src.chart_url("GOLD/BEES").as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/GOLD%2FBEES?range=1d&interval=1d"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(YahooChartSource::new("not a url", Duration::from_secs(5)).is_err());
        assert!(YahooChartSource::new("mailto:ops@example.com", Duration::from_secs(5)).is_err());
    }
}
