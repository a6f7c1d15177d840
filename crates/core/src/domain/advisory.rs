use crate::domain::quote::PriceQuote;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// One ETF unit tracks roughly 0.01 g of gold, so 1000 units approximate 10 g.
pub const UNITS_PER_10G: Decimal = dec!(1000);

// ₹1.10 lakh per 10 g.
pub const BUY_THRESHOLD: Decimal = dec!(110000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryStatus {
    Buy,
    Wait,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub instrument_id: String,
    pub unit_price: Decimal,
    pub derived_price: Decimal,
    pub status: AdvisoryStatus,
    pub as_of: NaiveDate,
    pub generated_at: NaiveDate,
}

/// Scales the unit price to a 10 g estimate and classifies it against [`BUY_THRESHOLD`].
///
/// Non-positive prices are not rejected here; they classify as `Buy` like any other
/// value below the threshold.
pub fn evaluate(quote: &PriceQuote, generated_at: NaiveDate) -> Advisory {
    let derived_price = quote.unit_price * UNITS_PER_10G;
    let status = if derived_price < BUY_THRESHOLD {
        AdvisoryStatus::Buy
    } else {
        AdvisoryStatus::Wait
    };

    Advisory {
        instrument_id: quote.instrument_id.clone(),
        unit_price: quote.unit_price,
        derived_price,
        status,
        as_of: quote.as_of,
        generated_at,
    }
}
