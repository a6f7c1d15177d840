use crate::domain::advisory::{Advisory, AdvisoryStatus};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const BUY_HEADLINE: &str = "🟢 *BUY ALERT*";
const WAIT_HEADLINE: &str = "🔴 *WAIT ALERT*";
const BUY_ADVICE: &str = "Gold is trading below ₹1.10L. Good time to accumulate.";
const WAIT_ADVICE: &str = "Price is high. Wait for a dip.";

/// Renders an advisory as legacy-Markdown chat text (`*bold*` only).
pub fn format_advisory(advisory: &Advisory) -> String {
    let (headline, advice) = match advisory.status {
        AdvisoryStatus::Buy => (BUY_HEADLINE, BUY_ADVICE),
        AdvisoryStatus::Wait => (WAIT_HEADLINE, WAIT_ADVICE),
    };

    format!(
        "{headline}\n\
         📅 {date}\n\
         \n\
         💰 *Pune Gold Rate (Est. 10g):* ₹{derived}\n\
         📉 *ETF Unit:* ₹{unit}\n\
         \n\
         💡 *Advice:* {advice}",
        date = advisory.generated_at.format("%d-%b-%Y"),
        derived = group_thousands(advisory.derived_price),
        unit = format!("{:.2}", advisory.unit_price.round_dp(2)),
    )
}

// Whole rupees with `,` separators; rounding is half-to-even.
fn group_thousands(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    match rounded.to_i64() {
        Some(n) => n.to_formatted_string(&Locale::en),
        None => rounded.to_string(),
    }
}
