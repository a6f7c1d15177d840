use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

// IST is UTC+05:30 with no DST.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Calendar date in India for the given instant; used to stamp advisories.
pub fn today_ist(now_utc: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS).context("invalid IST offset")?;
    Ok(now_utc.with_timezone(&ist).date_naive())
}

/// Trading date of a bar timestamp, in the exchange's local time.
///
/// `gmtoffset_secs` is the exchange offset east of UTC as reported by the provider.
pub fn exchange_local_date(unix_ts: i64, gmtoffset_secs: i32) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(gmtoffset_secs)?;
    let utc = DateTime::<Utc>::from_timestamp(unix_ts, 0)?;
    Some(utc.with_timezone(&offset).date_naive())
}
