use crate::domain::advisory::{evaluate, Advisory};
use crate::ingest::provider::{FetchError, PriceSource};
use crate::notify::message::format_advisory;
use crate::notify::{DeliveryError, DeliveryReport, Notifier};
use chrono::NaiveDate;

/// Terminal state of one fetch → evaluate → format → deliver pass.
#[derive(Debug)]
pub enum RunOutcome {
    NoData,
    FetchFailed(FetchError),
    DryRun {
        advisory: Advisory,
        message: String,
    },
    Delivered {
        advisory: Advisory,
        report: DeliveryReport,
    },
    DeliveryFailed {
        advisory: Advisory,
        error: DeliveryError,
    },
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::NoData => "no_data",
            RunOutcome::FetchFailed(_) => "fetch_failed",
            RunOutcome::DryRun { .. } => "dry_run",
            RunOutcome::Delivered { .. } => "delivered",
            RunOutcome::DeliveryFailed { .. } => "delivery_failed",
        }
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        match self {
            RunOutcome::DryRun { advisory, .. }
            | RunOutcome::Delivered { advisory, .. }
            | RunOutcome::DeliveryFailed { advisory, .. } => Some(advisory),
            RunOutcome::NoData | RunOutcome::FetchFailed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub instrument: String,
    /// Date stamped on the advisory.
    pub today: NaiveDate,
    /// Stop after formatting; nothing is sent.
    pub dry_run: bool,
}

/// Runs the pipeline once. Never fails: every error ends up in the returned outcome.
pub async fn run_once(
    source: &dyn PriceSource,
    notifier: &dyn Notifier,
    opts: &RunOptions,
) -> RunOutcome {
    tracing::info!(
        instrument = %opts.instrument,
        provider = source.provider_name(),
        "checking market price"
    );

    let quote = match source.fetch_latest(&opts.instrument).await {
        Ok(quote) => quote,
        Err(FetchError::NoData) => {
            tracing::info!(instrument = %opts.instrument, "market closed or no data; skipping alert");
            return RunOutcome::NoData;
        }
        Err(err) => {
            tracing::error!(instrument = %opts.instrument, error = %err, "price fetch failed; skipping alert");
            return RunOutcome::FetchFailed(err);
        }
    };

    let advisory = evaluate(&quote, opts.today);
    let message = format_advisory(&advisory);
    tracing::info!(
        instrument = %advisory.instrument_id,
        as_of = %advisory.as_of,
        unit_price = %advisory.unit_price,
        derived_price = %advisory.derived_price,
        status = ?advisory.status,
        "advisory computed"
    );
    tracing::info!(%message, "formatted message");

    if opts.dry_run {
        tracing::info!(dry_run = true, "skipping delivery");
        return RunOutcome::DryRun { advisory, message };
    }

    match notifier.deliver(&message).await {
        Ok(report) => {
            tracing::info!(
                channel = notifier.channel_name(),
                http_status = report.http_status,
                message_id = ?report.message_id,
                "advisory delivered"
            );
            RunOutcome::Delivered { advisory, report }
        }
        Err(error) => {
            tracing::warn!(channel = notifier.channel_name(), error = %error, "advisory delivery failed");
            RunOutcome::DeliveryFailed { advisory, error }
        }
    }
}
