use anyhow::Context;
use clap::Parser;
use goldwatch_core::config::Config;
use goldwatch_core::ingest::yahoo::YahooChartSource;
use goldwatch_core::notify::telegram::TelegramNotifier;
use goldwatch_core::pipeline::{run_once, RunOptions, RunOutcome};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "goldwatch_worker", about = "Checks the gold ETF close and posts a buy/wait advisory")]
struct Args {
    /// Instrument symbol on the market-data provider. Overrides INSTRUMENT.
    #[arg(long)]
    instrument: Option<String>,

    /// Fetch and format the advisory but do not send it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    // Missing credentials are the one fatal precondition: nothing touches the network first.
    let config = match goldwatch_core::config::load_config() {
        Ok(config) => config,
        Err(err) => {
            // Sentry is not initialised yet, so this stays local.
            let err = anyhow::Error::new(err).context("configuration error");
            tracing::error!(error = %format!("{err:#}"), "fatal: secrets not found in environment");
            return Err(err);
        }
    };

    let _sentry_guard = init_sentry(std::env::var("SENTRY_DSN").ok().as_deref());

    tracing::debug!(
        bot_token = %config.credentials.masked_token(),
        chat_id = %config.credentials.chat_id,
        "credentials loaded"
    );

    if let Err(err) = run(&config, args).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "run aborted");
    }

    Ok(())
}

async fn run(config: &Config, args: Args) -> anyhow::Result<()> {
    let source = YahooChartSource::from_config(config)?;
    let notifier = TelegramNotifier::from_config(config)?;

    let opts = RunOptions {
        instrument: args
            .instrument
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| config.instrument.clone()),
        today: goldwatch_core::time::in_market::today_ist(chrono::Utc::now())
            .context("failed to resolve today's date")?,
        dry_run: args.dry_run,
    };

    let outcome = run_once(&source, &notifier, &opts).await;
    report(&outcome);

    if let RunOutcome::DryRun { message, .. } = &outcome {
        println!("{message}");
    }

    tracing::info!(outcome = outcome.label(), "agent run finished");
    Ok(())
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::FetchFailed(err) => {
            sentry::capture_error(err);
        }
        RunOutcome::DeliveryFailed { error, .. } => {
            sentry::capture_error(error);
        }
        RunOutcome::NoData | RunOutcome::DryRun { .. } | RunOutcome::Delivered { .. } => {}
    }
}

fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|s| !s.trim().is_empty())?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
