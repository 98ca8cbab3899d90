//! # cuebox
//!
//! Headless demo of the cuebox scheduler: music rotation, effect channel
//! arbitration and speech sequencing over simulated channels.

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use cuebox_audio::{AudioDriver, AudioFacade, ChannelRole, SimChannel};
use cuebox_core::AudioConfig;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set. Effect drops log at debug.
const DEFAULT_LOG_FILTER: &str = "cuebox=info,cuebox_audio=debug,cuebox_core=info";

/// Configuration used when no `--config` is given.
const DEMO_CONFIG: &str = include_str!("../assets/demo.json");

#[derive(Debug, Parser)]
#[command(name = "cuebox", version, about = "Run the audio scheduler against a scripted game")]
struct Args {
    /// JSON audio configuration (built-in demo if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run, in seconds
    #[arg(short, long, default_value_t = 12)]
    seconds: u64,

    /// Scheduler frame length, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Delay between scripted game actions, in milliseconds
    #[arg(long, default_value_t = 250)]
    step_ms: u64,
}

fn channel_name(role: ChannelRole) -> String {
    match role {
        ChannelRole::Music => "music".to_string(),
        ChannelRole::Speech => "speech".to_string(),
        ChannelRole::Effect(id) => format!("fx{id}"),
    }
}

fn load_config(args: &Args) -> Result<AudioConfig> {
    match &args.config {
        Some(path) => AudioConfig::from_path(path)
            .with_context(|| format!("Failed to load audio config {}", path.display())),
        None => AudioConfig::from_json_str(DEMO_CONFIG).context("Built-in demo config is invalid"),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting cuebox v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let facade = AudioFacade::from_config(&config, |role| SimChannel::new(channel_name(role)))
        .context("Invalid audio configuration")?;

    let driver = AudioDriver::spawn(facade, Duration::from_millis(args.frame_ms.max(1)))?;
    let handle = driver.handle();

    let actions = script::build(&config);
    let step = Duration::from_millis(args.step_ms.max(1));
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    let mut tally = script::Tally::default();
    let mut next_action = Instant::now();

    let mut actions = actions.iter().cycle();

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        if now >= next_action {
            if let Some(action) = actions.next() {
                script::perform(&handle, action);
            }
            next_action = now + step;
        }

        // Log scheduler events until the next scripted action
        let wait = next_action.min(deadline).saturating_duration_since(Instant::now());
        if let Some(event) = handle.recv_event_timeout(wait) {
            tally.record(&event);
            while let Some(event) = handle.try_recv_event() {
                tally.record(&event);
            }
        }
    }

    driver.shutdown()?;

    info!(
        "Done: {} music tracks, {} effects ({} evictions, {} dropped), {} utterances ({} superseded), {} misses",
        tally.music,
        tally.effects,
        tally.evictions,
        tally.drops,
        tally.speech,
        tally.superseded,
        tally.misses
    );

    Ok(())
}
