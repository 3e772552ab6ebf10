use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aqara_bridge::cli::{Cli, Command};
use aqara_bridge::commands;
use infrastructure::BridgeConfig;

async fn run() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,aqara_bridge=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = BridgeConfig::load(&cli.config_dir)?;
    debug!(config_dir = %cli.config_dir, domain = %config.domain, "Loaded configuration");

    let output = match cli.command {
        Command::Scale { range, raw } => commands::scale(&range.descriptor, raw)?,
        Command::Unscale { range, value } => commands::unscale(&range.descriptor, value)?,
        Command::RemapTo {
            range,
            value,
            to_min,
            to_max,
            reverse,
        } => commands::remap_to(
            &range.descriptor,
            value,
            to_min.unwrap_or(config.level_min),
            to_max.unwrap_or(config.level_max),
            reverse,
        )?,
        Command::RemapFrom {
            range,
            value,
            from_min,
            from_max,
            reverse,
        } => commands::remap_from(
            &range.descriptor,
            value,
            from_min.unwrap_or(config.level_min),
            from_max.unwrap_or(config.level_max),
            reverse,
        )?,
        Command::Inspect { catalog } => {
            let manager = commands::open_catalog(catalog.as_deref(), &config)?;
            info!(devices = manager.len(), "Inspecting device catalog");
            commands::inspect(manager, &config)?
        }
        Command::Set {
            catalog,
            point_id,
            value,
            level,
            reverse,
        } => {
            let manager = commands::open_catalog(catalog.as_deref(), &config)?;
            commands::set_point(manager, &config, &point_id, value, level, reverse).await?
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run()) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
