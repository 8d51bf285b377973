pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod logging;
pub(crate) mod query;
pub(crate) mod target;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{ConfigLoadError, PingConfig};
use logging::PingLogger;
use net::ServerInfo;

/// Query Minecraft servers for liveness and status.
#[derive(Parser)]
#[command(name = "serverping")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to ./settings.toml or $SERVERPING_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Round-trip a ping payload and report latency
    Ping {
        /// `host` or `host:port`
        target: String,
    },
    /// Fetch and print the status response
    Status {
        /// `host` or `host:port`
        target: String,

        /// Write the server icon (PNG) to this path
        #[arg(long)]
        icon: Option<PathBuf>,

        /// Print the parsed status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Query every configured target concurrently
    Sweep,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    #[cfg(debug_assertions)]
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => match dotenvy::var("SERVERPING_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => env::current_dir()?.join("settings.toml"),
        },
    };
    let config = load_config(&config_path)?;

    match cli.command {
        Commands::Ping { target } => {
            let target = config.parse_target(&target)?;
            let report = query::ping(&target, config.timeout()).await?;
            println!(
                "{target}: payload {} in {}ms",
                report.payload,
                report.latency.as_millis()
            );
        }
        Commands::Status { target, icon, json } => {
            let target = config.parse_target(&target)?;
            let report = query::status(&target, config.timeout()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status_json(&report.info))?);
            } else {
                print_status(&target.to_string(), &report.info);
            }
            if let Some(path) = icon {
                let png = report
                    .info
                    .icon
                    .as_deref()
                    .with_context(|| format!("{target} did not send an icon"))?;
                fs::write(&path, png)
                    .with_context(|| format!("could not write {}", path.display()))?;
                PingLogger::icon_written(&path, png.len());
            }
        }
        Commands::Sweep => {
            let targets = config.targets()?;
            if targets.is_empty() {
                anyhow::bail!("no [[target]] entries in {}", config_path.display());
            }
            for entry in query::sweep(targets, config.timeout()).await {
                match entry.outcome {
                    Ok(report) => println!(
                        "{:<24} {:>4}/{:<4} {:>5}ms  {}",
                        entry.label,
                        report.info.online_players,
                        report.info.max_players,
                        report.elapsed.as_millis(),
                        report.info.version
                    ),
                    Err(err) => println!("{:<24} {} ({})", entry.label, err.label(), entry.target),
                }
            }
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<PingConfig> {
    let config = match PingConfig::load(path) {
        Ok(config) => {
            // Save config to fill missing fields
            if let Err(err) = config.save(path) {
                PingLogger::config_save_failed(path, &err);
            }
            config
        }
        Err(ConfigLoadError::Io(_)) => {
            let default_config = PingConfig::default();
            if default_config.save(path).is_ok() {
                PingLogger::config_created(path);
            }
            default_config
        }
        Err(err @ (ConfigLoadError::Parse(_) | ConfigLoadError::Invalid(_))) => {
            return Err(err).with_context(|| format!("invalid config {}", path.display()));
        }
    };

    for (key, value) in &config.other_fields {
        PingLogger::config_unknown_field(key, value);
    }
    Ok(config)
}

fn print_status(target: &str, info: &ServerInfo) {
    println!("{target}");
    println!("  version  {} (protocol {})", info.version, info.protocol);
    println!("  players  {}/{}", info.online_players, info.max_players);
    match info.description_text() {
        Some(text) => println!("  motd     {text}"),
        None => println!("  motd     {}", info.description),
    }
    if let Some(icon) = &info.icon {
        println!("  icon     {} bytes", icon.len());
    }
    if let Some(live) = &info.live {
        print!(
            "  live     {} participants, {} observers",
            live.participants, live.observers
        );
        match live.map.as_ref().and_then(|map| map.name.as_deref()) {
            Some(name) => println!(" on {name}"),
            None => println!(),
        }
    }
}

fn status_json(info: &ServerInfo) -> serde_json::Value {
    serde_json::json!({
        "version": { "name": info.version, "protocol": info.protocol },
        "players": { "max": info.max_players, "online": info.online_players },
        "description": info.description,
        "icon_bytes": info.icon.as_ref().map(Vec::len),
        "live": info.live.as_ref().map(|live| serde_json::json!({
            "participants": live.participants,
            "observers": live.observers,
            "map": live.map.as_ref().and_then(|map| map.name.clone()),
        })),
    })
}
