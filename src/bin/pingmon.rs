use std::time::Duration;

use clap::{Parser, Subcommand};
use pingmon::{
    Monitor,
    actors::messages::MonitorEvent,
    config::{Config, read_config_file},
    registry::HostRegistry,
};
use tracing::{info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the monitor until interrupted (default)
    Run,

    /// Register a host in the registry file
    Add {
        /// Host address to probe
        address: String,
        /// Human-readable label
        label: String,
    },

    /// Deregister a host from the registry file
    Remove {
        /// Host address to remove
        address: String,
    },

    /// List registered hosts
    List,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![("pingmon", LevelFilter::TRACE)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::Add { address, label } => {
            let registry = HostRegistry::load(&config.registry_path);
            registry.add(&address, &label)?;
            println!("registered {address} ({label})");
            Ok(())
        }
        Command::Remove { address } => {
            let registry = HostRegistry::load(&config.registry_path);
            registry.remove(&address)?;
            println!("removed {address}");
            Ok(())
        }
        Command::List => {
            let registry = HostRegistry::load(&config.registry_path);
            for entry in registry.list() {
                println!("{}\t{}", entry.address, entry.label);
            }
            Ok(())
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let monitor = Monitor::from_config(&config);

    let hosts = monitor.list_hosts();
    if hosts.is_empty() {
        warn!(
            "no hosts registered in {}; add some with `pingmon add`",
            config.registry_path.display()
        );
    }
    for entry in &hosts {
        info!("monitoring {} ({})", entry.address, entry.label);
    }

    // live view: trace every result the way it lands in the log files
    let mut events = monitor.subscribe();
    let viewer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MonitorEvent::Probe(event)) => info!("{}", event.log_line()),
                Ok(MonitorEvent::LogDegraded { address, reason, .. }) => {
                    warn!("{address}: log append failing: {reason}");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("viewer lagged, skipped {skipped} events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    monitor.start_all().await;
    info!(
        "probing every {}s, logs under {}",
        config.interval,
        config.log_dir.display()
    );

    tokio::signal::ctrl_c().await?;
    info!("interrupt received, shutting down");

    // give in-flight probes (bounded by the probe timeout) time to finish
    tokio::time::timeout(
        Duration::from_secs(config.timeout + 1),
        monitor.shutdown(),
    )
    .await
    .ok();
    viewer.abort();

    Ok(())
}
