/// Ahoy Media Service - headless catalog browser and player
use ahoy_catalog::{browse, CatalogClient, CatalogStore};
use ahoy_media_service::{
    parse_node, render_node, render_snapshot, spawn_refresh_loop, HeadlessFocus, ServiceConfig,
    ServiceError, SimulatedOutput,
};
use ahoy_playback::MediaService;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ahoy-media-service")]
#[command(about = "Browse and play the Ahoy indie media catalog", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "AHOY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the children of a browse node
    Browse {
        /// Node id (ROOT, MUSIC, ARTIST:<key>, PODCAST:<slug>, ...)
        #[arg(default_value = "ROOT")]
        node: String,
    },
    /// Play an item through the simulated output
    Play {
        /// Playable node id (track:<id> or episode:<id>)
        node: String,
        /// How long to keep playing
        #[arg(short, long, default_value_t = 10)]
        seconds: u64,
        /// Simulated stream length; streams complete and the queue advances
        #[arg(long)]
        stream_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ahoy_media_service=info,ahoy_playback=info,ahoy_catalog=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServiceConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Browse { node } => {
            browse_node(&config, &node).await?;
        }
        Commands::Play {
            node,
            seconds,
            stream_secs,
        } => {
            play_node(&config, &node, seconds, stream_secs).await?;
        }
    }

    Ok(())
}

async fn load_catalog(config: &ServiceConfig) -> anyhow::Result<(CatalogClient, Arc<CatalogStore>)> {
    let client = CatalogClient::new(config.catalog_config())?;
    let store = Arc::new(CatalogStore::new());

    tracing::info!(base_url = %client.base_url(), "Fetching catalog");
    let summary = client.refresh(&store).await;
    if !summary.is_complete() {
        tracing::warn!(?summary, "Catalog only partially loaded");
    }

    Ok((client, store))
}

async fn browse_node(config: &ServiceConfig, node: &str) -> anyhow::Result<()> {
    let id = parse_node(node)?;
    let (_, store) = load_catalog(config).await?;

    let children = browse::children(&store.snapshot(), &id);
    if children.is_empty() {
        println!("No entries under {}", node);
    }
    for child in &children {
        println!("{}", render_node(child));
    }

    Ok(())
}

async fn play_node(
    config: &ServiceConfig,
    node: &str,
    seconds: u64,
    stream_secs: Option<u64>,
) -> anyhow::Result<()> {
    let id = parse_node(node)?;
    let (client, store) = load_catalog(config).await?;

    let refresher = config
        .refresh_interval()
        .map(|interval| spawn_refresh_loop(client.clone(), Arc::clone(&store), interval));

    let mut output = SimulatedOutput::new(Duration::from_millis(250));
    if let Some(secs) = stream_secs {
        output = output.with_stream_length(Duration::from_secs(secs));
    }

    let service = MediaService::spawn(
        config.playback_config(),
        store,
        client,
        Box::new(output),
        Box::new(HeadlessFocus),
    );

    let mut updates = service.subscribe();
    service
        .play_by_id(id.encode())
        .map_err(ServiceError::from)?;

    let deadline = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            update = updates.recv() => match update {
                Ok(snapshot) => println!("{}", render_snapshot(&snapshot)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed playback updates");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    let last = service.snapshot();
    println!("{}", render_snapshot(&last));

    if let Some(refresher) = refresher {
        refresher.abort();
    }
    service.shutdown().await?;

    Ok(())
}
