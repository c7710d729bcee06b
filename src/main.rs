use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_catalog::{
    catalog::{publish, CatalogPipeline},
    config::Config,
    utils::{HttpFetcher, StandardHttpClient},
    web::{AppState, ChannelDirectory, WebServer},
};

#[derive(Parser)]
#[command(name = "m3u-catalog")]
#[command(version)]
#[command(about = "Builds a ranked channel catalog from M3U playlists and serves it")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download sources and publish the channel catalog
    Build {
        /// Reference table URL; enables joining against channel metadata
        #[arg(short, long, value_name = "URL")]
        reference: Option<String>,

        /// Skip logo caching
        #[arg(long)]
        no_logos: bool,

        /// Catalog output path (overrides config file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Serve the published catalog and the playback proxy
    Serve {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("m3u_catalog={},tower_http=trace", cli.log_level)
    } else {
        format!("m3u_catalog={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting m3u-catalog v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Build {
            reference,
            no_logos,
            output,
        } => {
            if let Some(reference) = reference {
                config.sources.reference_url = Some(reference);
            }
            if no_logos {
                config.logos.enabled = false;
            }
            if let Some(output) = output {
                config.output.channels_path = output;
            }
            config.validate()?;

            let fetcher: Arc<dyn HttpFetcher> =
                Arc::new(StandardHttpClient::with_connection_timeout(config.http.connect_timeout())?);
            let report = CatalogPipeline::new(config, fetcher).run().await?;

            info!(
                "Catalog complete: {} channels, {} unmatched, {} diagnostics",
                report.channels, report.merge.unmatched, report.diagnostics
            );
            if let Some(logos) = report.logos {
                info!(
                    "Logos: {} saved, {} existing, {} skipped, {} failed",
                    logos.saved, logos.existing, logos.skipped, logos.failed
                );
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            config.validate()?;

            let channels = ChannelDirectory::new(
                publish::read_catalog(&config.output.channels_path).await?,
            );
            info!(
                "Loaded {} channels from {}",
                channels.len(),
                config.output.channels_path.display()
            );

            let fetcher: Arc<dyn HttpFetcher> =
                Arc::new(StandardHttpClient::with_connection_timeout(config.http.connect_timeout())?);
            let state = AppState::new(channels, fetcher);
            let web_server = WebServer::new(
                &config.web.host,
                config.web.port,
                state,
                config.logos.directory.clone(),
            )?;

            info!(
                "Starting web server on {}:{}",
                web_server.host(),
                web_server.port()
            );
            web_server.serve().await?;
        }
    }

    Ok(())
}
