mod cli;

use supawatch::{config, playlist, server};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // CLI flags win over the config file
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Supawatch server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::debug!("TMDB config: {:?}", config.tmdb);

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "supawatch=trace,supawatch_common=debug,tower_http=debug".to_string()
        } else {
            "supawatch=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Playlist { file, group, json } => show_playlist(&file, group.as_deref(), json),
        Commands::Version => {
            println!("supawatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  TMDB base URL: {}", config.tmdb.base_url);
            println!(
                "  TMDB credential: {}",
                if config.tmdb.token().is_some() {
                    "set"
                } else {
                    "missing"
                }
            );
            println!("  Coalescing: {}", config.tmdb.coalesce_inflight);
            println!("  Playlists: {:?}", config.playlists.dir);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  TMDB base URL: {}", config.tmdb.base_url);
        }
    }

    Ok(())
}

fn show_playlist(file: &Path, group: Option<&str>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read playlist: {:?}", file))?;
    let channels = playlist::parse_m3u(&content);
    let selected = playlist::filter_channels(&channels, group, None);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    let groups = playlist::groups(&channels);
    println!("File: {}", file.display());
    println!("Channels: {} ({} groups)", channels.len(), groups.len());
    for group in &groups {
        let count = channels.iter().filter(|c| &c.group == group).count();
        println!("  {} ({})", group, count);
    }

    println!();
    for channel in &selected {
        println!("[{}] {} - {}", channel.group, channel.name, channel.url);
    }

    Ok(())
}
