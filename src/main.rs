mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use ca_core::config::Config;
use ca_formats::FormatRegistry;
use ca_storage::LocalStore;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        "Starting convertanything on {}:{}",
        config.server.host,
        config.server.port
    );

    ca_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "convertanything=trace,ca_server=trace,ca_convert=trace,ca_storage=debug,ca_formats=debug,tower_http=debug".to_string()
        } else {
            "convertanything=info,ca_server=info,ca_convert=info,ca_storage=info,ca_formats=info,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so command output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Classify { file_name, json } => classify(&file_name, cli.config.as_deref(), json),
        Commands::Options { file_name, json } => {
            list_options(&file_name, cli.config.as_deref(), json)
        }
        Commands::Sweep => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(sweep(cli.config.as_deref()))
        }
        Commands::Validate => validate_config(cli.config.as_deref()),
        Commands::Version => {
            println!("convertanything {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_registry(config_path: Option<&Path>) -> Result<FormatRegistry> {
    let config = Config::load_or_default(config_path);
    Ok(FormatRegistry::load(config.formats.catalog_path.as_deref())?)
}

fn classify(file_name: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let registry = load_registry(config_path)?;
    let category = registry.classify(file_name);

    if json {
        let out = serde_json::json!({ "fileName": file_name, "category": category });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{category}");
    }
    Ok(())
}

fn list_options(file_name: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let registry = load_registry(config_path)?;
    let options = registry.options_for(file_name);

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    println!("Source category: {}", options.source_category);
    if options.options.is_empty() {
        println!("No conversion options available.");
        return Ok(());
    }

    println!("Options: {}", options.options.len());
    for (i, option) in options.options.iter().enumerate() {
        let mut flags = Vec::new();
        if option.is_cross_category {
            flags.push("cross-category");
        }
        if option.is_sticker {
            flags.push("sticker");
        }
        if option.is_animation {
            flags.push("animation");
        }
        if option.is_audio_extract {
            flags.push("audio");
        }
        if option.is_thumbnail {
            flags.push("thumbnail");
        }

        print!(
            "  {:>2}. {:<16} {:<8} {}",
            i + 1,
            option.abbreviation,
            option.target_extension,
            option.category
        );
        if !flags.is_empty() {
            print!(" [{}]", flags.join(", "));
        }
        println!();
    }
    Ok(())
}

async fn sweep(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let store = LocalStore::open(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
    )
    .await?;

    let sweeper = ca_server::context::sweeper_for(&config, Arc::new(store));
    let report = sweeper.sweep_once(chrono::Utc::now()).await;

    println!(
        "Scanned {}, deleted {}, failed {}",
        report.scanned, report.deleted, report.failed
    );
    if report.failed > 0 {
        anyhow::bail!("{} objects could not be deleted", report.failed);
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let registry = FormatRegistry::load(config.formats.catalog_path.as_deref())?;

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Auth enabled: {}", config.auth.enabled);
    println!("  API keys: {}", config.auth.api_keys.len());
    println!("  Storage root: {}", config.storage.root.display());
    println!(
        "  Cleanup: {}",
        if config.cleanup.enabled {
            format!(
                "every {}h, retention {}h",
                config.cleanup.interval_hours, config.cleanup.retention_hours
            )
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "  Proxy backend: {}",
        config.proxy.backend_url.as_deref().unwrap_or("none")
    );
    println!(
        "  Catalog: {} categories, {} formats",
        registry.catalog().len(),
        registry.catalog().format_count()
    );

    let collisions = registry.index().collisions();
    if !collisions.is_empty() {
        println!("  Extension collisions: {}", collisions.len());
        for c in collisions {
            println!("    {} ({} -> {})", c.extension, c.previous, c.winner);
        }
    }

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("Warnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
