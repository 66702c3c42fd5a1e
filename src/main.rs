//! Main entry point for the mapbundle CLI application.
//!
//! Lists, dumps and pretty-prints members of map bundles from the local
//! filesystem or remote HTTP URLs.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use mapbundle::{Bundle, Cli, FileSource, HttpSource, Source};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.is_http_url() {
        // Another TLS backend may already be installed, which is fine
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let source = HttpSource::with_options(cli.file.clone(), cli.http_options()).await?;
        let bundle = Bundle::new(source);

        process_bundle(&bundle, &cli).await?;

        if !cli.is_quiet() {
            let transferred = bundle.source().transferred_bytes();
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
    } else {
        let bundle = Bundle::new(FileSource::open(Path::new(&cli.file))?);
        process_bundle(&bundle, &cli).await?;
    }

    Ok(())
}

/// Dispatch on the CLI mode: `-p` dumps raw bytes, `-j` prints JSON, anything
/// else lists members.
async fn process_bundle<S: Source>(bundle: &Bundle<S>, cli: &Cli) -> Result<()> {
    if cli.list || cli.verbose || !(cli.pipe || cli.json) {
        return list_members(bundle, cli).await;
    }

    let members = cli.members(bundle.index().await?);
    let show_headers = members.len() > 1;
    let mut stdout = tokio::io::stdout();

    for path in members {
        if show_headers {
            stdout
                .write_all(format!("--- {} ---\n", path).as_bytes())
                .await?;
        }

        if cli.json {
            let value = bundle.read_json(&path).await?;
            let text = serde_json::to_string_pretty(&value)?;
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        } else if let Some(data) = bundle.read_bytes(&path).await? {
            stdout.write_all(&data).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

/// List members, optionally with stored size and data offset.
async fn list_members<S: Source>(bundle: &Bundle<S>, cli: &Cli) -> Result<()> {
    let index = bundle.index().await?;

    if cli.verbose {
        println!("{:>12}  {:>12}  Name", "Size", "Offset");
        println!("{}", "-".repeat(50));
    }

    let mut total_size = 0u64;
    let mut count = 0usize;

    for path in index.paths() {
        if !cli.selects(path) {
            continue;
        }
        let Some(entry) = index.get(path) else {
            continue;
        };

        if cli.verbose {
            println!(
                "{:>12}  {:>12}  {}",
                entry.stored_size, entry.data_offset, entry.path
            );
            total_size += entry.stored_size;
            count += 1;
        } else {
            println!("{}", entry.path);
        }
    }

    if cli.verbose {
        println!("{}", "-".repeat(50));
        println!("{:>12}  {:>12}  {} members", total_size, "", count);
    }

    Ok(())
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
