mod ui;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use landrop_core::transfer::format_file_size;
use landrop_core::{
    Advertiser, DISCOVERY_PORT, DISCOVERY_TIMEOUT, FileServer, TRANSFER_PORT, discover, fetch_file,
};
use tracing::level_filters::LevelFilter;

use crate::ui::TermProgress;

/// Send a file to another device on the local network, or receive one.
#[derive(Parser)]
#[command(name = "landrop", version, about)]
struct Cli {
    /// Log what happens on the wire.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wait for a receiver and send them a file.
    Send {
        /// File to send.
        file: PathBuf,
    },
    /// Find a sending device and receive its file into the current directory.
    Recv {
        /// Skip discovery and connect to this address directly.
        host: Option<Ipv4Addr>,
        /// Seconds to wait for a device to answer the broadcast.
        #[arg(long, default_value_t = DISCOVERY_TIMEOUT.as_secs())]
        timeout: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Send { file } => send(file).await,
        Command::Recv { host, timeout } => recv(host, Duration::from_secs(timeout)).await,
    }
}

async fn send(file: PathBuf) -> Result<()> {
    if !file.is_file() {
        bail!("{} is not a file", file.display());
    }
    let size = std::fs::metadata(&file)
        .with_context(|| format!("reading metadata of {}", file.display()))?
        .len();

    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "this device".to_string());

    // Transfer listener first: a receiver that connects the instant it sees
    // the discovery reply must find the port already open.
    let server = FileServer::bind(TRANSFER_PORT)?;
    let advertiser = Advertiser::bind(DISCOVERY_PORT)?;

    println!(
        "Serving {} ({}) from {} at {}",
        file.display(),
        format_file_size(size),
        host,
        landrop_core::net::local_ipv4()
    );
    println!("Waiting for a receiver...");

    let requester = advertiser.serve_one().await?;
    println!("Receiver found at {}", requester.ip());

    let mut bar = TermProgress::new();
    let sent = server.serve_file(&file, &mut bar).await?;
    println!("Sent {} ({})", file.display(), format_file_size(sent));
    Ok(())
}

async fn recv(host: Option<Ipv4Addr>, wait: Duration) -> Result<()> {
    match host {
        Some(ip) => println!("Probing {ip} directly..."),
        None => println!("Searching for a sending device..."),
    }

    let Some(peer) = discover(host, DISCOVERY_PORT, wait).await? else {
        bail!("no device found within {:?}", wait);
    };
    println!("Device found at {peer}");

    let dest_dir = std::env::current_dir().context("resolving current directory")?;
    let mut bar = TermProgress::new();
    let got = fetch_file((peer, TRANSFER_PORT).into(), &dest_dir, &mut bar).await?;
    println!(
        "Saved {} ({})",
        got.path.display(),
        format_file_size(got.size)
    );
    Ok(())
}
