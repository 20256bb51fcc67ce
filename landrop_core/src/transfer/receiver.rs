use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::progress::ProgressSink;
use crate::transfer::constants::BUFFER_SIZE;
use crate::transfer::protocol::{FileMeta, TransferError};

/// Where a fetched file ended up and how big it is.
#[derive(Debug)]
pub struct ReceivedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Connects to `peer`, receives one file into `dest_dir` and returns its
/// final location.
///
/// Nothing is written to disk until the whole header has arrived. A body
/// that ends early leaves the partial file in place and returns
/// [`TransferError::Truncated`].
pub async fn fetch_file<P: ProgressSink>(
    peer: SocketAddr,
    dest_dir: &Path,
    progress: &mut P,
) -> Result<ReceivedFile> {
    let mut stream = TcpStream::connect(peer)
        .await
        .with_context(|| format!("connecting to {peer}"))?;

    // 1. Whole header before anything touches the disk.
    let mut header = [0u8; FileMeta::WIRE_LEN];
    stream
        .read_exact(&mut header)
        .await
        .context("reading file header")?;
    let meta = FileMeta::decode(&header)?;
    tracing::info!("receiving {} ({} bytes) from {}", meta.name, meta.size, peer);

    // 2. Create the destination with the sender's permission bits.
    let path = dest_dir.join(&meta.name);
    let mut file = open_dest(&path, meta.mode)
        .await
        .with_context(|| format!("creating {}", path.display()))?;

    // 3. Exactly `size` body bytes, chunk by chunk.
    let total = meta.size;
    let mut received: u64 = 0;
    let mut buf = vec![0u8; BUFFER_SIZE];
    progress.update(0, total);
    while received < total {
        let want = BUFFER_SIZE.min((total - received) as usize);
        let n = stream
            .read(&mut buf[..want])
            .await
            .context("reading file body")?;
        if n == 0 {
            file.flush().await.ok();
            return Err(TransferError::Truncated { received, total }.into());
        }
        file.write_all(&buf[..n])
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        received += n as u64;
        progress.update(received, total);
    }
    file.flush()
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(ReceivedFile {
        path,
        size: received,
    })
}

#[cfg(unix)]
async fn open_dest(path: &Path, mode: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
        .await
}

#[cfg(not(unix))]
async fn open_dest(path: &Path, mode: u32) -> std::io::Result<File> {
    let _ = mode;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
}
