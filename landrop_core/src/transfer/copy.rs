use anyhow::{Context, Result, bail};
use memmap2::MmapOptions;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::progress::ProgressSink;
use crate::transfer::constants::BUFFER_SIZE;

/// Streams `len` bytes of `file` into `dest`, reporting progress per chunk.
///
/// Maps the file into memory when the platform allows it and falls back to a
/// plain buffered loop otherwise. Returns the byte count sent, which always
/// equals `len` on success.
pub async fn bulk_copy<W, P>(file: File, dest: &mut W, len: u64, progress: &mut P) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    P: ProgressSink,
{
    progress.update(0, len);
    if len == 0 {
        return Ok(0);
    }

    let std_file = file.into_std().await;
    match unsafe { MmapOptions::new().map(&std_file) } {
        Ok(mmap) => mapped_copy(&mmap, dest, len, progress).await,
        Err(err) => {
            tracing::debug!("mmap unavailable ({err}), using buffered copy");
            buffered_copy(File::from_std(std_file), dest, len, progress).await
        }
    }
}

async fn mapped_copy<W, P>(mmap: &[u8], dest: &mut W, len: u64, progress: &mut P) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    P: ProgressSink,
{
    if (mmap.len() as u64) < len {
        bail!("source shrank to {} of {} bytes mid transfer", mmap.len(), len);
    }

    let mut sent: u64 = 0;
    for chunk in mmap[..len as usize].chunks(BUFFER_SIZE) {
        dest.write_all(chunk)
            .await
            .context("writing file body")?;
        sent += chunk.len() as u64;
        progress.update(sent, len);
    }
    Ok(sent)
}

async fn buffered_copy<W, P>(mut file: File, dest: &mut W, len: u64, progress: &mut P) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    P: ProgressSink,
{
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut sent: u64 = 0;

    while sent < len {
        let want = BUFFER_SIZE.min((len - sent) as usize);
        let n = file
            .read(&mut buf[..want])
            .await
            .context("reading file body")?;
        if n == 0 {
            bail!("source ended at {} of {} bytes", sent, len);
        }
        dest.write_all(&buf[..n])
            .await
            .context("writing file body")?;
        sent += n as u64;
        progress.update(sent, len);
    }
    Ok(sent)
}
