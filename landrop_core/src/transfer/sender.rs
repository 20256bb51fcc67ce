use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use crate::progress::ProgressSink;
use crate::transfer::copy::bulk_copy;
use crate::transfer::protocol::FileMeta;

/// One-shot file server: accepts a single connection, sends the header and
/// the body, then shuts down.
pub struct FileServer {
    listener: TcpListener,
}

impl FileServer {
    /// Binds the transfer listener on all interfaces. Pass port 0 to let the
    /// OS pick one.
    pub fn bind(port: u16) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .context("creating transfer socket")?;
        socket
            .set_reuse_address(true)
            .context("configuring transfer socket")?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        socket
            .bind(&addr.into())
            .with_context(|| format!("binding transfer port {port}"))?;
        socket.listen(1).context("listening on transfer socket")?;

        let std_listener: StdTcpListener = socket.into();
        std_listener
            .set_nonblocking(true)
            .context("configuring transfer socket")?;
        let listener = TcpListener::from_std(std_listener).context("registering transfer socket")?;
        Ok(FileServer { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves `path` to the first peer that connects and returns the number
    /// of body bytes sent. Consumes the server: the listener closes when this
    /// returns, success or not.
    pub async fn serve_file<P: ProgressSink>(self, path: &Path, progress: &mut P) -> Result<u64> {
        let (mut stream, peer) = self
            .listener
            .accept()
            .await
            .context("accepting transfer connection")?;
        tracing::info!("peer {} connected for transfer", peer);

        let file = File::open(path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        let stat = file
            .metadata()
            .await
            .with_context(|| format!("reading metadata of {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?;
        let meta = FileMeta::new(name, stat.len(), file_mode(&stat))?;

        // Header goes out as one block; a short write here fails the session.
        stream
            .write_all(&meta.encode())
            .await
            .context("sending file header")?;

        let sent = bulk_copy(file, &mut stream, meta.size, progress).await?;
        tracing::info!("sent {} ({} bytes) to {}", meta.name, sent, peer);
        Ok(sent)
    }
}

#[cfg(unix)]
fn file_mode(stat: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    stat.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_stat: &std::fs::Metadata) -> u32 {
    0o644
}
