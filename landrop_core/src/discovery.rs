//! UDP broadcast discovery: one datagram each way.
//!
//! A probing device broadcasts a fixed token; a device willing to receive
//! answers from its discovery port. The peer address comes from the reply's
//! source address, never from its payload.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket as StdUdpSocket};
use std::time::Duration;

use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::net;

/// UDP port discovery requests are sent to.
pub const DISCOVERY_PORT: u16 = 8989;

/// Payload a probing device broadcasts.
pub const DISCOVERY_TOKEN: &[u8] = b"DISCOVERY_P2P";

/// Prefix of the answer; the rest is the advertised IPv4 address.
pub const REPLY_PREFIX: &str = "P2P_DEVICE:";

/// How long `discover` waits for an answer by default.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Waits for discovery probes and answers the first valid one.
pub struct Advertiser {
    socket: UdpSocket,
}

impl Advertiser {
    /// Binds the discovery listener on all interfaces. Address reuse is on
    /// so a restarted instance does not trip over a lingering socket.
    pub fn bind(port: u16) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .context("creating discovery socket")?;
        socket
            .set_reuse_address(true)
            .context("configuring discovery socket")?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        socket
            .bind(&addr.into())
            .with_context(|| format!("binding discovery port {port}"))?;

        let std_socket: StdUdpSocket = socket.into();
        std_socket
            .set_nonblocking(true)
            .context("configuring discovery socket")?;
        let socket = UdpSocket::from_std(std_socket).context("registering discovery socket")?;
        Ok(Advertiser { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Waits for one valid probe, answers it and returns the requester's
    /// address. Datagrams that do not carry the token are ignored.
    pub async fn serve_one(self) -> Result<SocketAddr> {
        let mut buf = [0u8; 256];
        loop {
            let (len, requester) = self
                .socket
                .recv_from(&mut buf)
                .await
                .context("receiving discovery probe")?;
            if &buf[..len] != DISCOVERY_TOKEN {
                tracing::debug!("ignoring {} stray bytes from {}", len, requester);
                continue;
            }

            let reply = format!("{}{}", REPLY_PREFIX, net::local_ipv4());
            self.socket
                .send_to(reply.as_bytes(), requester)
                .await
                .context("sending discovery reply")?;
            tracing::info!("answered discovery probe from {}", requester);
            return Ok(requester);
        }
    }
}

/// Probes the network for a device ready to receive.
///
/// Sends the token to `target` (or the limited broadcast address when none
/// is given) and waits up to `wait` for an answer. Returns the responder's
/// IPv4 address, or `None` when nobody answered in time.
pub async fn discover(
    target: Option<Ipv4Addr>,
    port: u16,
    wait: Duration,
) -> Result<Option<Ipv4Addr>> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .context("binding discovery probe socket")?;
    socket.set_broadcast(true).context("enabling broadcast")?;

    let dest = target.unwrap_or(Ipv4Addr::BROADCAST);
    socket
        .send_to(DISCOVERY_TOKEN, (dest, port))
        .await
        .with_context(|| format!("sending discovery probe to {dest}:{port}"))?;
    tracing::debug!("discovery probe sent to {}:{}", dest, port);

    let mut buf = [0u8; 256];
    match timeout(wait, socket.recv_from(&mut buf)).await {
        Err(_elapsed) => Ok(None),
        Ok(Err(err)) => Err(err).context("receiving discovery reply"),
        Ok(Ok((0, _))) => Ok(None),
        Ok(Ok((len, from))) => {
            tracing::debug!(
                "discovery reply from {}: {}",
                from,
                String::from_utf8_lossy(&buf[..len])
            );
            // The source address is what we connect to; the payload is
            // informational only.
            match from.ip() {
                std::net::IpAddr::V4(ip) => Ok(Some(ip)),
                std::net::IpAddr::V6(_) => Ok(None),
            }
        }
    }
}
