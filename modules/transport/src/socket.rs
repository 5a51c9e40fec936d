//! Thin async UDP socket wrapper bound to a single peer.
//! IPv4/IPv6 family is chosen from the peer address; binding uses an
//! ephemeral local port.

use std::net::SocketAddr;
use tokio::net::UdpSocket;

pub struct AsyncSocket {
    inner: UdpSocket,
    peer: SocketAddr,
}

impl AsyncSocket {
    pub async fn connect_to(peer: SocketAddr) -> std::io::Result<Self> {
        let local: SocketAddr = if peer.is_ipv6() { "[::]:0".parse().unwrap() } else { "0.0.0.0:0".parse().unwrap() };
        let inner = UdpSocket::bind(local).await?;
        Ok(Self { inner, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub async fn send(&self, data: &[u8]) -> std::io::Result<()> {
        self.inner.send_to(data, self.peer).await?;
        Ok(())
    }

    pub async fn recv(&self, buf: &mut [u8]) -> std::io::Result<(usize, SocketAddr)> {
        self.inner.recv_from(buf).await
    }
}
