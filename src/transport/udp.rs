//! UDP transport implementation.

use super::Transport;
use crate::error::{Error, Result};
use crate::message::peek_request_id;
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};

/// Largest UDP payload.
const RECV_BUFFER_SIZE: usize = 65535;

/// UDP transport for a single target.
///
/// Owns one connected socket; the kernel drops datagrams from other peers,
/// and [`recv`](Transport::recv) drops replies to other requests.
#[derive(Clone)]
pub struct UdpTransport {
    inner: Arc<UdpTransportInner>,
}

struct UdpTransportInner {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Open an ephemeral socket in the target's address family and connect it.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "snmpy::transport", { snmp.target = %target }, "connecting UDP transport");

        let io_err = |source| Error::Io {
            target: Some(target),
            source,
        };

        let socket = bind_ephemeral_udp_socket(target).map_err(io_err)?;
        socket.connect(target).await.map_err(io_err)?;
        let local_addr = socket.local_addr().map_err(io_err)?;

        tracing::debug!(
            target: "snmpy::transport",
            {
                snmp.target = %target,
                snmp.local_addr = %local_addr
            },
            "UDP transport connected"
        );

        Ok(Self {
            inner: Arc::new(UdpTransportInner {
                socket,
                target,
                local_addr,
            }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmpy::transport",
            {
                snmp.target = %self.inner.target,
                snmp.bytes = data.len()
            },
            "UDP send"
        );
        self.inner.socket.send(data).await.map_err(|e| Error::Io {
            target: Some(self.inner.target),
            source: e,
        })?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let deadline = Instant::now() + recv_timeout;
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];

        loop {
            let (len, source) = match timeout_at(deadline, self.inner.socket.recv_from(&mut buf)).await {
                Ok(Ok(received)) => received,
                Ok(Err(e)) => {
                    tracing::trace!(target: "snmpy::transport", { snmp.target = %self.inner.target, error = %e }, "UDP recv error");
                    return Err(Error::Io {
                        target: Some(self.inner.target),
                        source: e,
                    });
                }
                Err(_) => {
                    tracing::trace!(target: "snmpy::transport", { snmp.target = %self.inner.target, snmp.request_id = request_id }, "UDP recv timeout");
                    return Err(Error::Timeout {
                        target: Some(self.inner.target),
                        elapsed: recv_timeout,
                        request_id,
                        retries: 0,
                    });
                }
            };

            if source != self.inner.target {
                tracing::debug!(target: "snmpy::transport", { snmp.target = %self.inner.target, %source }, "discarding datagram from unexpected source");
                continue;
            }

            let data = &buf[..len];
            if let Some(other) = peek_request_id(data)
                && other != request_id
            {
                tracing::debug!(target: "snmpy::transport", { snmp.request_id = request_id, received = other }, "discarding reply to another request");
                continue;
            }

            tracing::trace!(target: "snmpy::transport", { snmp.target = %self.inner.target, snmp.bytes = len }, "UDP recv complete");
            return Ok((Bytes::copy_from_slice(data), source));
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{CommunityMessage, Credential, encode_get};
    use crate::oid;
    use crate::pdu::Pdu;
    use crate::version::Version;

    fn reply(request_id: i32) -> Bytes {
        CommunityMessage::new(Version::V2c, "public", Pdu::response(request_id, vec![])).encode()
    }

    #[tokio::test]
    async fn test_discards_reply_to_other_request() {
        let agent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(agent.local_addr().unwrap()).await.unwrap();

        transport
            .send(&encode_get(&Credential::v2c("public"), 10, &oid!(1, 3, 6, 1)))
            .await
            .unwrap();
        let mut buf = [0u8; 512];
        let (_, client) = agent.recv_from(&mut buf).await.unwrap();

        agent.send_to(&reply(9), client).await.unwrap();
        agent.send_to(&reply(10), client).await.unwrap();

        let (data, source) = transport.recv(10, Duration::from_secs(2)).await.unwrap();
        assert_eq!(source, agent.local_addr().unwrap());
        assert_eq!(peek_request_id(&data), Some(10));
    }

    #[tokio::test]
    async fn test_recv_times_out() {
        let agent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(agent.local_addr().unwrap()).await.unwrap();

        let err = transport
            .recv(1, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { request_id: 1, .. }));
    }
}
