//! Transport layer abstraction.
//!
//! [`Transport`] moves datagrams; [`request`] layers the timeout and retry
//! policy on top, so every transport retries the same way.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::{Error, Result};
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Span, instrument};

/// Client-side transport abstraction.
///
/// Implementations use `Arc` internally, making clone cheap.
pub trait Transport: Send + Sync + Clone {
    /// Send request data to the target.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the reply to `request_id`.
    ///
    /// Datagrams from other sources or carrying another request id are
    /// discarded without ending the wait. Returns [`Error::Timeout`] when the
    /// deadline passes and [`Error::Io`] on socket failure.
    ///
    /// Returns (response_data, actual_source_address)
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// The remote address this transport sends to and receives from.
    fn peer_addr(&self) -> SocketAddr;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}

/// Send `data` and wait for its reply, retrying on timeout.
///
/// Makes up to `retries + 1` attempts, resending the same bytes (and thus the
/// same request id) each time, with no delay beyond the per-attempt `timeout`.
/// I/O errors end the exchange at once. When every attempt times out the
/// error carries the total elapsed time.
#[instrument(
    level = "debug",
    skip(transport, data),
    fields(
        snmp.target = %transport.peer_addr(),
        snmp.request_id = request_id,
        snmp.attempt = tracing::field::Empty,
        snmp.elapsed_ms = tracing::field::Empty,
    )
)]
pub async fn request<T: Transport>(
    transport: &T,
    request_id: i32,
    data: &[u8],
    timeout: Duration,
    retries: u32,
) -> Result<Bytes> {
    let start = Instant::now();

    for attempt in 0..=retries {
        Span::current().record("snmp.attempt", attempt);
        if attempt > 0 {
            tracing::debug!(target: "snmpy::transport", "retrying request");
        }

        tracing::trace!(target: "snmpy::transport", { snmp.bytes = data.len() }, "sending request");
        if let Err(err) = transport.send(data).await {
            Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
            return Err(err);
        }

        match transport.recv(request_id, timeout).await {
            Ok((response, _source)) => {
                tracing::trace!(target: "snmpy::transport", { snmp.bytes = response.len() }, "received response");
                Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                return Ok(response);
            }
            Err(Error::Timeout { .. }) => continue,
            Err(err) => {
                Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                return Err(err);
            }
        }
    }

    let elapsed = start.elapsed();
    Span::current().record("snmp.elapsed_ms", elapsed.as_millis() as u64);
    tracing::debug!(target: "snmpy::transport", { snmp.request_id = request_id, snmp.target = %transport.peer_addr(), ?elapsed, retries }, "request timed out");
    Err(Error::Timeout {
        target: Some(transport.peer_addr()),
        elapsed,
        request_id,
        retries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> MockTransport {
        MockTransport::new("192.0.2.1:161".parse().unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_makes_retries_plus_one_attempts() {
        let transport = mock();
        let err = request(&transport, 7, b"req", Duration::from_secs(1), 2)
            .await
            .unwrap_err();

        assert_eq!(transport.requests().len(), 3);
        match err {
            Error::Timeout {
                elapsed,
                request_id,
                retries,
                target,
            } => {
                assert_eq!(elapsed, Duration::from_secs(3));
                assert_eq!(request_id, 7);
                assert_eq!(retries, 2);
                assert_eq!(target, Some(transport.peer_addr()));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_timeout_succeeds() {
        let mut transport = mock();
        transport.queue_timeout();
        transport.queue_raw_response(Bytes::from_static(b"reply"));

        let data = request(&transport, 7, b"req", Duration::from_secs(1), 2)
            .await
            .unwrap();
        assert_eq!(&data[..], b"reply");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].data, requests[1].data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_io_error_is_not_retried() {
        let mut transport = mock();
        transport.queue_io_error("network unreachable");

        let err = request(&transport, 7, b"req", Duration::from_secs(1), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_sends_once() {
        let transport = mock();
        let err = request(&transport, 1, b"req", Duration::from_millis(500), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { retries: 0, .. }));
        assert_eq!(transport.requests().len(), 1);
    }
}
