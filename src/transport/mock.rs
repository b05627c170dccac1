//! Mock transport for testing.
//!
//! A programmable [`Transport`] that replays queued replies and records every
//! request, so client behaviour can be tested without a network.

use super::Transport;
use crate::error::{Error, Result};
use crate::message::{CommunityMessage, peek_request_id};
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A scripted reply.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Reply with this message, its request id rewritten to the one awaited.
    Data(Bytes),
    /// Reply with these bytes unchanged. A reply whose request id differs
    /// from the awaited one is discarded, as a real transport would.
    RawData(Bytes),
    /// Let the wait run out.
    Timeout,
    /// Fail the wait with an I/O error.
    IoError(String),
}

/// A request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub data: Bytes,
    /// The request id, if the data parses as a community message.
    pub request_id: Option<i32>,
}

impl RecordedRequest {
    /// Decode the recorded bytes.
    pub fn message(&self) -> Result<CommunityMessage> {
        CommunityMessage::decode(self.data.clone())
    }
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
}

/// Mock transport for client tests.
///
/// ```
/// use snmpy::transport::{MockTransport, ResponseBuilder};
/// use snmpy::{Value, oid};
///
/// let mut mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(1)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(24))
///         .build_v2c(b"public"),
/// );
/// mock.queue_timeout();
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a reply whose request id is patched to match the request.
    pub fn queue_response(&mut self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(MockResponse::Data(data.into()));
    }

    /// Queue a reply sent exactly as given.
    pub fn queue_raw_response(&mut self, data: impl Into<Bytes>) {
        self.lock()
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&mut self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    /// Queue an I/O error.
    pub fn queue_io_error(&mut self, msg: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::IoError(msg.into()));
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of queued replies not yet consumed.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }

    fn patch_request_id(data: Bytes, request_id: i32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = request_id;
                msg.encode()
            }
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let request_id = peek_request_id(data);
        self.lock().requests.push(RecordedRequest {
            data: Bytes::copy_from_slice(data),
            request_id,
        });
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let target = self.peer_addr();

        loop {
            let next = self.lock().responses.pop_front();
            match next {
                Some(MockResponse::Data(data)) => {
                    return Ok((Self::patch_request_id(data, request_id), target));
                }
                Some(MockResponse::RawData(data)) => match peek_request_id(&data) {
                    Some(other) if other != request_id => continue,
                    _ => return Ok((data, target)),
                },
                Some(MockResponse::IoError(msg)) => {
                    return Err(Error::Io {
                        target: Some(target),
                        source: std::io::Error::other(msg),
                    });
                }
                Some(MockResponse::Timeout) | None => {
                    tokio::time::sleep(timeout).await;
                    return Err(Error::Timeout {
                        target: Some(target),
                        elapsed: timeout,
                        request_id,
                        retries: 0,
                    });
                }
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }
}

/// Builds response messages for tests.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    pub fn error_status(mut self, status: i32) -> Self {
        self.error_status = status;
        self
    }

    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    fn build(self, version: Version, community: &[u8]) -> Bytes {
        let pdu = Pdu {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: self.error_status,
            error_index: self.error_index,
            varbinds: self.varbinds,
        };
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu).encode()
    }

    /// Build a v2c response message.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }

    /// Build a v1 response message.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }
}
