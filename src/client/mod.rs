//! SNMP client.
//!
//! [`Client`] resolves `Module::symbol.suffix` references through its MIB
//! registry and performs single-object GET and SET requests. A SET first
//! reads the object and converts the new value to the type the object holds.

mod builder;

pub use builder::ClientBuilder;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicI32;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use bytes::Bytes;
use tracing::instrument;

use crate::error::{DecodeErrorKind, Error, Operation, Result};
use crate::message::{self, Credential};
use crate::mib::{OidRef, Registry, Syntax, SymbolicRef};
use crate::oid::Oid;
use crate::transport::{self, Transport, UdpTransport};
use crate::util::{initial_request_id, next_request_id};
use crate::value::{self, Value};

/// Modules every client loads unless told otherwise.
pub const DEFAULT_MIBS: [&str; 5] = [
    "SNMPv2-MIB",
    "IF-MIB",
    "IP-MIB",
    "HOST-RESOURCES-MIB",
    "FIBRE-CHANNEL-FE-MIB",
];

/// Where requests go and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Hostname or IP address, as given.
    pub host: String,
    /// UDP port (default: 161)
    pub port: u16,
    /// Wait per attempt (default: 1 second)
    pub timeout: Duration,
    /// Attempts after the first (default: 2)
    pub retries: u32,
}

impl Target {
    pub const DEFAULT_PORT: u16 = 161;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_RETRIES: u32 = 2;

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            retries: Self::DEFAULT_RETRIES,
        }
    }
}

/// Client configuration.
///
/// Most users should use [`ClientBuilder`] rather than constructing this directly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub target: Target,
    /// Credential for GET requests.
    pub read: Credential,
    /// Credential for SET requests.
    pub write: Credential,
}

/// SNMP client.
///
/// Generic over transport type, with `UdpTransport` as default. Clones share
/// the transport, the registry and the request id counter.
#[derive(Clone)]
pub struct Client<T: Transport = UdpTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T: Transport> {
    transport: T,
    config: ClientConfig,
    registry: RwLock<Registry>,
    request_id: AtomicI32,
    /// Held for the whole of each round trip: one request in flight per socket.
    in_flight: tokio::sync::Mutex<()>,
}

impl Client<UdpTransport> {
    /// Start building a client for `host` with read (`public`) and write
    /// (`private`) communities.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmpy::Client;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> snmpy::Result<()> {
    /// let client = Client::builder("192.168.1.1", "public", "private")
    ///     .timeout(Duration::from_secs(2))
    ///     .mib_path("/usr/share/snmp/mibs")
    ///     .connect()
    ///     .await?;
    ///
    /// let interfaces = client.get("IF-MIB::ifNumber.0").await?;
    /// println!("{} interfaces", interfaces);
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(
        host: impl Into<String>,
        public: impl Into<Bytes>,
        private: impl Into<Bytes>,
    ) -> ClientBuilder {
        ClientBuilder::new(host, public, private)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client from its parts. Nothing is preloaded into `registry`.
    pub fn new(transport: T, config: ClientConfig, registry: Registry) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                registry: RwLock::new(registry),
                request_id: AtomicI32::new(initial_request_id()),
                in_flight: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn target(&self) -> &Target {
        &self.inner.config.target
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the peer (target) address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.inner.transport.peer_addr()
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append directories to the MIB search path.
    pub fn add_mib_path<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.registry_mut().add_path(paths);
    }

    /// Load MIB modules. Already loaded modules are skipped.
    pub fn load_mibs<I, S>(&self, modules: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry_mut().load(modules)
    }

    /// Resolve a symbolic or numeric reference to its OID.
    pub fn resolve(&self, oid_ref: &str) -> Result<Oid> {
        self.resolve_ref(oid_ref).map(|(_, oid)| oid)
    }

    /// Name an OID after the loaded module that defines its longest prefix.
    pub fn translate(&self, oid: &Oid) -> Option<SymbolicRef> {
        self.registry().translate(oid)
    }

    fn resolve_ref(&self, oid_ref: &str) -> Result<(OidRef, Oid)> {
        let parsed = OidRef::parse(oid_ref)?;
        let oid = parsed.resolve(&self.registry())?;
        Ok((parsed, oid))
    }

    /// Declared syntax of the object a reference points into.
    fn declared_syntax(&self, oid_ref: &OidRef, oid: &Oid) -> Option<Syntax> {
        let registry = self.registry();
        match oid_ref {
            OidRef::Symbolic(symbolic) => registry
                .lookup(&symbolic.module, &symbolic.symbol)?
                .syntax,
            OidRef::Numeric(_) => {
                let name = registry.translate(oid)?;
                registry.lookup(&name.module, &name.symbol)?.syntax
            }
        }
    }

    /// GET the value of one object.
    ///
    /// The value is returned with the type the agent sent.
    ///
    /// Resolution errors are returned as they are; every failure after the
    /// reference resolves is wrapped in [`Error::OperationFailed`].
    #[instrument(level = "debug", skip(self), err, fields(snmp.target = %self.peer_addr()))]
    pub async fn get(&self, oid_ref: &str) -> Result<Value> {
        let (_, oid) = self.resolve_ref(oid_ref)?;
        self.fetch(oid_ref, &oid).await
    }

    /// SET one object, converting `value` to the type the object holds.
    ///
    /// Reads the object first. The type of that reading, refined by the
    /// object's declared syntax when the registry knows it, decides how the
    /// text of `value` is parsed. Returns the value the agent echoes back.
    ///
    /// A failed read is reported as a failed get and no SET is sent. A value
    /// that cannot be converted fails with [`Error::Coercion`].
    #[instrument(level = "debug", skip(self, value), err, fields(snmp.target = %self.peer_addr()))]
    pub async fn set(&self, oid_ref: &str, value: impl ToString) -> Result<Value> {
        let text = value.to_string();
        let (parsed, oid) = self.resolve_ref(oid_ref)?;
        let current = self.fetch(oid_ref, &oid).await?;

        let current = match self.declared_syntax(&parsed, &oid) {
            Some(syntax) => current.refine(syntax.value_kind()),
            None => current,
        };
        let new_value = value::coerce(current.kind(), &text)?;
        tracing::debug!(
            target: "snmpy::client",
            {
                snmp.oid = %oid,
                kind = %new_value.kind()
            },
            "coerced SET value"
        );

        let credential = &self.inner.config.write;
        let request_id = next_request_id(&self.inner.request_id);
        let data = message::encode_set(credential, request_id, &oid, &new_value);
        let echoed = self
            .round_trip(credential, request_id, &data)
            .await
            .map_err(|e| self.failed(Operation::Set, oid_ref, e))?;

        Ok(echoed.refine(new_value.kind()))
    }

    async fn fetch(&self, oid_ref: &str, oid: &Oid) -> Result<Value> {
        let credential = &self.inner.config.read;
        let request_id = next_request_id(&self.inner.request_id);
        let data = message::encode_get(credential, request_id, oid);
        self.round_trip(credential, request_id, &data)
            .await
            .map_err(|e| self.failed(Operation::Get, oid_ref, e))
    }

    fn failed(&self, op: Operation, oid_ref: &str, source: Error) -> Error {
        Error::operation_failed(op, oid_ref, self.inner.config.target.host.as_str(), source)
    }

    /// Send one request and validate its response.
    async fn round_trip(
        &self,
        credential: &Credential,
        request_id: i32,
        data: &[u8],
    ) -> Result<Value> {
        let target = &self.inner.config.target;
        let response = {
            let _in_flight = self.inner.in_flight.lock().await;
            transport::request(
                &self.inner.transport,
                request_id,
                data,
                target.timeout,
                target.retries,
            )
            .await?
        };

        let message = message::decode_response(response)?;
        if message.version != credential.version {
            tracing::warn!(
                target: "snmpy::client",
                {
                    snmp.target = %self.peer_addr(),
                    expected = %credential.version,
                    actual = %message.version
                },
                "version mismatch in response"
            );
            return Err(Error::VersionMismatch {
                expected: credential.version,
                actual: message.version,
            });
        }

        let pdu = message.into_pdu();
        if pdu.request_id != request_id {
            tracing::warn!(
                target: "snmpy::client",
                {
                    snmp.target = %self.peer_addr(),
                    expected = request_id,
                    actual = pdu.request_id
                },
                "request ID mismatch in response"
            );
            return Err(Error::RequestIdMismatch {
                expected: request_id,
                actual: pdu.request_id,
            });
        }

        if pdu.is_error() {
            return Err(Error::Snmp {
                target: Some(self.peer_addr()),
                status: pdu.error_status_enum(),
                index: pdu.error_index.max(0) as u32,
                oid: pdu.error_oid().cloned(),
            });
        }

        let varbind = pdu
            .varbinds
            .into_iter()
            .next()
            .ok_or_else(|| Error::decode(0, DecodeErrorKind::EmptyResponse))?;
        if varbind.value.is_exception() {
            return Err(Error::Exception {
                oid: varbind.oid,
                value: varbind.value,
            });
        }

        tracing::debug!(
            target: "snmpy::client",
            {
                snmp.oid = %varbind.oid,
                kind = %varbind.value.kind()
            },
            "received value"
        );
        Ok(varbind.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoercionErrorKind, ErrorStatus, OidRefErrorKind};
    use crate::oid;
    use crate::pdu::PduType;
    use crate::transport::{MockTransport, ResponseBuilder};
    use crate::value::ValueKind;

    fn mock() -> MockTransport {
        MockTransport::new("192.0.2.1:161".parse().unwrap())
    }

    fn client(mock: &MockTransport) -> Client<MockTransport> {
        Client::builder("192.0.2.1", "public", "private")
            .build(mock.clone())
            .unwrap()
    }

    fn reply(oid: Oid, value: Value) -> Bytes {
        ResponseBuilder::new(1).varbind(oid, value).build_v2c(b"public")
    }

    const IF_NUMBER: [u32; 8] = [1, 3, 6, 1, 2, 1, 2, 1];

    #[tokio::test]
    async fn test_get_resolves_symbol() {
        let mut mock = mock();
        mock.queue_response(reply(Oid::from_slice(&IF_NUMBER), Value::Integer(24)));
        let client = client(&mock);

        let value = client.get("IF-MIB::ifNumber").await.unwrap();
        assert_eq!(value, Value::Integer(24));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let msg = requests[0].message().unwrap();
        assert_eq!(msg.pdu.pdu_type, PduType::GetRequest);
        assert_eq!(&msg.community[..], b"public");
        assert_eq!(msg.pdu.varbinds[0].oid, Oid::from_slice(&IF_NUMBER));
        assert_eq!(msg.pdu.varbinds[0].value, Value::Null);
    }

    #[tokio::test]
    async fn test_get_numeric_oid() {
        let mut mock = mock();
        mock.queue_response(reply(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw")));
        let client = client(&mock);

        let value = client.get("1.3.6.1.2.1.1.5.0").await.unwrap();
        assert_eq!(value.as_str(), Some("core-sw"));
    }

    #[tokio::test]
    async fn test_unknown_symbol_sends_nothing() {
        let mock = mock();
        let client = client(&mock);

        let err = client.get("IF-MIB::ifBogus.0").await.unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { .. }));
        assert!(err.is_resolve());

        let err = client.set("NOT-LOADED-MIB::thing.0", 1).await.unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { .. }));

        let err = client.get("IF-MIB::").await.unwrap_err();
        assert!(matches!(err, Error::InvalidOidRef { .. }));

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unencodable_oid_sends_nothing() {
        let mock = mock();
        let client = client(&mock);

        for oid_ref in ["5.1", "1", "SNMPv2-SMI::iso"] {
            let err = client.get(oid_ref).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::InvalidOidRef {
                        kind: OidRefErrorKind::Unencodable,
                        ..
                    }
                ),
                "{oid_ref}: {err:?}"
            );
        }
        let err = client.set("5.1", 1).await.unwrap_err();
        assert!(err.is_resolve());

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_set_coerces_to_declared_type() {
        let mtu = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, 3);
        let mut mock = mock();
        mock.queue_response(reply(mtu.clone(), Value::Integer(1500)));
        mock.queue_response(reply(mtu.clone(), Value::Integer(9000)));
        let client = client(&mock);

        // ifMtu is declared Integer32
        let echoed = client.set("IF-MIB::ifMtu.3", 9000).await.unwrap();
        assert_eq!(echoed, Value::Integer32(9000));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        let set = requests[1].message().unwrap();
        assert_eq!(set.pdu.pdu_type, PduType::SetRequest);
        assert_eq!(&set.community[..], b"private");
        assert_eq!(set.pdu.varbinds[0].oid, mtu);
        assert_eq!(set.pdu.varbinds[0].value, Value::Integer(9000));
    }

    #[tokio::test]
    async fn test_set_with_trace_logging_enabled() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mtu = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, 3);
        let mut mock = mock();
        mock.queue_response(reply(mtu.clone(), Value::Integer(1500)));
        mock.queue_response(reply(mtu, Value::Integer(1400)));
        let client = client(&mock);

        let echoed = client.set("IF-MIB::ifMtu.3", "1400").await.unwrap();
        assert_eq!(echoed, Value::Integer32(1400));
    }

    #[tokio::test]
    async fn test_set_keeps_wire_type_of_counters() {
        let oid = oid!(1, 3, 6, 1, 4, 1, 99999, 1, 0);
        let mut mock = mock();
        mock.queue_response(reply(oid.clone(), Value::Gauge32(10)));
        mock.queue_response(reply(oid.clone(), Value::Gauge32(20)));
        let client = client(&mock);

        let echoed = client.set("1.3.6.1.4.1.99999.1.0", " 20 ").await.unwrap();
        assert_eq!(echoed, Value::Gauge32(20));
        let set = mock.requests()[1].message().unwrap();
        assert_eq!(set.pdu.varbinds[0].value, Value::Gauge32(20));
    }

    #[tokio::test]
    async fn test_set_octet_string() {
        let alias = oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 18, 1);
        let mut mock = mock();
        mock.queue_response(reply(alias.clone(), Value::from("")));
        mock.queue_response(reply(alias.clone(), Value::from("uplink")));
        let client = client(&mock);

        let echoed = client.set("IF-MIB::ifAlias.1", "uplink").await.unwrap();
        assert_eq!(echoed.as_str(), Some("uplink"));
    }

    #[tokio::test]
    async fn test_set_unsupported_type_sends_no_set() {
        let mut mock = mock();
        mock.queue_response(reply(
            oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 9)),
        ));
        let client = client(&mock);

        let err = client
            .set("SNMPv2-MIB::sysObjectID.0", "1.3.6.1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                kind: CoercionErrorKind::UnsupportedType(ValueKind::ObjectIdentifier),
                ..
            }
        ));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_set_parse_failure() {
        let mut mock = mock();
        mock.queue_response(reply(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, 1), Value::Integer(1500)));
        let client = client(&mock);

        let err = client.set("IF-MIB::ifMtu.1", "jumbo").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                kind: CoercionErrorKind::ParseFailure(ValueKind::Integer32),
                ..
            }
        ));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_wrapped() {
        let mock = mock();
        let client = client(&mock);

        let err = client.get("IF-MIB::ifNumber.0").await.unwrap_err();
        match &err {
            Error::OperationFailed {
                op, oid, host, source,
            } => {
                assert_eq!(*op, Operation::Get);
                assert_eq!(&**oid, "IF-MIB::ifNumber.0");
                assert_eq!(&**host, "192.0.2.1");
                assert!(matches!(**source, Error::Timeout { retries: 2, .. }));
            }
            other => panic!("expected OperationFailed, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "SNMP get of IF-MIB::ifNumber.0 on 192.0.2.1 failed"
        );
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_reports_failed_read_as_get() {
        let mock = mock();
        let client = client(&mock);

        let err = client.set("IF-MIB::ifAlias.1", "x").await.unwrap_err();
        assert!(matches!(
            err,
            Error::OperationFailed {
                op: Operation::Get,
                ..
            }
        ));
        // Only the GET, retried
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert!(
            requests
                .iter()
                .all(|r| r.message().unwrap().pdu.pdu_type == PduType::GetRequest)
        );
    }

    #[tokio::test]
    async fn test_set_remote_error_is_set_failure() {
        let descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        let mut mock = mock();
        mock.queue_response(reply(descr.clone(), Value::from("router")));
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(descr.clone(), Value::from("x"))
                .error_status(17)
                .error_index(1)
                .build_v2c(b"private"),
        );
        let client = client(&mock);

        let err = client.set("SNMPv2-MIB::sysDescr.0", "x").await.unwrap_err();
        let Error::OperationFailed { op, source, .. } = err else {
            panic!("expected OperationFailed");
        };
        assert_eq!(op, Operation::Set);
        match *source {
            Error::Snmp {
                status, index, oid, ..
            } => {
                assert_eq!(status, ErrorStatus::NotWritable);
                assert_eq!(index, 1);
                assert_eq!(oid, Some(descr));
            }
            other => panic!("expected Snmp error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exception_value() {
        let mut mock = mock();
        mock.queue_response(reply(oid!(1, 3, 6, 1, 2, 1, 1, 9, 0), Value::NoSuchObject));
        let client = client(&mock);

        let err = client.get("1.3.6.1.2.1.1.9.0").await.unwrap_err();
        let Error::OperationFailed { source, .. } = err else {
            panic!("expected OperationFailed");
        };
        assert!(matches!(
            *source,
            Error::Exception {
                value: Value::NoSuchObject,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let mut mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(Oid::from_slice(&IF_NUMBER), Value::Integer(1))
                .build_v1(b"public"),
        );
        let client = client(&mock);

        let err = client.get("IF-MIB::ifNumber").await.unwrap_err();
        let Error::OperationFailed { source, .. } = err else {
            panic!("expected OperationFailed");
        };
        assert!(matches!(*source, Error::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mut mock = mock();
        mock.queue_response(ResponseBuilder::new(1).build_v2c(b"public"));
        let client = client(&mock);

        let err = client.get("IF-MIB::ifNumber").await.unwrap_err();
        let Error::OperationFailed { source, .. } = err else {
            panic!("expected OperationFailed");
        };
        assert!(matches!(
            *source,
            Error::Decode {
                kind: DecodeErrorKind::EmptyResponse,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_io_error_not_retried() {
        let mut mock = mock();
        mock.queue_io_error("network unreachable");
        let client = client(&mock);

        let err = client.get("IF-MIB::ifNumber").await.unwrap_err();
        let Error::OperationFailed { source, .. } = err else {
            panic!("expected OperationFailed");
        };
        assert!(matches!(*source, Error::Io { .. }));
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_default_target() {
        let target = Target::new("pdu1");
        assert_eq!(target.port, 161);
        assert_eq!(target.timeout, Duration::from_secs(1));
        assert_eq!(target.retries, 2);
    }

    #[test]
    fn test_resolve_and_translate() {
        let client = client(&mock());
        let oid = client.resolve("IF-MIB::ifDescr.4").unwrap();
        assert_eq!(oid, oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 4));
        assert_eq!(client.translate(&oid).unwrap().to_string(), "IF-MIB::ifDescr.4");
    }
}
