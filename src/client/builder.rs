//! Client builder.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use snmpy::{Client, Version};
//! # use std::time::Duration;
//! # async fn example() -> snmpy::Result<()> {
//! let client = Client::builder("pdu1.example.net", "public", "private")
//!     .port(1161)
//!     .timeout(Duration::from_millis(500))
//!     .retries(1)
//!     .version(Version::V1)
//!     .mib_path("/opt/mibs/apc")
//!     .preload(["PowerNet-MIB"])
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::message::Credential;
use crate::mib::Registry;
use crate::transport::{Transport, UdpTransport};
use crate::version::Version;

use super::{Client, ClientConfig, DEFAULT_MIBS, Target};

/// Builder for [`Client`].
///
/// Created via [`Client::builder()`].
pub struct ClientBuilder {
    target: Target,
    version: Version,
    public: Bytes,
    private: Bytes,
    mib_paths: Vec<PathBuf>,
    preload: Vec<String>,
}

impl ClientBuilder {
    pub(crate) fn new(
        host: impl Into<String>,
        public: impl Into<Bytes>,
        private: impl Into<Bytes>,
    ) -> Self {
        Self {
            target: Target::new(host),
            version: Version::V2c,
            public: public.into(),
            private: private.into(),
            mib_paths: Vec::new(),
            preload: DEFAULT_MIBS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Set the UDP port (default: 161).
    pub fn port(mut self, port: u16) -> Self {
        self.target.port = port;
        self
    }

    /// Set the per-attempt timeout (default: 1 second).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.target.timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt (default: 2).
    pub fn retries(mut self, retries: u32) -> Self {
        self.target.retries = retries;
        self
    }

    /// Set the protocol version (default: v2c).
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Add a directory to the MIB search path.
    ///
    /// Directories are searched in the order added, before the bundled modules.
    pub fn mib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mib_paths.push(path.into());
        self
    }

    /// Load these modules in addition to the defaults.
    pub fn preload<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Do not load the default modules.
    pub fn no_preload(mut self) -> Self {
        self.preload.clear();
        self
    }

    fn resolve_target(&self) -> Result<SocketAddr> {
        (self.target.host.as_str(), self.target.port)
            .to_socket_addrs()
            .map_err(|e| Error::Io {
                target: None,
                source: e,
            })?
            .next()
            .ok_or_else(|| Error::Io {
                target: None,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not resolve address",
                ),
            })
    }

    /// Resolve the host, open a UDP socket and create the client.
    pub async fn connect(self) -> Result<Client<UdpTransport>> {
        let addr = self.resolve_target()?;
        let transport = UdpTransport::connect(addr).await?;
        self.build(transport)
    }

    /// Build client with a pre-supplied transport.
    ///
    /// Loads the preload modules, so fails with [`Error::Load`] if one of
    /// them cannot be loaded.
    pub fn build<T: Transport>(self, transport: T) -> Result<Client<T>> {
        let mut registry = Registry::new();
        registry.add_path(self.mib_paths);
        registry.load(&self.preload)?;

        let config = ClientConfig {
            target: self.target,
            read: Credential::new(self.version, self.public),
            write: Credential::new(self.version, self.private),
        };
        Ok(Client::new(transport, config, registry))
    }
}
