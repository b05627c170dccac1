//! # snmpy
//!
//! Async SNMP v1/v2c client for reading and writing single objects by their
//! MIB names.
//!
//! ```rust,no_run
//! use snmpy::Client;
//!
//! # async fn example() -> snmpy::Result<()> {
//! let client = Client::builder("pdu1.example.net", "public", "private")
//!     .mib_path("/opt/mibs/apc")
//!     .preload(["PowerNet-MIB"])
//!     .connect()
//!     .await?;
//!
//! let model = client.get("PowerNet-MIB::rPDU2IdentModelNumber.1").await?;
//! println!("model: {}", model);
//!
//! // The text is converted to the type the outlet command already has.
//! client
//!     .set("PowerNet-MIB::rPDU2OutletSwitchedControlCommand.5", 1)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Names
//!
//! References take the form `Module::symbol.suffix`, e.g.
//! `IF-MIB::ifDescr.3`, or plain dotted numbers. Symbols come from the
//! [`Registry`], which reads MIB text from the search path and from a small
//! set of bundled modules.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events under the `snmpy::client`,
//! `snmpy::transport` and `snmpy::mib` targets:
//!
//! ```bash
//! RUST_LOG=snmpy=debug cargo run --features cli --bin snmpy-get -- ...
//! ```

#![allow(clippy::result_large_err)]

pub mod ber;
pub mod client;
pub mod error;
pub mod message;
pub mod mib;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::{Client, ClientBuilder, ClientConfig, DEFAULT_MIBS, Target};
pub use error::{
    CoercionErrorKind, DecodeErrorKind, Error, ErrorStatus, LoadErrorKind, OidErrorKind,
    OidRefErrorKind, Operation, Result,
};
pub use message::Credential;
pub use mib::{MibObject, OidRef, Registry, SymbolicRef, Syntax};
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use transport::{Transport, UdpTransport};
pub use value::{Value, ValueKind};
pub use varbind::VarBind;
pub use version::Version;

/// Type alias for a client using a dedicated UDP socket.
pub type UdpClient = Client<UdpTransport>;
