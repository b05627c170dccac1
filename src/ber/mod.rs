//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! Covers the subset of X.690 that SNMP v1/v2c messages use: definite lengths,
//! primitive INTEGER/OCTET STRING/NULL/OID and the SNMP application types.
//! Decoding is permissive where net-snmp is (non-minimal lengths and integers).

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
pub use tag::*;
