//! SNMP value types.
//!
//! [`Value`] covers every SMIv2 wire type plus the v2c exception markers.
//! [`ValueKind`] names a value's type without its payload and is what the
//! registry and [`coerce`] dispatch on.

pub mod coerce;

pub use coerce::coerce;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;
use std::fmt;
use std::net::Ipv4Addr;

/// SNMP value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed 32-bit)
    Integer(i32),

    /// Integer32. Same wire form as [`Value::Integer`]; only the MIB tells them apart.
    Integer32(i32),

    /// Unsigned32. Same wire form as [`Value::Gauge32`].
    Unsigned32(u32),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, network order)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of a second)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping). Not valid in SNMPv1.
    Counter64(u64),

    /// The agent does not implement the object.
    NoSuchObject,

    /// The object exists but this instance does not.
    NoSuchInstance,

    /// No object follows the requested one.
    EndOfMibView,

    /// Unrecognized tag, kept verbatim.
    Unknown { tag: u8, data: Bytes },
}

/// The type of a [`Value`], without its payload.
///
/// Names follow SMIv2 (`Integer32`, `OctetString`, ...) so they read the same
/// in error messages and CLI output as in MIB text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ValueKind {
    Integer,
    Integer32,
    Unsigned32,
    Counter32,
    Counter64,
    Gauge32,
    OctetString,
    IpAddress,
    TimeTicks,
    Null,
    ObjectIdentifier,
    Opaque,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    Unknown,
}

impl ValueKind {
    /// The kinds [`coerce`] can build from text.
    pub const COERCIBLE: [ValueKind; 9] = [
        ValueKind::Integer,
        ValueKind::Integer32,
        ValueKind::Unsigned32,
        ValueKind::Counter32,
        ValueKind::Counter64,
        ValueKind::Gauge32,
        ValueKind::OctetString,
        ValueKind::IpAddress,
        ValueKind::TimeTicks,
    ];

    /// SMIv2 name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Integer32 => "Integer32",
            Self::Unsigned32 => "Unsigned32",
            Self::Counter32 => "Counter32",
            Self::Counter64 => "Counter64",
            Self::Gauge32 => "Gauge32",
            Self::OctetString => "OctetString",
            Self::IpAddress => "IpAddress",
            Self::TimeTicks => "TimeTicks",
            Self::Null => "Null",
            Self::ObjectIdentifier => "ObjectIdentifier",
            Self::Opaque => "Opaque",
            Self::NoSuchObject => "NoSuchObject",
            Self::NoSuchInstance => "NoSuchInstance",
            Self::EndOfMibView => "EndOfMibView",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether [`coerce`] accepts this kind.
    pub fn is_coercible(&self) -> bool {
        Self::COERCIBLE.contains(self)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The value's type.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Integer32(_) => ValueKind::Integer32,
            Value::Unsigned32(_) => ValueKind::Unsigned32,
            Value::OctetString(_) => ValueKind::OctetString,
            Value::Null => ValueKind::Null,
            Value::ObjectIdentifier(_) => ValueKind::ObjectIdentifier,
            Value::IpAddress(_) => ValueKind::IpAddress,
            Value::Counter32(_) => ValueKind::Counter32,
            Value::Gauge32(_) => ValueKind::Gauge32,
            Value::TimeTicks(_) => ValueKind::TimeTicks,
            Value::Opaque(_) => ValueKind::Opaque,
            Value::Counter64(_) => ValueKind::Counter64,
            Value::NoSuchObject => ValueKind::NoSuchObject,
            Value::NoSuchInstance => ValueKind::NoSuchInstance,
            Value::EndOfMibView => ValueKind::EndOfMibView,
            Value::Unknown { .. } => ValueKind::Unknown,
        }
    }

    /// Reinterpret as `kind` when both share a wire encoding.
    ///
    /// `Integer` and `Integer32` are both tag 0x02, `Gauge32` and `Unsigned32`
    /// both tag 0x42, so a decoder cannot tell them apart. Any other
    /// combination returns the value unchanged.
    ///
    /// ```
    /// use snmpy::{Value, ValueKind};
    ///
    /// assert_eq!(Value::Integer(1).refine(ValueKind::Integer32), Value::Integer32(1));
    /// assert_eq!(Value::Counter32(1).refine(ValueKind::Gauge32), Value::Counter32(1));
    /// ```
    pub fn refine(self, kind: ValueKind) -> Value {
        match (self, kind) {
            (Value::Integer(v) | Value::Integer32(v), ValueKind::Integer) => Value::Integer(v),
            (Value::Integer(v) | Value::Integer32(v), ValueKind::Integer32) => Value::Integer32(v),
            (Value::Gauge32(v) | Value::Unsigned32(v), ValueKind::Gauge32) => Value::Gauge32(v),
            (Value::Gauge32(v) | Value::Unsigned32(v), ValueKind::Unsigned32) => {
                Value::Unsigned32(v)
            }
            (other, _) => other,
        }
    }

    /// Try to get as i32 (`Integer` or `Integer32`).
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) | Value::Integer32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32 (`Unsigned32`, `Counter32`, `Gauge32`, `TimeTicks`).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Unsigned32(v) | Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => {
                Some(*v)
            }
            _ => None,
        }
    }

    /// Try to get as u64. Widens the 32-bit unsigned kinds.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            other => other.as_u32().map(u64::from),
        }
    }

    /// Try to get the raw bytes of an `OctetString` or `Opaque`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(data) | Value::Opaque(data) => Some(data),
            _ => None,
        }
    }

    /// Try to get an `OctetString` as UTF-8 text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::OctetString(data) => std::str::from_utf8(data).ok(),
            _ => None,
        }
    }

    /// Try to get as an OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Try to get as an IPv4 address.
    pub fn as_ip(&self) -> Option<Ipv4Addr> {
        match self {
            Value::IpAddress(addr) => Some(Ipv4Addr::from(*addr)),
            _ => None,
        }
    }

    /// Check if this is an exception value (noSuchObject, noSuchInstance, endOfMibView).
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) | Value::Integer32(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) | Value::Unsigned32(v) => {
                buf.push_unsigned32(tag::application::GAUGE32, *v)
            }
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_tagged_bytes(tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::NoSuchObject => buf.push_tagged_bytes(tag::context::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => buf.push_tagged_bytes(tag::context::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => buf.push_tagged_bytes(tag::context::END_OF_MIB_VIEW, &[]),
            Value::Unknown { tag, data } => buf.push_tagged_bytes(*tag, data),
        }
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let start = decoder.offset();
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(start, DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        start,
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => Ok(Value::Counter32(decoder.read_unsigned32_value(len)?)),
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?)),
            tag::application::OPAQUE => Ok(Value::Opaque(decoder.read_bytes(len)?)),
            tag::application::COUNTER64 => Ok(Value::Counter64(decoder.read_integer64_value(len)?)),
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => Err(Error::decode(
                start,
                DecodeErrorKind::ConstructedOctetString,
            )),
            _ => Ok(Value::Unknown {
                tag,
                data: decoder.read_bytes(len)?,
            }),
        }
    }
}

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) | Value::Integer32(v) => write!(f, "{}", v),
            Value::Unsigned32(v) | Value::Counter32(v) | Value::Gauge32(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => f.write_str(s),
                Err(_) => write!(f, "0x{}", Hex(data)),
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => write!(f, "{}", Ipv4Addr::from(*addr)),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, s)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", Hex(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, Hex(data))
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(addr: Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}
