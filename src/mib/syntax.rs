//! SMI base syntaxes.
//!
//! Every object `SYNTAX` clause bottoms out in one of these once textual
//! conventions are followed. The registry uses it to pick the wire type a SET
//! value is coerced to.

use crate::value::ValueKind;

/// SMI base syntax of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// ASN.1 INTEGER, with or without named numbers or a range.
    Integer,
    /// Signed 32-bit integer.
    Integer32,
    /// Unsigned 32-bit integer.
    Unsigned32,
    /// Gauge32 (SMIv1 `Gauge`).
    Gauge32,
    /// Counter32 (SMIv1 `Counter`).
    Counter32,
    Counter64,
    /// OCTET STRING, including DisplayString and friends.
    OctetString,
    /// IpAddress (SMIv1 `NetworkAddress`).
    IpAddress,
    TimeTicks,
    ObjectIdentifier,
    Opaque,
    /// BITS pseudo-type, carried as an OCTET STRING.
    Bits,
}

impl Syntax {
    /// Look up a syntax that needs no module context.
    ///
    /// Covers ASN.1 built-ins, SMIv1/SMIv2 application types and the common
    /// SNMPv2-TC conventions, so modules that use them without importing still
    /// get a type.
    pub fn from_name(name: &str) -> Option<Self> {
        let syntax = match name {
            "INTEGER" => Self::Integer,
            "OCTET STRING" => Self::OctetString,
            "OBJECT IDENTIFIER" => Self::ObjectIdentifier,
            "BITS" => Self::Bits,
            "Integer32" => Self::Integer32,
            "Unsigned32" => Self::Unsigned32,
            "Gauge32" | "Gauge" => Self::Gauge32,
            "Counter32" | "Counter" => Self::Counter32,
            "Counter64" => Self::Counter64,
            "IpAddress" | "NetworkAddress" => Self::IpAddress,
            "TimeTicks" => Self::TimeTicks,
            "Opaque" => Self::Opaque,
            _ => return textual_convention(name),
        };
        Some(syntax)
    }

    /// The value kind a SET against this syntax carries.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Integer => ValueKind::Integer,
            Self::Integer32 => ValueKind::Integer32,
            Self::Unsigned32 => ValueKind::Unsigned32,
            Self::Gauge32 => ValueKind::Gauge32,
            Self::Counter32 => ValueKind::Counter32,
            Self::Counter64 => ValueKind::Counter64,
            Self::OctetString | Self::Bits => ValueKind::OctetString,
            Self::IpAddress => ValueKind::IpAddress,
            Self::TimeTicks => ValueKind::TimeTicks,
            Self::ObjectIdentifier => ValueKind::ObjectIdentifier,
            Self::Opaque => ValueKind::Opaque,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Integer32 => "Integer32",
            Self::Unsigned32 => "Unsigned32",
            Self::Gauge32 => "Gauge32",
            Self::Counter32 => "Counter32",
            Self::Counter64 => "Counter64",
            Self::OctetString => "OCTET STRING",
            Self::IpAddress => "IpAddress",
            Self::TimeTicks => "TimeTicks",
            Self::ObjectIdentifier => "OBJECT IDENTIFIER",
            Self::Opaque => "Opaque",
            Self::Bits => "BITS",
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SNMPv2-TC (RFC 2579) and RFC1213-MIB conventions with their base syntax.
pub(crate) static TEXTUAL_CONVENTIONS: &[(&str, Syntax)] = &[
    ("DisplayString", Syntax::OctetString),
    ("PhysAddress", Syntax::OctetString),
    ("MacAddress", Syntax::OctetString),
    ("TruthValue", Syntax::Integer),
    ("TestAndIncr", Syntax::Integer),
    ("AutonomousType", Syntax::ObjectIdentifier),
    ("InstancePointer", Syntax::ObjectIdentifier),
    ("VariablePointer", Syntax::ObjectIdentifier),
    ("RowPointer", Syntax::ObjectIdentifier),
    ("RowStatus", Syntax::Integer),
    ("TimeStamp", Syntax::TimeTicks),
    ("TimeInterval", Syntax::Integer),
    ("DateAndTime", Syntax::OctetString),
    ("StorageType", Syntax::Integer),
    ("TDomain", Syntax::ObjectIdentifier),
    ("TAddress", Syntax::OctetString),
];

fn textual_convention(name: &str) -> Option<Syntax> {
    TEXTUAL_CONVENTIONS
        .iter()
        .find(|(tc, _)| *tc == name)
        .map(|(_, syntax)| *syntax)
}
