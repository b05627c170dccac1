//! Error types for snmpy.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

use std::net::SocketAddr;
use std::time::Duration;

use crate::value::ValueKind;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Integer value overflow.
    IntegerOverflow,
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Unknown SNMP version.
    UnknownVersion(i32),
    /// Unknown PDU type.
    UnknownPduType(u8),
    /// Constructed OCTET STRING not supported.
    ConstructedOctetString,
    /// NULL with non-zero length.
    InvalidNull,
    /// Invalid IP address length.
    InvalidIpAddressLength { length: usize },
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Integer64 too long.
    Integer64TooLong { length: usize },
    /// OID has more arcs than allowed.
    OidTooLong { count: usize, max: usize },
    /// Response carried no varbinds.
    EmptyResponse,
    /// Insufficient data for read.
    InsufficientData { needed: usize, available: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::EmptyResponse => write!(f, "empty response"),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Reasons a `Module::symbol.suffix` reference failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidRefErrorKind {
    /// Nothing before `::`.
    EmptyModule,
    /// Nothing between `::` and the first `.`.
    EmptySymbol,
    /// An instance index is empty or not a non-negative integer.
    InvalidSuffix,
    /// No `::` and not a dotted numeric OID either.
    NotAnOid,
    /// The OID has fewer than two arcs or arcs outside the X.690 ranges.
    Unencodable,
}

impl std::fmt::Display for OidRefErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyModule => write!(f, "missing module name before '::'"),
            Self::EmptySymbol => write!(f, "missing symbol name after '::'"),
            Self::InvalidSuffix => write!(f, "instance suffix must be dot-separated integers"),
            Self::NotAnOid => write!(f, "expected Module::symbol or a dotted numeric OID"),
            Self::Unencodable => write!(f, "OID cannot be sent in a request"),
        }
    }
}

/// Reasons a MIB module failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// No source found on the search path or among the bundled modules.
    NotFound,
    /// The source file exists but could not be read.
    Io(std::io::ErrorKind),
    /// The module text is malformed.
    Syntax { line: u32, message: String },
    /// The file declares a different module name.
    NameMismatch { found: String },
    /// An imported module could not be found.
    MissingDependency { dependency: String },
    /// The module (indirectly) imports itself.
    CircularImport { dependency: String },
    /// An OID assignment refers to a parent that is never defined.
    UnresolvedOid { symbol: String },
}

impl std::fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "module not found"),
            Self::Io(kind) => write!(f, "could not read module source: {}", kind),
            Self::Syntax { line, message } => write!(f, "line {}: {}", line, message),
            Self::NameMismatch { found } => write!(f, "file defines module {}", found),
            Self::MissingDependency { dependency } => {
                write!(f, "imported module {} not found", dependency)
            }
            Self::CircularImport { dependency } => {
                write!(f, "circular import through {}", dependency)
            }
            Self::UnresolvedOid { symbol } => {
                write!(f, "cannot resolve OID of {}", symbol)
            }
        }
    }
}

/// Value coercion error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionErrorKind {
    /// The existing value's type cannot be written.
    UnsupportedType(ValueKind),
    /// The input does not parse as the target type.
    ParseFailure(ValueKind),
}

impl std::fmt::Display for CoercionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType(kind) => write!(f, "unknown type {}", kind),
            Self::ParseFailure(kind) => write!(f, "not a valid {}", kind),
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Client operation named in [`Error::OperationFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during communication.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// Request timed out after all retries.
    #[error("timeout after {elapsed:?}{} (request_id={request_id}, retries={retries})", target.map(|t| format!(" waiting for {}", t)).unwrap_or_default())]
    Timeout {
        target: Option<SocketAddr>,
        elapsed: Duration,
        request_id: i32,
        retries: u32,
    },

    /// SNMP protocol error returned by agent.
    #[error("SNMP error{}: {status} at index {index}", target.map(|t| format!(" from {}", t)).unwrap_or_default())]
    Snmp {
        target: Option<SocketAddr>,
        status: ErrorStatus,
        index: u32,
        oid: Option<crate::oid::Oid>,
    },

    /// Agent answered with an exception value instead of data.
    #[error("{oid}: {value}")]
    Exception {
        oid: crate::oid::Oid,
        value: crate::value::Value,
    },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Malformed `Module::symbol.suffix` reference.
    #[error("invalid OID reference {input:?}: {kind}")]
    InvalidOidRef {
        kind: OidRefErrorKind,
        input: Box<str>,
    },

    /// The module is loaded but does not define the symbol, or is not loaded at all.
    #[error("unknown symbol {module}::{symbol}")]
    UnknownSymbol { module: Box<str>, symbol: Box<str> },

    /// A MIB module failed to load.
    #[error("failed to load MIB module {module}: {kind}")]
    Load { module: Box<str>, kind: LoadErrorKind },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Response request ID doesn't match.
    #[error("request ID mismatch: expected {expected}, got {actual}")]
    RequestIdMismatch { expected: i32, actual: i32 },

    /// Response version doesn't match request.
    #[error("version mismatch: expected {expected:?}, got {actual:?}")]
    VersionMismatch {
        expected: crate::version::Version,
        actual: crate::version::Version,
    },

    /// A SET value could not be converted to the object's type.
    #[error("cannot coerce {input:?}: {kind}")]
    Coercion {
        kind: CoercionErrorKind,
        input: Box<str>,
    },

    /// A GET or SET round trip failed.
    #[error("SNMP {op} of {oid} on {host} failed")]
    OperationFailed {
        op: Operation,
        oid: Box<str>,
        host: Box<str>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create an invalid OID reference error.
    pub fn invalid_oid_ref(kind: OidRefErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOidRef {
            kind,
            input: input.into(),
        }
    }

    /// Create an unknown symbol error.
    pub fn unknown_symbol(module: impl Into<Box<str>>, symbol: impl Into<Box<str>>) -> Self {
        Self::UnknownSymbol {
            module: module.into(),
            symbol: symbol.into(),
        }
    }

    /// Create a MIB load error.
    pub fn load(module: impl Into<Box<str>>, kind: LoadErrorKind) -> Self {
        Self::Load {
            module: module.into(),
            kind,
        }
    }

    /// Create a coercion error.
    pub fn coercion(kind: CoercionErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::Coercion {
            kind,
            input: input.into(),
        }
    }

    /// Wrap a round-trip failure with the operation, reference and host.
    pub fn operation_failed(
        op: Operation,
        oid: impl Into<Box<str>>,
        host: impl Into<Box<str>>,
        source: Error,
    ) -> Self {
        Self::OperationFailed {
            op,
            oid: oid.into(),
            host: host.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error came from turning a reference into an OID.
    pub fn is_resolve(&self) -> bool {
        matches!(
            self,
            Self::UnknownSymbol { .. } | Self::InvalidOidRef { .. } | Self::InvalidOid { .. }
        )
    }

    /// Get the target address if this error has one.
    ///
    /// Looks through [`Error::OperationFailed`] to its cause.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            Self::Timeout { target, .. } => *target,
            Self::Snmp { target, .. } => *target,
            Self::OperationFailed { source, .. } => source.target(),
            _ => None,
        }
    }
}
