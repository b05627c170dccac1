//! Community-based SNMP messages (v1/v2c) and the request/response codec.
//!
//! V1 and V2c messages share one structure:
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;

/// A community string and the protocol version it is used with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub version: Version,
    pub community: Bytes,
}

impl Credential {
    pub fn new(version: Version, community: impl Into<Bytes>) -> Self {
        Self {
            version,
            community: community.into(),
        }
    }

    /// SNMPv1 credential.
    pub fn v1(community: impl Into<Bytes>) -> Self {
        Self::new(Version::V1, community)
    }

    /// SNMPv2c credential.
    pub fn v2c(community: impl Into<Bytes>) -> Self {
        Self::new(Version::V2c, community)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("version", &self.version)
            .field("community", &"[REDACTED]")
            .finish()
    }
}

/// Community-based SNMP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMessage {
    pub version: Version,
    pub community: Bytes,
    pub pdu: Pdu,
}

impl CommunityMessage {
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Wrap `pdu` with a credential's version and community.
    pub fn with_credential(credential: &Credential, pdu: Pdu) -> Self {
        Self::new(credential.version, credential.community.clone(), pdu)
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });
        buf.finish()
    }

    /// Decode from BER. Trailing bytes after the message are ignored.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_offset = seq.offset();
        let version_num = seq.read_integer()?;
        let version = Version::from_i32(version_num).ok_or_else(|| {
            Error::decode(version_offset, DecodeErrorKind::UnknownVersion(version_num))
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;

        Ok(CommunityMessage {
            version,
            community,
            pdu,
        })
    }

    /// Consume and return the PDU.
    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }
}

/// Encode a GET of a single OID.
pub fn encode_get(credential: &Credential, request_id: i32, oid: &Oid) -> Bytes {
    let pdu = Pdu::get_request(request_id, std::slice::from_ref(oid));
    CommunityMessage::with_credential(credential, pdu).encode()
}

/// Encode a SET of a single OID to `value`.
pub fn encode_set(credential: &Credential, request_id: i32, oid: &Oid, value: &Value) -> Bytes {
    let pdu = Pdu::set_request(request_id, vec![VarBind::new(oid.clone(), value.clone())]);
    CommunityMessage::with_credential(credential, pdu).encode()
}

/// Decode a datagram that must carry a Response PDU.
///
/// A nonzero error status is not a decode failure; callers inspect
/// [`Pdu::error_status`] themselves.
pub fn decode_response(data: Bytes) -> Result<CommunityMessage> {
    let msg = CommunityMessage::decode(data)?;
    if msg.pdu.pdu_type != PduType::Response {
        return Err(Error::decode(
            0,
            DecodeErrorKind::UnknownPduType(msg.pdu.pdu_type.tag()),
        ));
    }
    Ok(msg)
}

/// Read the request id of a v1/v2c message without decoding its varbinds.
///
/// Returns `None` for anything that does not look like a community message.
pub fn peek_request_id(data: &[u8]) -> Option<i32> {
    let mut decoder = Decoder::from_slice(data);
    let mut seq = decoder.read_sequence().ok()?;
    seq.read_integer().ok()?;
    seq.read_octet_string().ok()?;
    let tag = seq.peek_tag()?;
    PduType::from_tag(tag)?;
    let mut pdu = seq.read_constructed(tag).ok()?;
    pdu.read_integer().ok()
}
