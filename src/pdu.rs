//! SNMP Protocol Data Units.
//!
//! Only the request/response PDUs a GET/SET client exchanges are modelled.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = tag::pdu::GET_REQUEST,
    GetNextRequest = tag::pdu::GET_NEXT_REQUEST,
    Response = tag::pdu::RESPONSE,
    SetRequest = tag::pdu::SET_REQUEST,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::SET_REQUEST => Some(Self::SetRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
        }
    }
}

/// Request or response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub pdu_type: PduType,
    /// Correlates a response with its request.
    pub request_id: i32,
    /// 0 in requests; an [`ErrorStatus`] code in responses.
    pub error_status: i32,
    /// 1-based index of the varbind that caused `error_status`, 0 if none.
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// GET for the given OIDs, each bound to NULL.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// SET of the given bindings.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Successful response carrying `varbinds`.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let start = decoder.offset();
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag)
            .ok_or_else(|| Error::decode(start, DecodeErrorKind::UnknownPduType(tag)))?;

        let len = decoder.read_length()?;
        let mut pdu = decoder.sub_decoder(len)?;

        let request_id = pdu.read_integer()?;
        let error_status = pdu.read_integer()?;
        let error_index = pdu.read_integer()?;
        let varbinds = decode_varbind_list(&mut pdu)?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// OID of the binding named by `error_index`, if it is in range.
    pub fn error_oid(&self) -> Option<&Oid> {
        let index = usize::try_from(self.error_index).ok()?.checked_sub(1)?;
        self.varbinds.get(index).map(|vb| &vb.oid)
    }

    /// Value of the first binding.
    pub fn first_value(&self) -> Option<&Value> {
        self.varbinds.first().map(|vb| &vb.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_get_request_wire_form() {
        let pdu = Pdu::get_request(1, &[oid!(1, 3, 6, 1)]);
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        let bytes = buf.finish();
        assert_eq!(bytes[0], 0xA0);
        assert_eq!(
            &bytes[2..11],
            &[0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]
        );

        let decoded = Pdu::decode(&mut Decoder::new(bytes)).unwrap();
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn test_unknown_pdu_type() {
        // Trap-PDU (0xA4) is not something this client understands
        let mut dec = Decoder::from_slice(&[0xA4, 0x00]);
        assert!(matches!(
            Pdu::decode(&mut dec),
            Err(Error::Decode {
                offset: 0,
                kind: DecodeErrorKind::UnknownPduType(0xA4)
            })
        ));
    }

    #[test]
    fn test_error_oid() {
        let mut pdu = Pdu::response(
            9,
            vec![
                VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
                VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
            ],
        );
        assert_eq!(pdu.error_oid(), None);

        pdu.error_status = ErrorStatus::NotWritable.as_i32();
        pdu.error_index = 2;
        assert!(pdu.is_error());
        assert_eq!(pdu.error_status_enum(), ErrorStatus::NotWritable);
        assert_eq!(pdu.error_oid(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));

        pdu.error_index = 3;
        assert_eq!(pdu.error_oid(), None);
    }
}
