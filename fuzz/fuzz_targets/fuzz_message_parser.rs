#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmpy::message::{CommunityMessage, decode_response, peek_request_id};
use snmpy::pdu::Pdu;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    let _ = peek_request_id(data);
    let _ = decode_response(bytes.clone());

    // Whatever decodes must encode and decode to the same message
    if let Ok(msg) = CommunityMessage::decode(bytes.clone()) {
        let again = CommunityMessage::decode(msg.encode()).expect("re-decode");
        assert_eq!(msg, again);
    }

    let mut decoder = snmpy::ber::Decoder::new(bytes);
    let _ = Pdu::decode(&mut decoder);
});
