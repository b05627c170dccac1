#![no_main]

use libfuzzer_sys::fuzz_target;

use snmpy::mib::{OidRef, SymbolicRef};
use snmpy::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // OID from BER encoding
    let _ = Oid::from_ber(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Oid::parse(s);
        let _ = OidRef::parse(s);

        if let Ok(symbolic) = SymbolicRef::parse(s) {
            let again = SymbolicRef::parse(&symbolic.to_string()).expect("re-parse");
            assert_eq!(symbolic, again);
        }
    }
});
