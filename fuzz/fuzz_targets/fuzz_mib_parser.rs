#![no_main]

use libfuzzer_sys::fuzz_target;

use snmpy::mib::Registry;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut registry = Registry::new();
    let _ = registry.load_text(&text);
});
