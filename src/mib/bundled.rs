//! Module texts compiled into the crate.
//!
//! These are the modules a client preloads by default, so they must be
//! available even with an empty search path.

pub(crate) static BUNDLED_MODULES: &[(&str, &str)] = &[
    ("SNMPv2-MIB", include_str!("../../mibs/SNMPv2-MIB.txt")),
    ("IF-MIB", include_str!("../../mibs/IF-MIB.txt")),
    ("IP-MIB", include_str!("../../mibs/IP-MIB.txt")),
    (
        "HOST-RESOURCES-MIB",
        include_str!("../../mibs/HOST-RESOURCES-MIB.txt"),
    ),
    (
        "FIBRE-CHANNEL-FE-MIB",
        include_str!("../../mibs/FIBRE-CHANNEL-FE-MIB.txt"),
    ),
];

pub(crate) fn find(name: &str) -> Option<&'static str> {
    BUNDLED_MODULES
        .iter()
        .find(|(module, _)| *module == name)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mib::parser;

    #[test]
    fn test_bundled_modules_parse() {
        for (name, text) in BUNDLED_MODULES {
            let module = parser::parse(text)
                .unwrap_or_else(|e| panic!("{} line {}: {}", name, e.line, e.message));
            assert_eq!(module.name, *name);
            assert!(!module.oids.is_empty());
        }
    }
}
