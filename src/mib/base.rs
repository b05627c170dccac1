//! Built-in base modules.
//!
//! The SMI modules define the OID roots, application types and textual
//! conventions every other module imports. Their text is mostly MACRO
//! definitions, so they are synthesized here instead of parsed.

use super::syntax::{Syntax, TEXTUAL_CONVENTIONS};

/// SMI base modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum BaseModule {
    /// SNMPv2-SMI (RFC 2578): SMIv2 OID roots and application types.
    SnmpV2Smi,
    /// SNMPv2-TC (RFC 2579): textual conventions.
    SnmpV2Tc,
    /// SNMPv2-CONF (RFC 2580): conformance macros only.
    SnmpV2Conf,
    /// RFC1155-SMI: SMIv1 OID roots and application types.
    Rfc1155Smi,
    /// RFC-1212: SMIv1 OBJECT-TYPE macro only.
    Rfc1212,
    /// RFC-1215: SMIv1 TRAP-TYPE macro only.
    Rfc1215,
    /// RFC1213-MIB: MIB-II groups and its textual conventions.
    Rfc1213Mib,
}

const SMIV2_NODES: &[(&str, &[u32])] = &[
    ("iso", &[1]),
    ("org", &[1, 3]),
    ("dod", &[1, 3, 6]),
    ("internet", &[1, 3, 6, 1]),
    ("directory", &[1, 3, 6, 1, 1]),
    ("mgmt", &[1, 3, 6, 1, 2]),
    ("mib-2", &[1, 3, 6, 1, 2, 1]),
    ("transmission", &[1, 3, 6, 1, 2, 1, 10]),
    ("experimental", &[1, 3, 6, 1, 3]),
    ("private", &[1, 3, 6, 1, 4]),
    ("enterprises", &[1, 3, 6, 1, 4, 1]),
    ("security", &[1, 3, 6, 1, 5]),
    ("snmpV2", &[1, 3, 6, 1, 6]),
    ("snmpDomains", &[1, 3, 6, 1, 6, 1]),
    ("snmpProxys", &[1, 3, 6, 1, 6, 2]),
    ("snmpModules", &[1, 3, 6, 1, 6, 3]),
    ("zeroDotZero", &[0, 0]),
];

const SMIV2_TYPES: &[(&str, Syntax)] = &[
    ("Integer32", Syntax::Integer32),
    ("Unsigned32", Syntax::Unsigned32),
    ("Gauge32", Syntax::Gauge32),
    ("Counter32", Syntax::Counter32),
    ("Counter64", Syntax::Counter64),
    ("IpAddress", Syntax::IpAddress),
    ("TimeTicks", Syntax::TimeTicks),
    ("Opaque", Syntax::Opaque),
];

const SMIV1_NODES: &[(&str, &[u32])] = &[
    ("iso", &[1]),
    ("org", &[1, 3]),
    ("dod", &[1, 3, 6]),
    ("internet", &[1, 3, 6, 1]),
    ("directory", &[1, 3, 6, 1, 1]),
    ("mgmt", &[1, 3, 6, 1, 2]),
    ("experimental", &[1, 3, 6, 1, 3]),
    ("private", &[1, 3, 6, 1, 4]),
    ("enterprises", &[1, 3, 6, 1, 4, 1]),
];

const SMIV1_TYPES: &[(&str, Syntax)] = &[
    ("NetworkAddress", Syntax::IpAddress),
    ("IpAddress", Syntax::IpAddress),
    ("Counter", Syntax::Counter32),
    ("Gauge", Syntax::Gauge32),
    ("TimeTicks", Syntax::TimeTicks),
    ("Opaque", Syntax::Opaque),
];

const MIB_II_NODES: &[(&str, &[u32])] = &[
    ("mib-2", &[1, 3, 6, 1, 2, 1]),
    ("system", &[1, 3, 6, 1, 2, 1, 1]),
    ("interfaces", &[1, 3, 6, 1, 2, 1, 2]),
    ("at", &[1, 3, 6, 1, 2, 1, 3]),
    ("ip", &[1, 3, 6, 1, 2, 1, 4]),
    ("icmp", &[1, 3, 6, 1, 2, 1, 5]),
    ("tcp", &[1, 3, 6, 1, 2, 1, 6]),
    ("udp", &[1, 3, 6, 1, 2, 1, 7]),
    ("egp", &[1, 3, 6, 1, 2, 1, 8]),
    ("transmission", &[1, 3, 6, 1, 2, 1, 10]),
    ("snmp", &[1, 3, 6, 1, 2, 1, 11]),
];

const MIB_II_TYPES: &[(&str, Syntax)] = &[
    ("DisplayString", Syntax::OctetString),
    ("PhysAddress", Syntax::OctetString),
];

impl BaseModule {
    pub const ALL: [BaseModule; 7] = [
        Self::SnmpV2Smi,
        Self::SnmpV2Tc,
        Self::SnmpV2Conf,
        Self::Rfc1155Smi,
        Self::Rfc1212,
        Self::Rfc1215,
        Self::Rfc1213Mib,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::SnmpV2Smi => "SNMPv2-SMI",
            Self::SnmpV2Tc => "SNMPv2-TC",
            Self::SnmpV2Conf => "SNMPv2-CONF",
            Self::Rfc1155Smi => "RFC1155-SMI",
            Self::Rfc1212 => "RFC-1212",
            Self::Rfc1215 => "RFC-1215",
            Self::Rfc1213Mib => "RFC1213-MIB",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|base| base.name() == name)
    }

    /// OID nodes the module defines, with absolute arcs.
    pub fn nodes(self) -> &'static [(&'static str, &'static [u32])] {
        match self {
            Self::SnmpV2Smi => SMIV2_NODES,
            Self::Rfc1155Smi => SMIV1_NODES,
            Self::Rfc1213Mib => MIB_II_NODES,
            Self::SnmpV2Tc | Self::SnmpV2Conf | Self::Rfc1212 | Self::Rfc1215 => &[],
        }
    }

    /// Types and textual conventions the module defines.
    pub fn types(self) -> &'static [(&'static str, Syntax)] {
        match self {
            Self::SnmpV2Smi => SMIV2_TYPES,
            Self::SnmpV2Tc => TEXTUAL_CONVENTIONS,
            Self::Rfc1155Smi => SMIV1_TYPES,
            Self::Rfc1213Mib => MIB_II_TYPES,
            Self::SnmpV2Conf | Self::Rfc1212 | Self::Rfc1215 => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for base in BaseModule::ALL {
            assert_eq!(BaseModule::from_name(base.name()), Some(base));
        }
        assert_eq!(BaseModule::from_name("IF-MIB"), None);
    }

    #[test]
    fn test_nodes_are_consistent() {
        // Every node except the roots hangs off another node of the same module
        for base in BaseModule::ALL {
            let nodes = base.nodes();
            for (name, arcs) in nodes {
                if arcs.len() <= 2 || *name == "mib-2" {
                    continue;
                }
                let parent = &arcs[..arcs.len() - 1];
                assert!(
                    nodes.iter().any(|(_, other)| *other == parent),
                    "{}::{} has no parent",
                    base.name(),
                    name
                );
            }
        }
    }
}
