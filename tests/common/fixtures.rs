//! Common test fixtures and constants.

use snmpy::{Oid, Value, oid};
use std::collections::BTreeMap;

/// Read community
pub const COMMUNITY_RO: &str = "public";
/// Write community
pub const COMMUNITY_RW: &str = "private";

// =============================================================================
// Standard MIB-II OIDs
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn if_number() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 1)
}
pub fn if_mtu(index: u32) -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, index)
}

// =============================================================================
// APC PDU objects (enterprises.apc.products.hardware.rPDU2)
// =============================================================================

const RPDU2: [u32; 10] = [1, 3, 6, 1, 4, 1, 318, 1, 1, 26];

fn rpdu2(suffix: &[u32]) -> Oid {
    Oid::from_slice(&RPDU2).concat(suffix)
}

pub fn rpdu2_ident_model_number(index: u32) -> Oid {
    rpdu2(&[2, 1, 1, 8, index])
}
pub fn rpdu2_outlet_control_command(outlet: u32) -> Oid {
    rpdu2(&[9, 2, 3, 1, 5, outlet])
}
pub fn rpdu2_outlet_status_state(outlet: u32) -> Oid {
    rpdu2(&[9, 2, 5, 1, 5, outlet])
}
pub fn rpdu2_outlet_status_command_pending(outlet: u32) -> Oid {
    rpdu2(&[9, 2, 5, 1, 6, outlet])
}

/// A small MIB-II view with 24 interfaces.
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    data.insert(sys_descr(), Value::from("Test SNMP Agent"));
    data.insert(sys_name(), Value::from("test-agent"));
    data.insert(if_number(), Value::Integer(24));
    for index in 1..=24 {
        data.insert(if_mtu(index), Value::Integer(1500));
    }
    data
}

/// An APC rack PDU with outlet 5 off.
pub fn apc_pdu() -> BTreeMap<Oid, Value> {
    let mut data = system_mib();
    data.insert(rpdu2_ident_model_number(1), Value::from("AP8941"));
    data.insert(rpdu2_outlet_control_command(5), Value::Integer(2));
    data.insert(rpdu2_outlet_status_state(5), Value::Integer(2));
    data.insert(rpdu2_outlet_status_command_pending(5), Value::Integer(2));
    data
}
