//! Shared test infrastructure for snmpy.
//!
//! Provides TestAgent (in-process SNMP agent), MibDir (scratch MIB
//! directory) and fixtures.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;
pub mod mibs;

pub use agent::TestAgent;
pub use fixtures::*;
pub use mibs::MibDir;
