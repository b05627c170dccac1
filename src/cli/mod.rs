//! CLI utilities for snmpy.
//!
//! Argument parsing and output formatting for the `snmpy-get` and
//! `snmpy-set` tools.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
