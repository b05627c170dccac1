//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use snmpy::prelude::*;
//! ```
//!
//! This imports:
//! - Core types: [`Client`], [`Oid`], [`Value`], [`ValueKind`]
//! - Names: [`Registry`], [`OidRef`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::client::Client;
pub use crate::error::{Error, Result};
pub use crate::mib::{OidRef, Registry};
pub use crate::oid::Oid;
pub use crate::value::{Value, ValueKind};
pub use crate::varbind::VarBind;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
