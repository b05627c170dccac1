//! Output formatting for CLI tools.
//!
//! Supports human-readable, JSON, and raw output formats.

use crate::cli::args::OutputFormat;
use crate::{Oid, Value};
use serde::Serialize;
use std::io::{self, Write};

/// One object, ready for output.
#[derive(Debug, Serialize)]
pub struct ObjectResult {
    /// Symbolic name when the registry knows one, else the dotted OID.
    pub name: String,
    pub oid: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
    pub force_hex: bool,
}

impl OutputContext {
    /// Create a new output context with default settings.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            force_hex: false,
        }
    }

    /// Build the printable form of `value`.
    pub fn build_result(&self, name: Option<String>, oid: &Oid, value: &Value) -> ObjectResult {
        let (value_type, json, formatted) = format_value(value, self.force_hex);
        let oid = oid.to_string();
        ObjectResult {
            name: name.unwrap_or_else(|| oid.clone()),
            oid,
            value_type,
            value: json,
            formatted,
        }
    }

    /// Write one result to stdout.
    pub fn write_result(&self, result: &ObjectResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write(&mut stdout, result)
    }

    fn write<W: Write>(&self, w: &mut W, result: &ObjectResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => write_human(w, result),
            OutputFormat::Json => write_json(w, result),
            OutputFormat::Raw => write_raw(w, result),
        }
    }
}

fn write_human<W: Write>(w: &mut W, result: &ObjectResult) -> io::Result<()> {
    write!(w, "{} = {}: ", result.name, result.value_type)?;

    // Prefer formatted for display
    if let Some(ref formatted) = result.formatted {
        writeln!(w, "{}", formatted)
    } else {
        match &result.value {
            serde_json::Value::String(s) => writeln!(w, "\"{}\"", s),
            serde_json::Value::Null => writeln!(w),
            other => writeln!(w, "{}", other),
        }
    }
}

fn write_json<W: Write>(w: &mut W, result: &ObjectResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

fn write_raw<W: Write>(w: &mut W, result: &ObjectResult) -> io::Result<()> {
    let value_str = match &result.value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    writeln!(w, "{}\t{}", result.name, value_str)
}

/// Format a value, returning (type_name, json_value, formatted_string).
fn format_value(value: &Value, force_hex: bool) -> (String, serde_json::Value, Option<String>) {
    let type_name = value.kind().as_str().to_string();
    match value {
        Value::Integer(v) | Value::Integer32(v) => (type_name, (*v).into(), None),

        Value::Unsigned32(v) | Value::Counter32(v) | Value::Gauge32(v) => {
            (type_name, (*v).into(), None)
        }

        Value::Counter64(v) => (type_name, (*v).into(), None),

        Value::OctetString(bytes) => {
            if force_hex || !is_printable(bytes) {
                (
                    "Hex-STRING".into(),
                    serde_json::Value::String(hex_string(bytes)),
                    Some(format_hex_string(bytes)),
                )
            } else {
                let s = String::from_utf8_lossy(bytes);
                ("STRING".into(), serde_json::Value::String(s.to_string()), None)
            }
        }

        Value::TimeTicks(v) => (
            type_name,
            (*v).into(),
            Some(format!("({}) {}", v, format_timeticks(*v))),
        ),

        Value::Opaque(bytes) | Value::Unknown { data: bytes, .. } => (
            type_name,
            serde_json::Value::String(hex_string(bytes)),
            Some(format_hex_string(bytes)),
        ),

        Value::ObjectIdentifier(_) | Value::IpAddress(_) => {
            (type_name, serde_json::Value::String(value.to_string()), None)
        }

        Value::Null => (type_name, serde_json::Value::Null, None),

        Value::NoSuchObject => (
            type_name,
            serde_json::Value::Null,
            Some("No Such Object available".into()),
        ),

        Value::NoSuchInstance => (
            type_name,
            serde_json::Value::Null,
            Some("No Such Instance currently exists".into()),
        ),

        Value::EndOfMibView => (
            type_name,
            serde_json::Value::Null,
            Some("No more variables left in this MIB View".into()),
        ),
    }
}

/// Check if bytes are printable ASCII/UTF-8.
fn is_printable(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(s) => s
            .chars()
            .all(|c| c.is_ascii_graphic() || c.is_ascii_whitespace()),
        Err(_) => false,
    }
}

/// Format bytes as hex string (lowercase, no separator).
fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Format bytes as spaced hex for display.
fn format_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format TimeTicks as human-readable duration.
fn format_timeticks(centiseconds: u32) -> String {
    let total_seconds = centiseconds / 100;
    let cs = centiseconds % 100;

    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!(
            "{}d {:02}:{:02}:{:02}.{:02}",
            days, hours, minutes, seconds, cs
        )
    } else {
        format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs)
    }
}

/// Write an error and its causes to stderr.
pub fn write_error(err: &crate::Error) {
    let mut stderr = io::stderr().lock();
    let _ = write!(stderr, "Error: {}", err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let _ = write!(stderr, ": {}", cause);
        source = cause.source();
    }
    let _ = writeln!(stderr);
}
