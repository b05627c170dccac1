//! Command-line argument structures for the snmpy CLI tools.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::Version;
use crate::client::{ClientBuilder, Target};
use crate::Client;

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with type information.
    #[default]
    Human,
    /// JSON output for scripting.
    Json,
    /// Raw tab-separated output for scripting.
    Raw,
}

/// Target, credential and MIB arguments shared by the CLI tools.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Target hostname or IP address.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// UDP port.
    #[arg(short = 'p', long = "port", default_value_t = Target::DEFAULT_PORT)]
    pub port: u16,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// Community for GET requests.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Community for SET requests.
    #[arg(short = 'w', long = "write-community", default_value = "private")]
    pub write_community: String,

    /// Timeout per attempt, in seconds.
    #[arg(
        short = 't',
        long = "timeout",
        default_value = "1",
        value_name = "SECS",
        value_parser = parse_timeout
    )]
    pub timeout: Duration,

    /// Retries after the first attempt.
    #[arg(short = 'r', long = "retries", default_value_t = Target::DEFAULT_RETRIES)]
    pub retries: u32,

    /// MIB search directories, searched in order before the bundled modules.
    #[arg(
        short = 'M',
        long = "mib-dir",
        env = "MIBDIRS",
        value_delimiter = ':',
        value_name = "DIR"
    )]
    pub mib_dirs: Vec<PathBuf>,

    /// Extra MIB modules to load, comma separated.
    #[arg(short = 'm', long = "mib", value_delimiter = ',', value_name = "MODULE")]
    pub mibs: Vec<String>,
}

impl CommonArgs {
    /// A client builder configured from these arguments.
    pub fn client_builder(&self) -> ClientBuilder {
        let mut builder = Client::builder(
            self.target.as_str(),
            self.community.clone(),
            self.write_community.clone(),
        )
        .port(self.port)
        .timeout(self.timeout)
        .retries(self.retries)
        .version(self.snmp_version.into())
        .preload(self.mibs.iter().filter(|m| !m.is_empty()).cloned());

        for dir in &self.mib_dirs {
            if !dir.as_os_str().is_empty() {
                builder = builder.mib_path(dir.clone());
            }
        }
        builder
    }
}

/// Parse a timeout in (possibly fractional) seconds. Must be positive and finite.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {s}"))?;
    match Duration::try_from_secs_f64(secs) {
        Ok(timeout) if !timeout.is_zero() => Ok(timeout),
        _ => Err(format!("timeout must be a positive number of seconds, got {s}")),
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human, json, or raw.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Print the numeric OID instead of the symbolic name.
    #[arg(short = 'n', long = "numeric")]
    pub numeric: bool,

    /// Always display OctetString as hex.
    #[arg(long = "hex")]
    pub hex: bool,

    /// Enable debug logging (snmpy=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmpy=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    ///
    /// Without either flag, `RUST_LOG` is honoured, falling back to warnings only.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            EnvFilter::new("snmpy=trace")
        } else if self.debug {
            EnvFilter::new("snmpy=debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snmpy=warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        output: OutputArgs,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::try_parse_from(["snmpy-get", "-M", "", "pdu1"]).unwrap();
        assert_eq!(args.common.target, "pdu1");
        assert_eq!(args.common.port, 161);
        assert_eq!(args.common.community, "public");
        assert_eq!(args.common.write_community, "private");
        assert_eq!(args.common.timeout, Duration::from_secs(1));
        assert_eq!(args.common.retries, 2);
        assert_eq!(args.common.snmp_version, SnmpVersion::V2c);
        assert_eq!(args.output.format, OutputFormat::Human);
    }

    #[test]
    fn test_lists() {
        let args = TestArgs::try_parse_from([
            "snmpy-get",
            "-M",
            "/opt/mibs:/usr/share/snmp/mibs",
            "-m",
            "PowerNet-MIB,UPS-MIB",
            "-v",
            "1",
            "-O",
            "json",
            "pdu1",
        ])
        .unwrap();
        assert_eq!(
            args.common.mib_dirs,
            vec![
                PathBuf::from("/opt/mibs"),
                PathBuf::from("/usr/share/snmp/mibs")
            ]
        );
        assert_eq!(args.common.mibs, vec!["PowerNet-MIB", "UPS-MIB"]);
        assert_eq!(Version::from(args.common.snmp_version), Version::V1);
        assert_eq!(args.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_fractional_timeout() {
        let args = TestArgs::try_parse_from(["snmpy-get", "-M", "", "-t", "0.25", "pdu1"]).unwrap();
        assert_eq!(args.common.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        for bad in ["-1", "NaN", "inf", "0", "soon"] {
            let result = TestArgs::try_parse_from(["snmpy-get", "-t", bad, "pdu1"]);
            assert!(result.is_err(), "timeout {bad} accepted");
        }
    }
}
