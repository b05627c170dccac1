//! snmpy-get: Read SNMP objects by name.
//!
//! Part of the snmpy CLI utilities.

use snmpy::cli::args::{CommonArgs, OutputArgs};
use snmpy::cli::output::{OutputContext, write_error};
use snmpy::{Client, UdpClient};
use clap::Parser;
use std::process::ExitCode;

/// Read one or more SNMP objects.
#[derive(Debug, Parser)]
#[command(name = "snmpy-get", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Objects to read: Module::symbol.suffix or dotted OIDs.
    #[arg(required = true, value_name = "OID")]
    oids: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let client = match args.common.client_builder().connect().await {
        Ok(client) => client,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = OutputContext {
        format: args.output.format,
        force_hex: args.output.hex,
    };

    let mut status = ExitCode::SUCCESS;
    for oid_ref in &args.oids {
        if let Err(e) = get_one(&client, &ctx, oid_ref, args.output.numeric).await {
            write_error(&e);
            status = ExitCode::FAILURE;
        }
    }
    status
}

async fn get_one(
    client: &UdpClient,
    ctx: &OutputContext,
    oid_ref: &str,
    numeric: bool,
) -> snmpy::Result<()> {
    let oid = client.resolve(oid_ref)?;
    let value = client.get(oid_ref).await?;
    let name = display_name(client, &oid, numeric);

    let result = ctx.build_result(name, &oid, &value);
    ctx.write_result(&result).map_err(|source| snmpy::Error::Io {
        target: None,
        source,
    })
}

fn display_name(client: &Client, oid: &snmpy::Oid, numeric: bool) -> Option<String> {
    if numeric {
        None
    } else {
        client.translate(oid).map(|name| name.to_string())
    }
}
