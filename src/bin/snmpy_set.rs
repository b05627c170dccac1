//! snmpy-set: Write one SNMP object by name.
//!
//! The value is given as text and converted to the type the object already
//! holds on the agent.
//!
//! Part of the snmpy CLI utilities.

use snmpy::cli::args::{CommonArgs, OutputArgs};
use snmpy::cli::output::{OutputContext, write_error};
use clap::Parser;
use std::process::ExitCode;

/// Write one SNMP object.
#[derive(Debug, Parser)]
#[command(name = "snmpy-set", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Object to write: Module::symbol.suffix or a dotted OID.
    #[arg(value_name = "OID")]
    oid: String,

    /// New value, as text.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    value: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    match run_set(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run_set(args: &Args) -> snmpy::Result<()> {
    let client = args.common.client_builder().connect().await?;

    let oid = client.resolve(&args.oid)?;
    let echoed = client.set(&args.oid, &args.value).await?;

    let name = if args.output.numeric {
        None
    } else {
        client.translate(&oid).map(|name| name.to_string())
    };
    let ctx = OutputContext {
        format: args.output.format,
        force_hex: args.output.hex,
    };
    let result = ctx.build_result(name, &oid, &echoed);
    ctx.write_result(&result).map_err(|source| snmpy::Error::Io {
        target: None,
        source,
    })
}
