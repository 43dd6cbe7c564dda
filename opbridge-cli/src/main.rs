//! opbridge CLI - Command-line interface
//!
//! This binary provides a command-line interface to the opbridge library:
//! a one-shot client for sending commands to a running bridge, and a
//! standalone demo host for exercising the bridge without embedding it.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "opbridge")]
#[command(version = opbridge::VERSION)]
#[command(about = "Synchronous command bridge for single-threaded hosts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one command to a running bridge and print the response
    Send {
        /// Operator name, e.g. demo.echo
        operator: String,

        /// Parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,

        /// Bridge address
        #[arg(long, default_value = "127.0.0.1:65432")]
        addr: SocketAddr,
    },

    /// Run a standalone demo host with a few toy operators
    Demo {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:65432")]
        addr: SocketAddr,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Send {
            operator,
            params,
            addr,
        } => commands::send::run(addr, &operator, &params),
        Commands::Demo { addr } => commands::demo::run(addr),
    };

    if let Err(err) = result {
        err.exit();
    }
}
