//! `plan-share`: share and persist relocation plan state.
//!
//! Usage:
//!   plan-share encode | decode | url <base>
//!   plan-share save | load | clear --dir <path> [--config <toml>]
//!   plan-share compression on|off --dir <path> [--config <toml>]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use plan_share::cli::{parse_args, run};
use std::io::{self, Read, Write};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut input = String::new();
    if command.reads_input() {
        if let Err(e) = io::stdin().read_to_string(&mut input) {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    match run(&command, &input) {
        Ok(output) => {
            if !output.is_empty() {
                let mut stdout = io::stdout();
                if writeln!(stdout, "{output}").is_err() {
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
