//! wakati-gen command line.

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;

mod args;
mod commands;

use args::Args;

/// Exit status when some sentences could not be generated.
const EXIT_PARTIAL: i32 = 2;

fn main() {
	let args = Args::parse();

	// -v / -q set the default level, RUST_LOG still wins when present
	Builder::new()
		.filter_level(args.log_level())
		.parse_default_env()
		.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
		.init();

	let result = commands::run(&args, &mut io::stdout(), &mut io::stderr()).and_then(|summary| {
		io::stdout().flush().context("cannot write to stdout")?;
		Ok(summary)
	});

	match result {
		Ok(summary) if summary.failed > 0 => process::exit(EXIT_PARTIAL),
		Ok(_) => {}
		Err(e) => {
			eprintln!("Error: {e:#}");
			process::exit(1);
		}
	}
}
