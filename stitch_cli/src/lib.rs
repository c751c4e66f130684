use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Assemble user scripts and browser extension bundles from shared source fragments.",
	long_about = "stitch builds distributable scripts from a source tree. Each artifact in \
	              stitch.toml runs a primary source file through an ordered chain of steps: \
	              prepend a metadata block, inline `#INCLUDE` directives, substitute build-time \
	              values and append shared libraries.\n\nQuick start:\n  stitch init   Create \
	              a sample stitch.toml\n  stitch list   Show declared artifacts\n  stitch build  \
	              Build every artifact\n  stitch lint   Run the static checks"
)]
pub struct StitchCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `stitch.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Build every artifact declared in `stitch.toml`.
	///
	/// Runs the static checks first (findings are reported as warnings and
	/// never stop the build), empties the target directory when `clean` is
	/// set and then assembles each artifact in declaration order.
	Build {
		/// Build date used for `{{ build_date }}` and friends, as
		/// `YYYY-MM-DD`. Defaults to today. Pin it for reproducible builds.
		#[arg(long, value_parser = parse_build_date)]
		build_date: Option<NaiveDate>,

		/// Skip the static checks.
		#[arg(long, default_value_t = false)]
		skip_lint: bool,
	},
	/// Run the static checks over the configured lint paths.
	///
	/// Exits with status 1 when any finding is reported.
	Lint,
	/// List declared artifacts and their resolved targets.
	List,
}

/// Parse a `YYYY-MM-DD` build date argument.
pub fn parse_build_date(value: &str) -> Result<NaiveDate, String> {
	NaiveDate::parse_from_str(value, "%Y-%m-%d")
		.map_err(|e| format!("expected a date formatted as YYYY-MM-DD: {e}"))
}
