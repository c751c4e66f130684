use std::path::Path;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use owo_colors::OwoColorize;
use stitch_cli::Commands;
use stitch_cli::StitchCli;
use stitch_core::AnyEmptyResult;
use stitch_core::BuildPlan;
use stitch_core::StitchConfig;
use stitch_core::build_project;
use stitch_core::files::display_path;
use stitch_core::lint::LintDiagnostic;
use stitch_core::lint::LintKind;
use stitch_core::lint_project;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = r#"# stitch configuration

# Source tree and output tree, relative to this file.
source = "src"
target = "target"

# Empty the target directory before every build.
clean = true

# Where the build version comes from. Alternatives:
#   version = "1.0.0"
#   version = { manifest = "src/extension/manifest.json" }
#   version = { command = "git describe --dirty" }
version = { file = "version.txt" }

[lint]
paths = ["src"]
exclude = []

# Each artifact runs its source through the listed steps in order.
# Config strings may use {{ version }}, {{ version_underscored }},
# {{ build_date }}, {{ build_date_compact }} and {{ build_year }}.
#
# [[artifacts]]
# kind = "file"
# name = "userscript"
# source = "main.js"
# target = "main_{{ build_date_compact }}.user.js"
# steps = [
#   { kind = "prepend", file = "metadata_block.txt" },
#   { kind = "include", roots = ["includes"] },
#   { kind = "substitute", name = "buildDate", value = "'{{ build_date }}'" },
#   { kind = "append", text = "var messages = ", file = "_locales/en/messages.json" },
# ]
#
# [[artifacts]]
# kind = "directory"
# name = "extension"
# sources = ["extension"]
# target = "extension"
# archive = "extension_{{ version_underscored }}.zip"
# steps = [{ kind = "substitute", name = "VERSION", syntax = "bare", value = "{{ version }}" }]
"#;

fn main() {
	let args = StitchCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build {
			build_date,
			skip_lint,
		}) => run_build(&args, build_date, skip_lint),
		Some(Commands::Lint) => run_lint(&args),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `stitch --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render core errors through miette for error codes and help text.
		match e.downcast::<stitch_core::StitchError>() {
			Ok(stitch_err) => {
				let report: miette::Report = (*stitch_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("stitch_core={default_level},stitch={default_level}")));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(verbose)
		.init();
}

fn resolve_root(args: &StitchCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn today() -> NaiveDate {
	chrono::Local::now().date_naive()
}

fn make_relative(path: &Path, root: &Path) -> String {
	display_path(path.strip_prefix(root).unwrap_or(path))
}

fn run_init(args: &StitchCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = StitchConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("stitch.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());

	println!();
	println!("Next steps:");
	println!("  1. Put your sources under `src/` and the version in `version.txt`");
	println!("  2. Declare artifacts in stitch.toml");
	println!("  3. Run `stitch build`");

	Ok(())
}

fn run_build(
	args: &StitchCli,
	build_date: Option<NaiveDate>,
	skip_lint: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let build_date = build_date.unwrap_or_else(today);
	tracing::debug!(root = %root.display(), %build_date, "planning build");
	let (config, plan) = BuildPlan::load(&root, build_date)?;

	if !skip_lint {
		let findings = lint_project(&root, &config)?;
		for finding in &findings {
			eprintln!("{:?}", lint_to_report(finding, false));
		}
		if !findings.is_empty() {
			eprintln!(
				"{} {} lint finding(s)",
				colored!("warning:", yellow),
				findings.len()
			);
		}
	}

	println!(
		"Building version {} ({})",
		colored!(plan.context.version, bold),
		plan.context.formatted_build_date()
	);

	let report = build_project(&plan)?;

	for artifact in &report.artifacts {
		println!("{}", colored!(artifact.name, bold));
		for file in &artifact.files {
			println!("  {}", make_relative(file, &root));
		}
		if let Some(archive) = &artifact.archive {
			println!("  {}", make_relative(archive, &root));
		}
	}

	println!(
		"{} Built {} artifact(s)",
		colored!("✓", green),
		report.artifacts.len()
	);

	Ok(())
}

fn run_lint(args: &StitchCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = StitchConfig::load_required(&root)?;

	if !config.lint.enabled {
		println!("Linting is disabled in the config.");
		return Ok(());
	}

	let findings = lint_project(&root, &config)?;

	if findings.is_empty() {
		println!("{} No lint findings.", colored!("✓", green));
		return Ok(());
	}

	for finding in &findings {
		eprintln!("{:?}", lint_to_report(finding, true));
	}

	println!("{} lint finding(s)", findings.len());
	process::exit(1);
}

fn run_list(args: &StitchCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (_, plan) = BuildPlan::load(&root, today())?;

	if plan.artifacts.is_empty() {
		println!("No artifacts declared.");
		return Ok(());
	}

	println!("{}", colored!("Artifacts:", bold));
	for artifact in &plan.artifacts {
		println!(
			"  {} [{}] -> {}",
			artifact.name(),
			artifact.kind(),
			make_relative(artifact.target(), &root)
		);
	}

	println!("\n{} artifact(s)", plan.artifacts.len());

	Ok(())
}

/// Convert a lint finding into a `miette::Report` with a code and help text.
fn lint_to_report(finding: &LintDiagnostic, is_error: bool) -> miette::Report {
	let severity = if is_error {
		miette::Severity::Error
	} else {
		miette::Severity::Warning
	};

	let (code, help) = match finding.kind {
		LintKind::TabCharacter => ("stitch::lint::tab", "replace tabs with spaces"),
		LintKind::ReturnTag => ("stitch::lint::return_tag", "rename the tag to `@returns`"),
		LintKind::MissingPrivateTag => {
			(
				"stitch::lint::missing_private",
				"add `@private` to the doc comment or drop the leading underscore",
			)
		}
		LintKind::MissingDocComment => {
			(
				"stitch::lint::missing_doc",
				"add a `/** ... */` comment describing the function",
			)
		}
	};

	let diag_value = miette::MietteDiagnostic::new(finding.to_string())
		.with_code(code)
		.with_help(help)
		.with_severity(severity);
	miette::Report::new(diag_value)
}
