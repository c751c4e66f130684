use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use chrono::Datelike;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::StitchError;
use crate::StitchResult;
use crate::files::read_source;
use crate::header::strip_license_header;

/// Values computed once per build and threaded explicitly through artifact
/// assembly. Nothing in the pipeline reads the clock or the environment on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
	pub version: String,
	pub build_date: NaiveDate,
}

/// The template variables exposed to config strings.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateValues {
	pub version: String,
	pub version_underscored: String,
	pub build_date: String,
	pub build_date_compact: String,
	pub build_year: i32,
}

impl BuildContext {
	pub fn new(version: impl Into<String>, build_date: NaiveDate) -> Self {
		Self {
			version: version.into(),
			build_date,
		}
	}

	pub fn build_year(&self) -> i32 {
		self.build_date.year()
	}

	/// The build date in the long display format, e.g. `1st January 2024`.
	pub fn formatted_build_date(&self) -> String {
		format_build_date(self.build_date)
	}

	/// The version with dots replaced by underscores, for file names.
	pub fn version_underscored(&self) -> String {
		self.version.replace('.', "_")
	}

	pub fn template_values(&self) -> TemplateValues {
		TemplateValues {
			version: self.version.clone(),
			version_underscored: self.version_underscored(),
			build_date: self.formatted_build_date(),
			build_date_compact: self.build_date.format("%Y%m%d").to_string(),
			build_year: self.build_year(),
		}
	}

	/// Render a config string containing `{{ ... }}` expressions against this
	/// context. Strings without template syntax are returned unchanged.
	pub fn render(&self, template: &str) -> StitchResult<String> {
		render_template(template, &self.template_values())
	}
}

/// Format a date as `<day><ordinal> <Month> <year>` without a leading zero.
pub fn format_build_date(date: NaiveDate) -> String {
	format!(
		"{}{} {}",
		date.day(),
		ordinal_indicator(date.day()),
		date.format("%B %Y")
	)
}

/// English ordinal suffix for a day of the month.
pub fn ordinal_indicator(number: u32) -> &'static str {
	if (11..=13).contains(&(number % 100)) {
		return "th";
	}

	match number % 10 {
		1 => "st",
		2 => "nd",
		3 => "rd",
		_ => "th",
	}
}

/// Render `content` through minijinja using the given values.
pub fn render_template(content: &str, values: &impl Serialize) -> StitchResult<String> {
	if !has_template_syntax(content) {
		return Ok(content.to_string());
	}

	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
	env.add_template("__inline__", content)
		.map_err(|e| StitchError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__inline__")
		.map_err(|e| StitchError::TemplateRender(e.to_string()))?;

	let ctx = minijinja::Value::from_serialize(values);
	template
		.render(ctx)
		.map_err(|e| StitchError::TemplateRender(e.to_string()))
}

fn has_template_syntax(content: &str) -> bool {
	content.contains("{{") || content.contains("{%") || content.contains("{#")
}

/// Where the build version comes from.
///
/// ```toml
/// version = "1.2.3"
/// version = { file = "version.txt" }
/// version = { manifest = "src/googlechrome/manifest.json" }
/// version = { command = "git describe --dirty" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum VersionSource {
	Literal(String),
	File { file: PathBuf },
	Manifest { manifest: PathBuf },
	Command { command: String },
}

impl Default for VersionSource {
	fn default() -> Self {
		Self::File {
			file: PathBuf::from("version.txt"),
		}
	}
}

impl VersionSource {
	/// Resolve the version string. Relative paths and commands are resolved
	/// against `root`.
	pub fn resolve(&self, root: &Path) -> StitchResult<String> {
		let version = match self {
			Self::Literal(value) => value.trim().to_string(),
			Self::File { file } => {
				let path = root.join(file);
				read_source(&path)
					.map_err(|e| StitchError::Version(e.to_string()))?
					.trim()
					.to_string()
			}
			Self::Manifest { manifest } => read_manifest_version(&root.join(manifest))?,
			Self::Command { command } => run_version_command(root, command)?,
		};

		if version.is_empty() {
			return Err(StitchError::Version(
				"the version source produced an empty string".to_string(),
			));
		}

		Ok(version)
	}
}

/// Read the `version` field from an extension manifest, which may carry a
/// license header in front of the JSON body.
pub fn read_manifest_version(path: &Path) -> StitchResult<String> {
	let content = read_source(path).map_err(|e| StitchError::Version(e.to_string()))?;
	let manifest: serde_json::Value = serde_json::from_str(strip_license_header(&content))
		.map_err(|e| StitchError::Version(format!("`{}`: {e}", path.display())))?;

	manifest
		.get("version")
		.and_then(serde_json::Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| {
			StitchError::Version(format!(
				"`{}` has no string `version` field",
				path.display()
			))
		})
}

fn run_version_command(root: &Path, command: &str) -> StitchResult<String> {
	let output = if cfg!(windows) {
		Command::new("cmd")
			.arg("/C")
			.arg(command)
			.current_dir(root)
			.output()?
	} else {
		Command::new("sh")
			.arg("-c")
			.arg(command)
			.current_dir(root)
			.output()?
	};

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		let reason = if stderr.is_empty() {
			format!(
				"`{command}` exited with status {}",
				output
					.status
					.code()
					.map_or_else(|| "unknown".to_string(), |code| code.to_string())
			)
		} else {
			stderr
		};

		return Err(StitchError::Version(reason));
	}

	Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
