use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::StitchError;
use crate::StitchResult;
use crate::context::VersionSource;
use crate::placeholder::PlaceholderSyntax;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["stitch.toml", ".stitch.toml", ".config/stitch.toml"];

/// Configuration loaded from a `stitch.toml` file.
///
/// ```toml
/// source = "src"
/// target = "target"
/// clean = true
/// version = { file = "version.txt" }
///
/// [lint]
/// paths = ["src", "test"]
/// exclude = ["src/vendor/"]
///
/// [[artifacts]]
/// kind = "file"
/// name = "userscript"
/// source = "greasemonkey/main.js"
/// target = "main_{{ build_date_compact }}.user.js"
/// steps = [
///   { kind = "include", roots = ["common/includes"] },
///   { kind = "substitute", name = "buildDate", value = "'{{ build_date }}'" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StitchConfig {
	/// Source tree, relative to the project root.
	#[serde(default = "default_source")]
	pub source: PathBuf,
	/// Output tree, relative to the project root.
	#[serde(default = "default_target")]
	pub target: PathBuf,
	/// Empty the output tree before building.
	#[serde(default = "default_true")]
	pub clean: bool,
	#[serde(default)]
	pub version: VersionSource,
	#[serde(default)]
	pub lint: LintConfig,
	#[serde(default)]
	pub artifacts: Vec<ArtifactConfig>,
}

/// Static check settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
	#[serde(default = "default_true")]
	pub enabled: bool,
	/// Files and directories to inspect, relative to the project root.
	#[serde(default = "default_lint_paths")]
	pub paths: Vec<PathBuf>,
	/// Gitignore-style patterns for files to skip.
	#[serde(default)]
	pub exclude: Vec<String>,
}

impl Default for LintConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			paths: default_lint_paths(),
			exclude: Vec::new(),
		}
	}
}

/// One declared output.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactConfig {
	/// A single file assembled from a primary source.
	File {
		name: String,
		source: PathBuf,
		target: String,
		#[serde(default)]
		steps: Vec<StepConfig>,
	},
	/// Directory trees merged into one output directory.
	Directory {
		name: String,
		sources: Vec<PathBuf>,
		target: String,
		#[serde(default)]
		archive: Option<String>,
		#[serde(default)]
		steps: Vec<StepConfig>,
	},
}

impl ArtifactConfig {
	pub fn name(&self) -> &str {
		match self {
			Self::File { name, .. } | Self::Directory { name, .. } => name,
		}
	}

	/// The unrendered target template.
	pub fn target(&self) -> &str {
		match self {
			Self::File { target, .. } | Self::Directory { target, .. } => target,
		}
	}

	pub fn steps(&self) -> &[StepConfig] {
		match self {
			Self::File { steps, .. } | Self::Directory { steps, .. } => steps,
		}
	}
}

/// One transformation step, in the order it runs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
	/// `text` is rendered against the build context and placed in front of
	/// the contents of `file`. At least one of the two must be set.
	Prepend {
		#[serde(default)]
		file: Option<PathBuf>,
		#[serde(default)]
		text: Option<String>,
	},
	Append {
		#[serde(default)]
		file: Option<PathBuf>,
		#[serde(default)]
		text: Option<String>,
	},
	Include {
		roots: Vec<PathBuf>,
	},
	Substitute {
		name: String,
		value: String,
		#[serde(default)]
		syntax: PlaceholderSyntax,
	},
	StripHeader,
}

impl StitchConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> StitchResult<Option<StitchConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)
			.map_err(|e| StitchError::read(&config_path, &e))?;
		let config = Self::parse(&content)?;

		tracing::debug!(
			path = %config_path.display(),
			artifacts = config.artifacts.len(),
			"loaded config"
		);

		Ok(Some(config))
	}

	/// Load the config at `root`, failing when none exists.
	pub fn load_required(root: &Path) -> StitchResult<StitchConfig> {
		Self::load(root)?.ok_or_else(|| StitchError::MissingConfig(root.display().to_string()))
	}

	/// Parse and validate config text.
	pub fn parse(content: &str) -> StitchResult<StitchConfig> {
		let config: StitchConfig =
			toml::from_str(content).map_err(|e| StitchError::ConfigParse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> StitchResult<()> {
		let mut seen: Vec<&str> = Vec::with_capacity(self.artifacts.len());

		for artifact in &self.artifacts {
			let name = artifact.name();
			if seen.contains(&name) {
				return Err(StitchError::DuplicateArtifact(name.to_string()));
			}
			seen.push(name);

			for step in artifact.steps() {
				match step {
					StepConfig::Prepend {
						file: None,
						text: None,
					} => return Err(StitchError::EmptyStep("prepend".to_string())),
					StepConfig::Append {
						file: None,
						text: None,
					} => return Err(StitchError::EmptyStep("append".to_string())),
					_ => {}
				}
			}
		}

		Ok(())
	}
}

fn default_source() -> PathBuf {
	PathBuf::from("src")
}

fn default_target() -> PathBuf {
	PathBuf::from("target")
}

fn default_lint_paths() -> Vec<PathBuf> {
	vec![default_source()]
}

fn default_true() -> bool {
	true
}
